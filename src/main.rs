use clap::{Parser, Subcommand};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use platform_network::config::load_config;
use platform_network::output::{subnet_print, verdict};
use platform_network::synthesize;
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "platform-network")]
#[command(about = "Declare the platform k8s AWS network as a resource document", long_about = None)]
struct Cli {
    /// Stack config file, `.toml` or `.json`
    #[arg(short, long, env = "PLATFORM_NETWORK_CONFIG")]
    config: PathBuf,

    /// log4rs config; stderr logging at warn level when missing
    #[arg(long, default_value = "log4rs.yml")]
    log_config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full document: resources and outputs
    Synth {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print only the outputs other stacks consume
    Exports,
    /// Print the subnet allocation as CSV
    Subnets,
    /// Check the config and the allocation without printing the document
    Validate,
}

fn init_logging(log_config: &Path) -> Result<(), Box<dyn Error>> {
    if log_config.exists() {
        log4rs::init_file(log_config, Default::default())?;
        return Ok(());
    }
    // stdout carries documents, so logs always go to stderr
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}",
        )))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli.log_config)?;
    log::info!("#Start main() config={}", cli.config.display());

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            if matches!(cli.command, Commands::Validate) {
                eprintln!("{}", verdict(false, &e.to_string()));
            }
            return Err(e.into());
        }
    };
    let synthesis = synthesize(&config)?;

    match cli.command {
        Commands::Synth { output } => {
            let document = serde_json::to_string_pretty(&synthesis.document()?)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, document)?;
                    log::info!("wrote {}", path.display());
                }
                None => println!("{document}"),
            }
        }
        Commands::Exports => {
            println!("{}", serde_json::to_string_pretty(&synthesis.outputs()?)?);
        }
        Commands::Subnets => subnet_print(synthesis.platform())?,
        Commands::Validate => {
            println!(
                "{}",
                verdict(
                    true,
                    &format!(
                        "{} stack {}: {} resources",
                        config.project,
                        config.stack_name(),
                        synthesis.stack().resources().len()
                    )
                )
            );
        }
    }

    Ok(())
}
