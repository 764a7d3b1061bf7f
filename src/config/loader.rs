//! Configuration loading from disk.

use super::schema::StackConfig;
use super::validation::validate_config;
use crate::error::{Error, Result};
use std::path::Path;

/// Supported config file encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.json` files are JSON, everything else is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Parse config text. Errors carry the key path that failed, e.g. `platform_k8s.cidr`.
pub fn parse_config(content: &str, format: ConfigFormat, origin: &str) -> Result<StackConfig> {
    let parse_error = |message: String| Error::ConfigParse {
        path: origin.to_string(),
        message,
    };
    match format {
        ConfigFormat::Json => {
            let mut deserializer = serde_json::Deserializer::from_str(content);
            serde_path_to_error::deserialize(&mut deserializer)
                .map_err(|e| parse_error(format!("path={} error={}", e.path(), e.inner())))
        }
        ConfigFormat::Toml => {
            let deserializer = toml::Deserializer::new(content);
            serde_path_to_error::deserialize(deserializer)
                .map_err(|e| parse_error(format!("path={} error={}", e.path(), e.inner())))
        }
    }
}

/// Load and validate the stack config.
///
/// # Returns
/// * `Ok(StackConfig)` - parsed config that passed validation
/// * `Err` - unreadable file, parse failure, or every validation problem found
pub fn load_config(path: &Path) -> Result<StackConfig> {
    let origin = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: origin.clone(),
        source,
    })?;
    log::info!("Reading stack config: {origin}");

    let config = parse_config(&content, ConfigFormat::from_path(path), &origin)?;
    validate_config(&config).map_err(Error::Validation)?;

    log::debug!(
        "config ok: environment={} zones={:?} cidr={}",
        config.environment(),
        config.platform_k8s.availability_zones,
        config.platform_k8s.cidr
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("stack.JSON")),
            ConfigFormat::Json
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("stack.toml")),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("Pulumi.dev")),
            ConfigFormat::Toml
        );
    }

    #[test]
    fn parse_error_reports_key_path() {
        let content = r#"{
            "fedramp_boundary": "moderate",
            "services_k8s_cidr": "10.30.0.0/16",
            "platform_k8s": {"availability_zones": ["us-east-1a"], "cidr": "10.20.0.0"}
        }"#;
        let err = parse_config(content, ConfigFormat::Json, "inline").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("platform_k8s.cidr"), "{msg}");
    }

    #[test]
    fn missing_required_key_is_a_parse_error() {
        let content = r#"
            services_k8s_cidr = "10.30.0.0/16"
            [platform_k8s]
            availability_zones = ["us-east-1a"]
            cidr = "10.20.0.0/16"
        "#;
        let err = parse_config(content, ConfigFormat::Toml, "inline").unwrap_err();
        assert!(err.to_string().contains("fedramp_boundary"));
    }

    #[test]
    fn load_dev_fixture() {
        let config = load_config(Path::new("src/tests/test_data/platform_k8s_dev.toml"))
            .expect("Error reading dev fixture");
        assert_eq!(config.environment(), "dev");
        assert_eq!(config.platform_k8s.availability_zones.len(), 2);
    }

    #[test]
    fn load_missing_file_fails() {
        let err = load_config(Path::new("src/tests/test_data/does_not_exist.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }
}
