//! Declarative AWS networking for the platform Kubernetes environment.
//!
//! [`synthesize`] turns a [`config::StackConfig`] into a resource document:
//! every VPC, subnet, route table, NAT gateway, endpoint and flow-log resource
//! with its properties, plus the outputs other stacks consume.

pub mod config;
pub mod error;
pub mod exports;
pub mod models;
pub mod naming;
pub mod network;
pub mod output;
pub mod platform_k8s;
pub mod stack;

use config::StackConfig;
use error::Result;
use exports::ExportRegistry;
use platform_k8s::PlatformK8s;
use serde_json::{json, Value};
use stack::{AutoTags, Stack};

/// A fully declared stack and its exports.
#[derive(Debug)]
pub struct Synthesis {
    stack: Stack,
    platform: PlatformK8s,
    exports: ExportRegistry,
}

/// Declare the whole network described by `config`.
///
/// The config is expected to have passed [`config::validate_config`];
/// [`config::load_config`] does that.
pub fn synthesize(config: &StackConfig) -> Result<Synthesis> {
    log::info!(
        "#Start synthesize() project={} stack={}",
        config.project,
        config.stack_name()
    );
    let auto_tags = AutoTags::new(
        &config.project,
        config.stack_name(),
        &config.fedramp_boundary,
    );
    let mut stack = Stack::new(config.protect_resources, auto_tags);

    let platform = platform_k8s::create_stack(&mut stack, config)?;
    network::check_for_overlapping_subnets(&stack)?;

    let mut exports = ExportRegistry::new();
    exports.register(platform.root_resource_name(), platform.exports())?;

    Ok(Synthesis {
        stack,
        platform,
        exports,
    })
}

impl Synthesis {
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn platform(&self) -> &PlatformK8s {
        &self.platform
    }

    pub fn exports(&self) -> &ExportRegistry {
        &self.exports
    }

    pub fn outputs(&self) -> Result<Value> {
        Ok(Value::Object(self.exports.to_outputs()?))
    }

    /// `{"resources": {...}, "outputs": {...}}`
    pub fn document(&self) -> Result<Value> {
        Ok(json!({
            "resources": self.stack.to_resources_value()?,
            "outputs": self.outputs()?,
        }))
    }
}
