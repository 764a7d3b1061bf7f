//! Stack configuration schema.
//!
//! Mirrors the keys of the stack config file. Everything is plain data;
//! semantic checks live in [`super::validation`].

use crate::models::{DeployColor, Ipv4};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROJECT: &str = "networking";
pub const DEFAULT_REGION: &str = "us-east-1";

fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Root of the stack config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StackConfig {
    /// Project name, used for the `pulumi:Project` tag.
    #[serde(default = "default_project")]
    pub project: String,

    /// Stack name; falls back to the environment.
    #[serde(default)]
    pub stack: Option<String>,

    /// Environment suffix of every name; falls back to the stack name, then `dev`.
    #[serde(default)]
    pub environment: Option<String>,

    /// Compliance boundary identifier stamped on every taggable resource.
    pub fedramp_boundary: String,

    /// Address block of the services cluster network.
    pub services_k8s_cidr: Ipv4,

    #[serde(default = "default_region")]
    pub region: String,

    /// Deletion protection for every resource in the stack.
    #[serde(default)]
    pub protect_resources: bool,

    pub platform_k8s: PlatformK8sConfig,
}

impl StackConfig {
    pub fn environment(&self) -> &str {
        self.environment
            .as_deref()
            .or(self.stack.as_deref())
            .unwrap_or("dev")
    }

    pub fn stack_name(&self) -> &str {
        self.stack.as_deref().unwrap_or_else(|| self.environment())
    }
}

/// Who may receive flow-log writes from the capture role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowLogPolicyScope {
    /// `Resource: "*"`.
    #[default]
    AllLogGroups,
    /// Only the flow-log group and its streams.
    LogGroup,
}

/// The platform Kubernetes network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformK8sConfig {
    /// Ordered zone names; the first hosts the utility subnet.
    pub availability_zones: Vec<String>,

    pub cidr: Ipv4,

    #[serde(default)]
    pub nat_enabled: bool,

    #[serde(default)]
    pub public_subnets: bool,

    #[serde(default)]
    pub private_subnets: bool,

    #[serde(default)]
    pub deploy_colors: Vec<DeployColor>,

    #[serde(default)]
    pub vpc_endpoint: bool,

    #[serde(default)]
    pub vpc_flow_logs: bool,

    #[serde(default)]
    pub flow_log_policy_scope: FlowLogPolicyScope,
}

impl PlatformK8sConfig {
    pub fn utility_zone(&self) -> Option<&str> {
        self.availability_zones.first().map(String::as_str)
    }
}
