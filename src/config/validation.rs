//! Configuration validation.
//!
//! Serde handles syntax; this checks what the builders rely on. All problems
//! are returned together, not just the first.

use super::schema::StackConfig;
use crate::platform_k8s::{MAX_PRIVATE_SUBNETS, MAX_ZONES};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Zone and color labels end up inside logical names.
static LABEL_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_label_regex() -> &'static Regex {
    LABEL_REGEX.get_or_init(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("Invalid Regex"))
}

fn check_labels<'a>(
    kind: &str,
    labels: impl Iterator<Item = &'a str>,
    problems: &mut Vec<String>,
) {
    let mut seen = HashSet::new();
    for label in labels {
        if !get_label_regex().is_match(label) {
            problems.push(format!(
                "{kind} '{label}' must be lower-case letters, digits and dashes"
            ));
        }
        if !seen.insert(label) {
            problems.push(format!("{kind} '{label}' is listed twice"));
        }
    }
}

/// Validate a parsed config.
///
/// Returns `Err` with every problem found. Overlap between the services and
/// platform blocks is only logged.
pub fn validate_config(config: &StackConfig) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();
    let platform = &config.platform_k8s;

    if config.fedramp_boundary.trim().is_empty() {
        problems.push("fedramp_boundary is empty".to_string());
    }
    if config.environment().trim().is_empty() {
        problems.push("environment is empty".to_string());
    } else if !get_label_regex().is_match(config.environment()) {
        problems.push(format!(
            "environment '{}' must be lower-case letters, digits and dashes",
            config.environment()
        ));
    }

    let zones = platform.availability_zones.len();
    if zones == 0 {
        problems.push(
            "platform_k8s.availability_zones is empty; the utility subnet needs a zone"
                .to_string(),
        );
    }
    if zones > MAX_ZONES {
        problems.push(format!(
            "platform_k8s.availability_zones has {zones} zones, at most {MAX_ZONES} fit below the first private slot"
        ));
    }
    check_labels(
        "availability zone",
        platform.availability_zones.iter().map(String::as_str),
        &mut problems,
    );
    check_labels(
        "deploy color",
        platform.deploy_colors.iter().map(|c| c.as_str()),
        &mut problems,
    );

    if platform.cidr.mask > 16 {
        problems.push(format!(
            "platform_k8s.cidr {} must be /16 or wider to hold /24 subnets at any third octet",
            platform.cidr
        ));
    }
    if !platform.cidr.is_network_address() {
        problems.push(format!(
            "platform_k8s.cidr {} has host bits set",
            platform.cidr
        ));
    }

    if platform.private_subnets {
        let colors = platform.deploy_colors.len();
        if colors == 0 {
            problems.push(
                "platform_k8s.private_subnets is enabled but deploy_colors is empty".to_string(),
            );
        }
        if colors * zones > MAX_PRIVATE_SUBNETS {
            problems.push(format!(
                "{colors} colors x {zones} zones needs {} private subnets, at most {MAX_PRIVATE_SUBNETS} fit in the third octet",
                colors * zones
            ));
        }
    }

    if platform.nat_enabled && !platform.public_subnets {
        problems.push(
            "platform_k8s.nat_enabled requires public_subnets; NAT gateways live in the public subnets"
                .to_string(),
        );
    }

    if config.services_k8s_cidr.overlaps(&platform.cidr) {
        log::warn!(
            "services_k8s_cidr {} overlaps platform_k8s.cidr {}",
            config.services_k8s_cidr,
            platform.cidr
        );
    }

    if problems.is_empty() {
        Ok(())
    } else {
        for problem in &problems {
            log::error!("config: {problem}");
        }
        Err(problems)
    }
}
