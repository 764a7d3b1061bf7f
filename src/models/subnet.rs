//! Subnet purpose model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of a parallel private-subnet track (blue/green style isolation).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DeployColor(String);

impl DeployColor {
    pub fn new(label: impl Into<String>) -> Self {
        DeployColor(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeployColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a subnet is for. Private subnets always belong to a color track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubnetPurpose {
    /// The single shared public subnet in the first zone.
    Utility,
    /// Per-zone public subnet, home of the zone's NAT gateway.
    Public,
    /// Per-zone, per-color private subnet.
    Private(DeployColor),
}

impl SubnetPurpose {
    /// Instances launched here get a public address.
    pub fn is_public(&self) -> bool {
        !matches!(self, SubnetPurpose::Private(_))
    }

    pub fn color(&self) -> Option<&DeployColor> {
        match self {
            SubnetPurpose::Private(color) => Some(color),
            _ => None,
        }
    }

    /// Lower-case word used inside logical resource names.
    pub fn use_word(&self) -> &'static str {
        if self.is_public() {
            "public"
        } else {
            "private"
        }
    }

    /// Capitalised word used inside Name tags.
    pub fn tag_word(&self) -> &'static str {
        match self {
            SubnetPurpose::Utility => "Utility",
            SubnetPurpose::Public => "Public",
            SubnetPurpose::Private(_) => "Private",
        }
    }
}

impl fmt::Display for SubnetPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubnetPurpose::Utility => f.write_str("utility"),
            SubnetPurpose::Public => f.write_str("public"),
            SubnetPurpose::Private(color) => write!(f, "private/{color}"),
        }
    }
}
