//! Domain models for network synthesis.
//!
//! - [`Ipv4`] - IPv4 block with CIDR notation support
//! - [`SubnetPurpose`] and [`DeployColor`] - what a subnet is for
//! - [`Resource`], [`ResourceRef`] and [`Output`] - declared resources and references

mod ipv4;
mod resource;
mod subnet;

// Re-export public types
pub use ipv4::{
    broadcast_addr, get_cidr_mask, usable_hosts, Ipv4, AWS_RESERVED_ADDRESSES, MAX_LENGTH,
};
pub use resource::{Output, Resource, ResourceKind, ResourceOptions, ResourceRef};
pub use subnet::{DeployColor, SubnetPurpose};
