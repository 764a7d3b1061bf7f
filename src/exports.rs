//! Export registry: the output contract other stacks read.
//!
//! Keys are `{root}{suffix}` for every suffix in [`FIELD_SUFFIXES`]; they are
//! always present. Disabled features show up as empty maps, or `null` for the
//! endpoint id, so the shape never depends on the feature flags.

use crate::error::{Error, Result};
use crate::models::Output;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const FIELD_SUFFIXES: [&str; 10] = [
    "_vpc_id",
    "_protect_resources",
    "_public_utility_subnet_id",
    "_public_utility_subnet_assoc_id",
    "_public_vpc_endpoint_id",
    "_internet_gateway_id",
    "_main_route_table_id",
    "_nat_gateways",
    "_public_subnets",
    "_private_subnets",
];

/// Suffixes listed in the catalog. `_protect_resources` is exported but has
/// never been part of the catalog consumers read.
pub const CATALOG_SUFFIXES: [&str; 9] = [
    "_vpc_id",
    "_public_utility_subnet_id",
    "_public_utility_subnet_assoc_id",
    "_public_vpc_endpoint_id",
    "_internet_gateway_id",
    "_main_route_table_id",
    "_nat_gateways",
    "_public_subnets",
    "_private_subnets",
];

/// Output key of the catalog listing each registered root and its suffixes.
pub const STACK_CATALOG_KEY: &str = "stack_catalog";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetExport {
    pub subnet_id: Output,
    pub route_table_id: Output,
    pub subnet_association_id: Output,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NatGatewayExport {
    pub eip_id: Output,
    pub eip: Output,
    pub nat_gateway_id: Output,
}

/// Everything one network exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkExports {
    pub vpc_id: Output,
    pub protect_resources: bool,
    pub public_utility_subnet_id: Output,
    pub public_utility_subnet_assoc_id: Output,
    pub public_vpc_endpoint_id: Option<Output>,
    pub internet_gateway_id: Output,
    pub main_route_table_id: Output,
    /// zone → NAT details
    pub nat_gateways: BTreeMap<String, NatGatewayExport>,
    /// zone → subnet
    pub public_subnets: BTreeMap<String, SubnetExport>,
    /// zone → color → subnet
    pub private_subnets: BTreeMap<String, BTreeMap<String, SubnetExport>>,
}

impl NetworkExports {
    /// `(key, value)` pairs in [`FIELD_SUFFIXES`] order.
    pub fn fields(&self, root: &str) -> Result<Vec<(String, Value)>> {
        let values = [
            serde_json::to_value(&self.vpc_id)?,
            Value::Bool(self.protect_resources),
            serde_json::to_value(&self.public_utility_subnet_id)?,
            serde_json::to_value(&self.public_utility_subnet_assoc_id)?,
            serde_json::to_value(&self.public_vpc_endpoint_id)?,
            serde_json::to_value(&self.internet_gateway_id)?,
            serde_json::to_value(&self.main_route_table_id)?,
            serde_json::to_value(&self.nat_gateways)?,
            serde_json::to_value(&self.public_subnets)?,
            serde_json::to_value(&self.private_subnets)?,
        ];
        Ok(FIELD_SUFFIXES
            .iter()
            .zip(values)
            .map(|(suffix, value)| (format!("{root}{suffix}"), value))
            .collect())
    }
}

/// Exports of every network in the stack, keyed by resource-name prefix.
#[derive(Debug, Clone, Default)]
pub struct ExportRegistry {
    networks: BTreeMap<String, NetworkExports>,
}

impl ExportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, root: &str, exports: NetworkExports) -> Result<()> {
        if self.networks.contains_key(root) {
            return Err(Error::declaration(format!(
                "exports for '{root}' registered twice"
            )));
        }
        log::debug!("register exports for {root}");
        self.networks.insert(root.to_string(), exports);
        Ok(())
    }

    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }

    /// Flat outputs plus the catalog.
    pub fn to_outputs(&self) -> Result<Map<String, Value>> {
        let mut outputs = Map::new();
        let mut catalog = Map::new();
        for (root, exports) in &self.networks {
            for (key, value) in exports.fields(root)? {
                outputs.insert(key, value);
            }
            catalog.insert(root.clone(), serde_json::to_value(CATALOG_SUFFIXES)?);
        }
        outputs.insert(STACK_CATALOG_KEY.to_string(), Value::Object(catalog));
        Ok(outputs)
    }
}
