//! The platform Kubernetes network.
//!
//! Slot layout inside the VPC's /16, one /24 per slot:
//! - `0` the shared utility subnet in the first zone
//! - `1..=zones` one public subnet per zone, in zone order
//! - `16, 32, ...` private subnets, colors outer loop and zones inner loop

use crate::config::StackConfig;
use crate::error::{Error, Result};
use crate::exports::{NatGatewayExport, NetworkExports, SubnetExport};
use crate::models::{DeployColor, ResourceRef, SubnetPurpose};
use crate::network::{
    AllocatedSubnet, AwsVpc, FlowLogBundle, NatGateway, NetworkSettings, SubnetHandle,
    SubnetRequest,
};
use crate::stack::Stack;
use itertools::iproduct;
use std::collections::BTreeMap;

pub const ROOT_TAG_NAME: &str = "Platform k8s";
pub const ROOT_RESOURCE_NAME: &str = "platform-k8s";

pub const UTILITY_SUBNET_SLOT: u8 = 0;
pub const PRIVATE_SUBNET_INCREMENTOR: usize = 16;
/// Public slots `1..=zones` must stay below the first private slot.
pub const MAX_ZONES: usize = PRIVATE_SUBNET_INCREMENTOR - 1;
/// Private slots `16..=240` fit the third octet.
pub const MAX_PRIVATE_SUBNETS: usize = 255 / PRIVATE_SUBNET_INCREMENTOR;

/// Slot of the public subnet in the zone at `zone_index`.
pub fn public_slot(zone_index: usize) -> Result<u8> {
    let slot = zone_index + 1;
    if slot >= PRIVATE_SUBNET_INCREMENTOR {
        return Err(Error::allocation(format!(
            "public slot {slot} for zone #{zone_index} runs into the private range"
        )));
    }
    u8::try_from(slot).map_err(|_| Error::allocation(format!("public slot {slot} overflows")))
}

/// One private subnet position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateSlot<'a> {
    pub color: &'a DeployColor,
    pub zone_index: usize,
    pub zone: &'a str,
    pub slot: u8,
}

/// Private subnet slots in allocation order: every zone of the first color, then the next color.
pub fn private_slots<'a>(
    colors: &'a [DeployColor],
    zones: &'a [String],
) -> Result<Vec<PrivateSlot<'a>>> {
    iproduct!(colors.iter(), zones.iter().enumerate())
        .enumerate()
        .map(|(i, (color, (zone_index, zone)))| {
            let slot = (i + 1) * PRIVATE_SUBNET_INCREMENTOR;
            let slot = u8::try_from(slot).map_err(|_| {
                Error::allocation(format!(
                    "private slot {slot} for {zone}/{color} overflows the third octet"
                ))
            })?;
            Ok(PrivateSlot {
                color,
                zone_index,
                zone: zone.as_str(),
                slot,
            })
        })
        .collect()
}

/// Resources declared in one availability zone.
#[derive(Debug, Clone)]
pub struct ZoneResources {
    pub zone: String,
    pub public_subnet: Option<AllocatedSubnet>,
    pub nat: Option<NatGateway>,
    /// In color order.
    pub private_subnets: Vec<AllocatedSubnet>,
}

impl ZoneResources {
    fn new(zone: &str) -> Self {
        ZoneResources {
            zone: zone.to_string(),
            public_subnet: None,
            nat: None,
            private_subnets: Vec::new(),
        }
    }
}

/// The declared platform network.
#[derive(Debug, Clone)]
pub struct PlatformK8s {
    pub vpc: AwsVpc,
    pub utility_subnet: SubnetHandle,
    pub utility_association: ResourceRef,
    /// In configured zone order.
    pub zones: Vec<ZoneResources>,
    pub vpc_endpoint: Option<ResourceRef>,
    pub flow_logs: Option<FlowLogBundle>,
}

/// Declare the platform network into `stack`.
pub fn create_stack(stack: &mut Stack, config: &StackConfig) -> Result<PlatformK8s> {
    let platform = &config.platform_k8s;
    let zone_names = &platform.availability_zones;
    let utility_zone = platform.utility_zone().ok_or_else(|| {
        Error::Validation(vec!["platform_k8s.availability_zones is empty".to_string()])
    })?;

    let vpc = AwsVpc::new(
        stack,
        NetworkSettings {
            environment: config.environment().to_string(),
            region: config.region.clone(),
            root_tag_name: ROOT_TAG_NAME.to_string(),
            root_resource_name: ROOT_RESOURCE_NAME.to_string(),
            vpc_cidr: platform.cidr,
            protect_resources: config.protect_resources,
        },
    )?;
    let mut zones: Vec<ZoneResources> = zone_names.iter().map(|z| ZoneResources::new(z)).collect();

    let utility_subnet = vpc
        .create_subnet(
            stack,
            SubnetRequest {
                zone: utility_zone,
                slot: UTILITY_SUBNET_SLOT,
                resource_name: None,
                create_route_table: false,
                purpose: SubnetPurpose::Utility,
            },
        )?
        .subnet;
    let utility_association = vpc.create_subnet_association(stack, &utility_subnet, None, None)?;

    if platform.public_subnets {
        for (i, zone) in zones.iter_mut().enumerate() {
            let allocated = vpc.create_subnet(
                stack,
                SubnetRequest {
                    zone: &zone.zone,
                    slot: public_slot(i)?,
                    resource_name: None,
                    create_route_table: true,
                    purpose: SubnetPurpose::Public,
                },
            )?;
            zone.public_subnet = Some(allocated);
        }
    }

    if platform.nat_enabled {
        for zone in zones.iter_mut() {
            let public_subnet = zone.public_subnet.as_ref().ok_or_else(|| {
                Error::declaration(format!(
                    "NAT gateway for {} needs the zone's public subnet",
                    zone.zone
                ))
            })?;
            zone.nat = Some(vpc.create_nat_gateway(stack, &public_subnet.subnet)?);
        }
    }

    if platform.private_subnets {
        for slot in private_slots(&platform.deploy_colors, zone_names)? {
            let allocated = vpc.create_subnet(
                stack,
                SubnetRequest {
                    zone: slot.zone,
                    slot: slot.slot,
                    resource_name: None,
                    create_route_table: true,
                    purpose: SubnetPurpose::Private(slot.color.clone()),
                },
            )?;
            zones[slot.zone_index].private_subnets.push(allocated);
        }
    }

    let vpc_endpoint = if platform.vpc_endpoint {
        Some(vpc.create_vpc_endpoint(stack)?)
    } else {
        None
    };

    let flow_logs = if platform.vpc_flow_logs {
        Some(vpc.create_vpc_flow_logs(stack, platform.flow_log_policy_scope)?)
    } else {
        None
    };

    log::info!(
        "{} declared: {} zones, {} resources",
        vpc.root_resource_name(),
        zones.len(),
        stack.resources().len()
    );

    Ok(PlatformK8s {
        vpc,
        utility_subnet,
        utility_association,
        zones,
        vpc_endpoint,
        flow_logs,
    })
}

fn subnet_export(allocated: &AllocatedSubnet) -> Option<SubnetExport> {
    let routing = allocated.routing.as_ref()?;
    Some(SubnetExport {
        subnet_id: allocated.subnet.resource.id(),
        route_table_id: routing.route_table.id(),
        subnet_association_id: routing.association.id(),
    })
}

impl PlatformK8s {
    pub fn root_resource_name(&self) -> &str {
        self.vpc.root_resource_name()
    }

    /// Every subnet, utility first, then zone by zone.
    pub fn subnets(&self) -> Vec<&SubnetHandle> {
        let mut subnets = vec![&self.utility_subnet];
        for zone in &self.zones {
            subnets.extend(zone.public_subnet.iter().map(|a| &a.subnet));
            subnets.extend(zone.private_subnets.iter().map(|a| &a.subnet));
        }
        subnets
    }

    pub fn exports(&self) -> NetworkExports {
        let mut nat_gateways = BTreeMap::new();
        let mut public_subnets = BTreeMap::new();
        let mut private_subnets = BTreeMap::new();

        for zone in &self.zones {
            if let Some(nat) = &zone.nat {
                nat_gateways.insert(
                    zone.zone.clone(),
                    NatGatewayExport {
                        eip_id: nat.eip.id(),
                        eip: nat.eip.attr("publicIp"),
                        nat_gateway_id: nat.nat_gateway.id(),
                    },
                );
            }
            if let Some(export) = zone.public_subnet.as_ref().and_then(subnet_export) {
                public_subnets.insert(zone.zone.clone(), export);
            }
            let colors: BTreeMap<String, SubnetExport> = zone
                .private_subnets
                .iter()
                .filter_map(|allocated| {
                    let color = allocated.subnet.purpose.color()?;
                    Some((color.to_string(), subnet_export(allocated)?))
                })
                .collect();
            if !colors.is_empty() {
                private_subnets.insert(zone.zone.clone(), colors);
            }
        }

        NetworkExports {
            vpc_id: self.vpc.vpc().id(),
            protect_resources: self.vpc.protect_resources(),
            public_utility_subnet_id: self.utility_subnet.resource.id(),
            public_utility_subnet_assoc_id: self.utility_association.id(),
            public_vpc_endpoint_id: self.vpc_endpoint.as_ref().map(ResourceRef::id),
            internet_gateway_id: self.vpc.internet_gateway().id(),
            main_route_table_id: self.vpc.main_route_table().id(),
            nat_gateways,
            public_subnets,
            private_subnets,
        }
    }
}
