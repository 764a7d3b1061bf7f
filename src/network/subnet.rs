//! Subnet allocation.
//!
//! A subnet's block is the VPC's first two octets, the caller's slot as the
//! third octet, and a /24 mask. Callers pick slots; [`check_for_overlapping_subnets`]
//! catches collisions after the fact.

use super::{default_routes, AwsVpc};
use crate::error::{Error, Result};
use crate::models::{Ipv4, ResourceKind, ResourceRef, SubnetPurpose};
use crate::naming::Component;
use crate::stack::Stack;
use itertools::Itertools;
use serde_json::json;

/// What to allocate.
#[derive(Debug, Clone)]
pub struct SubnetRequest<'a> {
    pub zone: &'a str,
    /// Third octet of the subnet block.
    pub slot: u8,
    /// Overrides the generated logical name.
    pub resource_name: Option<String>,
    /// Give the subnet its own route table and association.
    pub create_route_table: bool,
    pub purpose: SubnetPurpose,
}

/// A declared subnet.
#[derive(Debug, Clone)]
pub struct SubnetHandle {
    pub resource: ResourceRef,
    pub zone: String,
    pub slot: u8,
    pub cidr: Ipv4,
    pub purpose: SubnetPurpose,
}

/// Dedicated route table of a subnet.
#[derive(Debug, Clone)]
pub struct SubnetRouting {
    pub route_table: ResourceRef,
    pub association: ResourceRef,
}

#[derive(Debug, Clone)]
pub struct AllocatedSubnet {
    pub subnet: SubnetHandle,
    pub routing: Option<SubnetRouting>,
}

impl AwsVpc {
    /// Declare a subnet, plus its own route table when requested.
    pub fn create_subnet(
        &self,
        stack: &mut Stack,
        request: SubnetRequest<'_>,
    ) -> Result<AllocatedSubnet> {
        let SubnetRequest {
            zone,
            slot,
            resource_name,
            create_route_table,
            purpose,
        } = request;

        let cidr = self.vpc_cidr().with_third_octet(slot);
        if !self.vpc_cidr().covers(&cidr) {
            return Err(Error::allocation(format!(
                "slot {slot} gives {cidr}, outside the VPC block {}",
                self.vpc_cidr()
            )));
        }

        let component = match purpose {
            SubnetPurpose::Utility => Component::UtilitySubnet { zone },
            _ => Component::Subnet {
                zone,
                purpose: &purpose,
            },
        };
        let name = resource_name.unwrap_or_else(|| self.namer().resource_name(component));
        log::debug!("subnet {name} {cidr} zone={zone} purpose={purpose}");

        let resource = stack.declare(
            ResourceKind::Subnet,
            name,
            self.namer().tag_name(component),
            json!({
                "vpcId": self.vpc().id(),
                "availabilityZone": zone,
                "mapPublicIpOnLaunch": purpose.is_public(),
                "cidrBlock": cidr,
            }),
        )?;
        let subnet = SubnetHandle {
            resource,
            zone: zone.to_string(),
            slot,
            cidr,
            purpose,
        };

        if !create_route_table {
            return Ok(AllocatedSubnet {
                subnet,
                routing: None,
            });
        }

        let table = Component::SubnetRouteTable {
            zone,
            purpose: &subnet.purpose,
        };
        let route_table = stack.declare(
            ResourceKind::RouteTable,
            self.namer().resource_name(table),
            self.namer().tag_name(table),
            json!({
                "vpcId": self.vpc().id(),
                "routes": default_routes(self.internet_gateway()),
            }),
        )?;
        let association = self.create_subnet_association(stack, &subnet, None, Some(&route_table))?;

        Ok(AllocatedSubnet {
            subnet,
            routing: Some(SubnetRouting {
                route_table,
                association,
            }),
        })
    }
}

/// Fail when any two declared subnets share addresses.
pub fn check_for_overlapping_subnets(stack: &Stack) -> Result<()> {
    let mut blocks = Vec::new();
    for subnet in stack.of_kind(ResourceKind::Subnet) {
        let cidr = subnet
            .property("cidrBlock")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::cidr(format!("subnet '{}' has no cidrBlock", subnet.name)))?;
        blocks.push((subnet.name.as_str(), Ipv4::new(cidr)?));
    }

    for ((a_name, a), (b_name, b)) in blocks.iter().tuple_combinations() {
        if a.overlaps(b) {
            return Err(Error::allocation(format!(
                "subnet '{a_name}' {a} overlaps '{b_name}' {b}"
            )));
        }
    }
    log::debug!("{} subnets, no overlaps", blocks.len());
    Ok(())
}
