//! VPC builder.
//!
//! [`AwsVpc`] declares the network itself and exposes the constructors for
//! everything scoped to it:
//! - [`subnet`] - subnet allocation and overlap checks
//! - [`routing`] - route table associations
//! - [`egress`] - NAT gateways and the S3 endpoint
//! - [`flow_logs`] - the flow-log bundle

mod egress;
mod flow_logs;
mod routing;
mod subnet;

pub use egress::NatGateway;
pub use flow_logs::FlowLogBundle;
pub use subnet::{
    check_for_overlapping_subnets, AllocatedSubnet, SubnetHandle, SubnetRequest, SubnetRouting,
};

use crate::error::{Error, Result};
use crate::models::{Ipv4, ResourceKind, ResourceRef};
use crate::naming::{Component, Namer};
use crate::stack::Stack;
use serde_json::{json, Value};

/// Destination of every default route.
pub const DEFAULT_ROUTE_CIDR: &str = "0.0.0.0/0";

/// Inputs of the network builder.
///
/// There is no NAT flag: NAT gateways are declared by the caller through
/// [`AwsVpc::create_nat_gateway`], one per public subnet it chooses.
#[derive(Debug, Clone)]
pub struct NetworkSettings {
    pub environment: String,
    pub region: String,
    /// Prefix of `Name` tags, e.g. `Platform k8s`.
    pub root_tag_name: String,
    /// Prefix of logical names, e.g. `platform-k8s`.
    pub root_resource_name: String,
    pub vpc_cidr: Ipv4,
    pub protect_resources: bool,
}

/// A declared VPC with its internet gateway and main route table.
#[derive(Debug, Clone)]
pub struct AwsVpc {
    namer: Namer,
    region: String,
    vpc_cidr: Ipv4,
    protect_resources: bool,
    vpc: ResourceRef,
    internet_gateway: ResourceRef,
    main_route_table: ResourceRef,
}

impl AwsVpc {
    /// Declare the VPC, internet gateway and main route table.
    ///
    /// Protection is a property of the whole stack; settings that disagree
    /// with the stack are rejected instead of protecting only part of it.
    pub fn new(stack: &mut Stack, settings: NetworkSettings) -> Result<AwsVpc> {
        if settings.protect_resources != stack.protect_resources() {
            return Err(Error::declaration(format!(
                "network '{}' asks for protect_resources={} but the stack uses {}",
                settings.root_resource_name,
                settings.protect_resources,
                stack.protect_resources()
            )));
        }
        let namer = Namer::new(
            &settings.root_resource_name,
            &settings.root_tag_name,
            &settings.environment,
        );
        log::info!(
            "network {} {} in {}",
            namer.resource_name(Component::Vpc),
            settings.vpc_cidr,
            settings.region
        );

        let vpc = stack.declare(
            ResourceKind::Vpc,
            namer.resource_name(Component::Vpc),
            namer.tag_name(Component::Vpc),
            json!({
                "cidrBlock": settings.vpc_cidr,
                "instanceTenancy": "default",
                "enableDnsHostnames": true,
                "enableDnsSupport": true,
            }),
        )?;
        let internet_gateway = stack.declare(
            ResourceKind::InternetGateway,
            namer.resource_name(Component::InternetGateway),
            namer.tag_name(Component::InternetGateway),
            json!({ "vpcId": vpc.id() }),
        )?;
        let main_route_table = stack.declare(
            ResourceKind::RouteTable,
            namer.resource_name(Component::MainRouteTable),
            namer.tag_name(Component::MainRouteTable),
            json!({
                "vpcId": vpc.id(),
                "routes": default_routes(&internet_gateway),
            }),
        )?;

        Ok(AwsVpc {
            namer,
            region: settings.region,
            vpc_cidr: settings.vpc_cidr,
            protect_resources: settings.protect_resources,
            vpc,
            internet_gateway,
            main_route_table,
        })
    }

    pub fn namer(&self) -> &Namer {
        &self.namer
    }

    pub fn root_resource_name(&self) -> &str {
        self.namer.resource_prefix()
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn vpc_cidr(&self) -> Ipv4 {
        self.vpc_cidr
    }

    pub fn protect_resources(&self) -> bool {
        self.protect_resources
    }

    pub fn vpc(&self) -> &ResourceRef {
        &self.vpc
    }

    pub fn internet_gateway(&self) -> &ResourceRef {
        &self.internet_gateway
    }

    pub fn main_route_table(&self) -> &ResourceRef {
        &self.main_route_table
    }
}

/// `0.0.0.0/0` through the internet gateway.
fn default_routes(internet_gateway: &ResourceRef) -> Value {
    json!([{
        "cidrBlock": DEFAULT_ROUTE_CIDR,
        "gatewayId": internet_gateway.id(),
    }])
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::stack::AutoTags;

    pub fn stack(protect: bool) -> Stack {
        Stack::new(protect, AutoTags::new("networking", "dev", "moderate"))
    }

    pub fn settings(protect: bool) -> NetworkSettings {
        NetworkSettings {
            environment: "dev".to_string(),
            region: "us-east-1".to_string(),
            root_tag_name: "Platform k8s".to_string(),
            root_resource_name: "platform-k8s".to_string(),
            vpc_cidr: Ipv4::new("10.20.0.0/16").unwrap(),
            protect_resources: protect,
        }
    }

    pub fn network(protect: bool) -> (Stack, AwsVpc) {
        let mut stack = stack(protect);
        let vpc = AwsVpc::new(&mut stack, settings(protect)).unwrap();
        (stack, vpc)
    }
}
