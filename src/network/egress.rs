//! NAT gateways and the S3 endpoint.

use super::{AwsVpc, SubnetHandle};
use crate::error::{Error, Result};
use crate::models::{ResourceKind, ResourceRef};
use crate::naming::Component;
use crate::stack::Stack;
use serde_json::{json, Value};

/// A zone's NAT gateway and the elastic IP it owns.
#[derive(Debug, Clone)]
pub struct NatGateway {
    pub zone: String,
    pub eip: ResourceRef,
    pub nat_gateway: ResourceRef,
}

impl AwsVpc {
    /// Declare an elastic IP and a NAT gateway inside `public_subnet`.
    pub fn create_nat_gateway(
        &self,
        stack: &mut Stack,
        public_subnet: &SubnetHandle,
    ) -> Result<NatGateway> {
        if !public_subnet.purpose.is_public() {
            return Err(Error::declaration(format!(
                "NAT gateway needs a public subnet, '{}' is {}",
                public_subnet.resource.name(),
                public_subnet.purpose
            )));
        }
        let zone = public_subnet.zone.as_str();

        let eip_component = Component::NatEip { zone };
        let eip = stack.declare(
            ResourceKind::Eip,
            self.namer().resource_name(eip_component),
            self.namer().tag_name(eip_component),
            json!({ "domain": "vpc" }),
        )?;

        let nat_component = Component::NatGateway { zone };
        let nat_gateway = stack.declare(
            ResourceKind::NatGateway,
            self.namer().resource_name(nat_component),
            self.namer().tag_name(nat_component),
            json!({
                "allocationId": eip.id(),
                "subnetId": public_subnet.resource.id(),
            }),
        )?;
        log::info!("NAT gateway {} in {zone}", nat_gateway.name());

        Ok(NatGateway {
            zone: zone.to_string(),
            eip,
            nat_gateway,
        })
    }

    /// Declare the S3 gateway endpoint. One per network.
    ///
    /// No route tables are attached.
    pub fn create_vpc_endpoint(&self, stack: &mut Stack) -> Result<ResourceRef> {
        let vpc_id = Value::from(self.vpc().id());
        if let Some(existing) = stack
            .of_kind(ResourceKind::VpcEndpoint)
            .find(|r| r.property("vpcId") == Some(&vpc_id))
        {
            return Err(Error::declaration(format!(
                "'{}' already has endpoint '{}'",
                self.vpc().name(),
                existing.name
            )));
        }

        stack.declare(
            ResourceKind::VpcEndpoint,
            self.namer().resource_name(Component::VpcEndpoint),
            self.namer().tag_name(Component::VpcEndpoint),
            json!({
                "serviceName": format!("com.amazonaws.{}.s3", self.region()),
                "vpcId": vpc_id,
            }),
        )
    }
}
