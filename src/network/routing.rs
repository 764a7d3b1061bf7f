//! Route table associations.

use super::{AwsVpc, SubnetHandle};
use crate::error::{Error, Result};
use crate::models::{ResourceKind, ResourceRef, SubnetPurpose};
use crate::naming::Component;
use crate::stack::Stack;
use serde_json::{json, Value};

impl AwsVpc {
    /// Bind `subnet` to `route_table`, or to the main route table when none is given.
    ///
    /// A subnet can only be associated once.
    pub fn create_subnet_association(
        &self,
        stack: &mut Stack,
        subnet: &SubnetHandle,
        resource_name: Option<String>,
        route_table: Option<&ResourceRef>,
    ) -> Result<ResourceRef> {
        let subnet_id = Value::from(subnet.resource.id());
        if let Some(existing) = stack
            .of_kind(ResourceKind::RouteTableAssociation)
            .find(|r| r.property("subnetId") == Some(&subnet_id))
        {
            return Err(Error::declaration(format!(
                "subnet '{}' is already associated by '{}'",
                subnet.resource.name(),
                existing.name
            )));
        }

        let name = resource_name.unwrap_or_else(|| {
            let component = match subnet.purpose {
                SubnetPurpose::Utility => Component::UtilitySubnetAssociation,
                _ => Component::SubnetAssociation {
                    zone: &subnet.zone,
                    purpose: &subnet.purpose,
                },
            };
            self.namer().resource_name(component)
        });
        let route_table = route_table.unwrap_or(self.main_route_table());
        if route_table.kind() != ResourceKind::RouteTable {
            return Err(Error::declaration(format!(
                "'{}' is not a route table, cannot associate subnet '{}'",
                route_table.name(),
                subnet.resource.name()
            )));
        }

        stack.declare(
            ResourceKind::RouteTableAssociation,
            name,
            None,
            json!({
                "subnetId": subnet_id,
                "routeTableId": route_table.id(),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::network;
    use super::super::SubnetRequest;
    use super::*;

    fn utility(stack: &mut Stack, vpc: &AwsVpc) -> SubnetHandle {
        vpc.create_subnet(
            stack,
            SubnetRequest {
                zone: "us-east-1a",
                slot: 0,
                resource_name: None,
                create_route_table: false,
                purpose: SubnetPurpose::Utility,
            },
        )
        .unwrap()
        .subnet
    }

    #[test]
    fn defaults_to_main_route_table() {
        let (mut stack, vpc) = network(false);
        let subnet = utility(&mut stack, &vpc);
        let assoc = vpc
            .create_subnet_association(&mut stack, &subnet, None, None)
            .unwrap();
        assert_eq!(
            assoc.name(),
            "platform-k8s-utility-public-subnet-association-dev"
        );
        let declared = stack.get(assoc.name()).unwrap();
        assert_eq!(
            declared.property("routeTableId"),
            Some(&json!("${platform-k8s-route-table-dev.id}"))
        );
        assert!(declared.property("tags").is_none());
    }

    #[test]
    fn association_target_must_be_a_route_table() {
        let (mut stack, vpc) = network(false);
        let subnet = utility(&mut stack, &vpc);
        let gateway = vpc.internet_gateway().clone();
        let err = vpc
            .create_subnet_association(&mut stack, &subnet, None, Some(&gateway))
            .unwrap_err();
        assert!(err.to_string().contains("is not a route table"));
        assert_eq!(stack.of_kind(ResourceKind::RouteTableAssociation).count(), 0);
    }

    #[test]
    fn second_association_is_rejected() {
        let (mut stack, vpc) = network(false);
        let subnet = utility(&mut stack, &vpc);
        vpc.create_subnet_association(&mut stack, &subnet, None, None)
            .unwrap();
        let err = vpc
            .create_subnet_association(&mut stack, &subnet, Some("again".to_string()), None)
            .unwrap_err();
        assert!(err.to_string().contains("already associated"));
    }
}
