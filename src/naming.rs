//! Logical resource names and `Name` tags.
//!
//! Every name in the stack comes from [`Namer`] so the templates live in one
//! place. Logical names keep their historical shapes (including the
//! `-utility-` infix on every subnet association) because the engine keys its
//! state by them.

use crate::models::SubnetPurpose;

/// What is being named.
#[derive(Debug, Clone, Copy)]
pub enum Component<'a> {
    Vpc,
    InternetGateway,
    MainRouteTable,
    /// The shared utility subnet; its logical name omits the zone.
    UtilitySubnet {
        zone: &'a str,
    },
    UtilitySubnetAssociation,
    Subnet {
        zone: &'a str,
        purpose: &'a SubnetPurpose,
    },
    SubnetRouteTable {
        zone: &'a str,
        purpose: &'a SubnetPurpose,
    },
    SubnetAssociation {
        zone: &'a str,
        purpose: &'a SubnetPurpose,
    },
    NatEip {
        zone: &'a str,
    },
    NatGateway {
        zone: &'a str,
    },
    VpcEndpoint,
    FlowLogGroup,
    FlowLogRole,
    FlowLogRolePolicy,
    FlowLog,
}

/// Prefixes and environment shared by every name in one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namer {
    resource_prefix: String,
    tag_prefix: String,
    environment: String,
}

fn dash_color(purpose: &SubnetPurpose) -> String {
    purpose
        .color()
        .map(|c| format!("-{c}"))
        .unwrap_or_default()
}

fn space_color(purpose: &SubnetPurpose) -> String {
    purpose
        .color()
        .map(|c| format!(" {c}"))
        .unwrap_or_default()
}

impl Namer {
    pub fn new(resource_prefix: &str, tag_prefix: &str, environment: &str) -> Self {
        Namer {
            resource_prefix: resource_prefix.to_string(),
            tag_prefix: tag_prefix.to_string(),
            environment: environment.to_string(),
        }
    }

    pub fn resource_prefix(&self) -> &str {
        &self.resource_prefix
    }

    /// Logical name of the component, unique within the stack.
    pub fn resource_name(&self, component: Component<'_>) -> String {
        let res = &self.resource_prefix;
        let env = &self.environment;
        match component {
            Component::Vpc => format!("{res}-vpc-{env}"),
            Component::InternetGateway => format!("{res}-vpc-ig-{env}"),
            Component::MainRouteTable => format!("{res}-route-table-{env}"),
            Component::UtilitySubnet { .. } => format!("{res}-utility-public-subnet-{env}"),
            Component::UtilitySubnetAssociation => {
                format!("{res}-utility-public-subnet-association-{env}")
            }
            Component::Subnet { zone, purpose } => format!(
                "{res}-{}-subnet-{zone}{}-{env}",
                purpose.use_word(),
                dash_color(purpose)
            ),
            Component::SubnetRouteTable { zone, purpose } => format!(
                "{res}-{}-route-table-{zone}{}-{env}",
                purpose.use_word(),
                dash_color(purpose)
            ),
            Component::SubnetAssociation { zone, purpose } => format!(
                "{res}-utility-{}-subnet-association-{zone}{}-{env}",
                purpose.use_word(),
                dash_color(purpose)
            ),
            Component::NatEip { zone } => format!("{res}-nat-eip-{zone}-{env}"),
            Component::NatGateway { zone } => format!("{res}-nat-gateway-{zone}-{env}"),
            Component::VpcEndpoint => format!("{res}-vpc-endpoint-{env}"),
            Component::FlowLogGroup => format!("{res}-log-group-{env}"),
            Component::FlowLogRole => format!("{res}-log-role-{env}"),
            Component::FlowLogRolePolicy => format!("{res}-log-role-policy-{env}"),
            Component::FlowLog => format!("{res}-flow-log-{env}"),
        }
    }

    /// Human readable `Name` tag, `None` for components that cannot be tagged.
    pub fn tag_name(&self, component: Component<'_>) -> Option<String> {
        let tag = &self.tag_prefix;
        let env = &self.environment;
        let name = match component {
            Component::Vpc => format!("{tag} VPC {env}"),
            Component::InternetGateway => format!("{tag} VPC Internet Gateway {env}"),
            Component::MainRouteTable => format!("{tag} route table {env}"),
            Component::UtilitySubnet { zone } => format!("{tag} Utility Subnet {zone} {env}"),
            Component::Subnet { zone, purpose } => format!(
                "{tag} {} Subnet {zone}{} {env}",
                purpose.tag_word(),
                space_color(purpose)
            ),
            Component::SubnetRouteTable { zone, purpose } => format!(
                "{tag} {} route table {zone}{} {env}",
                purpose.tag_word(),
                space_color(purpose)
            ),
            Component::NatEip { zone } => format!("{tag} NAT EIP {zone} {env}"),
            Component::NatGateway { zone } => format!("{tag} NAT Gateway {zone} {env}"),
            Component::VpcEndpoint => format!("{tag} VPC Endpoint {env}"),
            Component::FlowLogGroup => format!("{tag} Flow Logs Group {env}"),
            Component::FlowLogRole => format!("{tag} Flow Logs Role {env}"),
            Component::FlowLog => format!("{tag} Flow Log {env}"),
            Component::UtilitySubnetAssociation
            | Component::SubnetAssociation { .. }
            | Component::FlowLogRolePolicy => return None,
        };
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeployColor;

    fn namer() -> Namer {
        Namer::new("platform-k8s", "Platform k8s", "dev")
    }

    #[test]
    fn network_level_names() {
        let n = namer();
        assert_eq!(n.resource_name(Component::Vpc), "platform-k8s-vpc-dev");
        assert_eq!(
            n.resource_name(Component::InternetGateway),
            "platform-k8s-vpc-ig-dev"
        );
        assert_eq!(
            n.resource_name(Component::MainRouteTable),
            "platform-k8s-route-table-dev"
        );
        assert_eq!(
            n.tag_name(Component::InternetGateway).unwrap(),
            "Platform k8s VPC Internet Gateway dev"
        );
    }

    #[test]
    fn subnet_names_carry_zone_and_color() {
        let n = namer();
        let blue = SubnetPurpose::Private(DeployColor::new("blue"));
        let public = SubnetPurpose::Public;
        assert_eq!(
            n.resource_name(Component::Subnet {
                zone: "us-east-1a",
                purpose: &blue
            }),
            "platform-k8s-private-subnet-us-east-1a-blue-dev"
        );
        assert_eq!(
            n.resource_name(Component::SubnetRouteTable {
                zone: "us-east-1b",
                purpose: &public
            }),
            "platform-k8s-public-route-table-us-east-1b-dev"
        );
        assert_eq!(
            n.resource_name(Component::SubnetAssociation {
                zone: "us-east-1a",
                purpose: &blue
            }),
            "platform-k8s-utility-private-subnet-association-us-east-1a-blue-dev"
        );
        assert_eq!(
            n.tag_name(Component::Subnet {
                zone: "us-east-1a",
                purpose: &blue
            })
            .unwrap(),
            "Platform k8s Private Subnet us-east-1a blue dev"
        );
    }

    #[test]
    fn utility_subnet_tag_differs_from_public() {
        let n = namer();
        let public_tag = n
            .tag_name(Component::Subnet {
                zone: "us-east-1a",
                purpose: &SubnetPurpose::Public,
            })
            .unwrap();
        let utility = Component::UtilitySubnet { zone: "us-east-1a" };
        assert_ne!(n.tag_name(utility).unwrap(), public_tag);
        assert_eq!(
            n.tag_name(utility).unwrap(),
            "Platform k8s Utility Subnet us-east-1a dev"
        );
        assert_eq!(
            n.resource_name(utility),
            "platform-k8s-utility-public-subnet-dev"
        );
    }

    #[test]
    fn untaggable_components_have_no_tag() {
        let n = namer();
        assert!(n.tag_name(Component::FlowLogRolePolicy).is_none());
        assert!(n.tag_name(Component::UtilitySubnetAssociation).is_none());
    }
}
