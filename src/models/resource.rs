//! Declared cloud resources and the references between them.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Provider resource types this crate declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Vpc,
    InternetGateway,
    RouteTable,
    RouteTableAssociation,
    Subnet,
    Eip,
    NatGateway,
    VpcEndpoint,
    LogGroup,
    IamRole,
    IamRolePolicy,
    FlowLog,
}

impl ResourceKind {
    /// Provider type token written into the document.
    pub fn type_token(&self) -> &'static str {
        match self {
            ResourceKind::Vpc => "aws:ec2/vpc:Vpc",
            ResourceKind::InternetGateway => "aws:ec2/internetGateway:InternetGateway",
            ResourceKind::RouteTable => "aws:ec2/routeTable:RouteTable",
            ResourceKind::RouteTableAssociation => {
                "aws:ec2/routeTableAssociation:RouteTableAssociation"
            }
            ResourceKind::Subnet => "aws:ec2/subnet:Subnet",
            ResourceKind::Eip => "aws:ec2/eip:Eip",
            ResourceKind::NatGateway => "aws:ec2/natGateway:NatGateway",
            ResourceKind::VpcEndpoint => "aws:ec2/vpcEndpoint:VpcEndpoint",
            ResourceKind::LogGroup => "aws:cloudwatch/logGroup:LogGroup",
            ResourceKind::IamRole => "aws:iam/role:Role",
            ResourceKind::IamRolePolicy => "aws:iam/rolePolicy:RolePolicy",
            ResourceKind::FlowLog => "aws:ec2/flowLog:FlowLog",
        }
    }

    /// Associations and inline role policies have no tags in the provider schema.
    pub fn taggable(&self) -> bool {
        !matches!(
            self,
            ResourceKind::RouteTableAssociation | ResourceKind::IamRolePolicy
        )
    }
}

impl Serialize for ResourceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.type_token())
    }
}

/// An attribute of a declared resource, resolved by the engine at apply time.
///
/// Renders as `${logical-name.attribute}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Output {
    pub resource: String,
    pub attribute: &'static str,
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}.{}}}", self.resource, self.attribute)
    }
}

impl Serialize for Output {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<Output> for Value {
    fn from(output: Output) -> Value {
        Value::String(output.to_string())
    }
}

/// Handle to a declared resource. Only [`crate::stack::Stack::declare`] hands these out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    name: String,
    kind: ResourceKind,
}

impl ResourceRef {
    pub(crate) fn new(name: String, kind: ResourceKind) -> Self {
        ResourceRef { name, kind }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn attr(&self, attribute: &'static str) -> Output {
        Output {
            resource: self.name.clone(),
            attribute,
        }
    }

    pub fn id(&self) -> Output {
        self.attr("id")
    }

    pub fn arn(&self) -> Output {
        self.attr("arn")
    }
}

/// Engine options attached to every resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResourceOptions {
    pub protect: bool,
}

/// One entry of the resource graph document.
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub properties: Map<String, Value>,
    pub options: ResourceOptions,
}

impl Resource {
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.properties.get("tags")?.get(key)?.as_str()
    }
}
