//! Flow-log bundle: log group, capture role, role policy and the flow log.

use super::AwsVpc;
use crate::config::FlowLogPolicyScope;
use crate::error::Result;
use crate::models::{ResourceKind, ResourceRef};
use crate::naming::Component;
use crate::stack::Stack;
use serde_json::{json, Value};

pub const FLOW_LOG_RETENTION_DAYS: u32 = 60;
pub const FLOW_LOG_SERVICE_PRINCIPAL: &str = "vpc-flow-logs.amazonaws.com";

const FLOW_LOG_ACTIONS: [&str; 5] = [
    "logs:CreateLogGroup",
    "logs:CreateLogStream",
    "logs:PutLogEvents",
    "logs:DescribeLogGroups",
    "logs:DescribeLogStreams",
];

/// The four flow-log resources. Declared together or not at all.
#[derive(Debug, Clone)]
pub struct FlowLogBundle {
    pub log_group: ResourceRef,
    pub role: ResourceRef,
    pub flow_log: ResourceRef,
    pub role_policy: ResourceRef,
}

fn assume_role_policy() -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Sid": "",
            "Effect": "Allow",
            "Principal": { "Service": FLOW_LOG_SERVICE_PRINCIPAL },
            "Action": "sts:AssumeRole",
        }],
    })
}

fn role_policy(scope: FlowLogPolicyScope, log_group: &ResourceRef) -> Value {
    let resource = match scope {
        FlowLogPolicyScope::AllLogGroups => json!("*"),
        FlowLogPolicyScope::LogGroup => json!([
            log_group.arn().to_string(),
            format!("{}:*", log_group.arn()),
        ]),
    };
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Action": FLOW_LOG_ACTIONS,
            "Effect": "Allow",
            "Resource": resource,
        }],
    })
}

impl AwsVpc {
    /// Capture ALL traffic of the VPC into `/aws/flowlogs/{root}`.
    pub fn create_vpc_flow_logs(
        &self,
        stack: &mut Stack,
        scope: FlowLogPolicyScope,
    ) -> Result<FlowLogBundle> {
        let namer = self.namer();

        let log_group = stack.declare(
            ResourceKind::LogGroup,
            namer.resource_name(Component::FlowLogGroup),
            namer.tag_name(Component::FlowLogGroup),
            json!({
                "name": format!("/aws/flowlogs/{}", self.root_resource_name()),
                "retentionInDays": FLOW_LOG_RETENTION_DAYS,
            }),
        )?;
        let role = stack.declare(
            ResourceKind::IamRole,
            namer.resource_name(Component::FlowLogRole),
            namer.tag_name(Component::FlowLogRole),
            json!({ "assumeRolePolicy": serde_json::to_string(&assume_role_policy())? }),
        )?;
        let flow_log = stack.declare(
            ResourceKind::FlowLog,
            namer.resource_name(Component::FlowLog),
            namer.tag_name(Component::FlowLog),
            json!({
                "iamRoleArn": role.arn(),
                "logDestination": log_group.arn(),
                "trafficType": "ALL",
                "vpcId": self.vpc().id(),
            }),
        )?;
        if scope == FlowLogPolicyScope::AllLogGroups {
            log::warn!(
                "flow-log role {} may write to every log group; set flow_log_policy_scope = \"log_group\" to narrow it",
                role.name()
            );
        }
        let role_policy = stack.declare(
            ResourceKind::IamRolePolicy,
            namer.resource_name(Component::FlowLogRolePolicy),
            None,
            json!({
                "role": role.id(),
                "policy": serde_json::to_string(&role_policy(scope, &log_group))?,
            }),
        )?;

        Ok(FlowLogBundle {
            log_group,
            role,
            flow_log,
            role_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::network;
    use super::*;

    fn policy_document(stack: &Stack, bundle: &FlowLogBundle) -> Value {
        let policy = stack
            .get(bundle.role_policy.name())
            .unwrap()
            .property("policy")
            .unwrap()
            .as_str()
            .unwrap()
            .to_string();
        serde_json::from_str(&policy).unwrap()
    }

    #[test]
    fn bundle_declares_four_resources() {
        let (mut stack, vpc) = network(true);
        let before = stack.resources().len();
        let bundle = vpc
            .create_vpc_flow_logs(&mut stack, FlowLogPolicyScope::AllLogGroups)
            .unwrap();
        assert_eq!(stack.resources().len(), before + 4);

        let group = stack.get(bundle.log_group.name()).unwrap();
        assert_eq!(group.property("name"), Some(&json!("/aws/flowlogs/platform-k8s")));
        assert_eq!(group.property("retentionInDays"), Some(&json!(60)));
        assert!(group.options.protect);

        let flow_log = stack.get(bundle.flow_log.name()).unwrap();
        assert_eq!(flow_log.property("trafficType"), Some(&json!("ALL")));
        assert_eq!(
            flow_log.property("logDestination"),
            Some(&json!("${platform-k8s-log-group-dev.arn}"))
        );
        assert_eq!(
            flow_log.property("iamRoleArn"),
            Some(&json!("${platform-k8s-log-role-dev.arn}"))
        );

        let role = stack.get(bundle.role.name()).unwrap();
        let trust: Value =
            serde_json::from_str(role.property("assumeRolePolicy").unwrap().as_str().unwrap())
                .unwrap();
        assert_eq!(
            trust["Statement"][0]["Principal"]["Service"],
            json!("vpc-flow-logs.amazonaws.com")
        );
    }

    #[test]
    fn default_policy_is_unscoped() {
        let (mut stack, vpc) = network(false);
        let bundle = vpc
            .create_vpc_flow_logs(&mut stack, FlowLogPolicyScope::AllLogGroups)
            .unwrap();
        let policy = policy_document(&stack, &bundle);
        assert_eq!(policy["Statement"][0]["Resource"], json!("*"));
        assert_eq!(
            policy["Statement"][0]["Action"].as_array().unwrap().len(),
            5
        );
    }

    #[test]
    fn scoped_policy_targets_log_group() {
        let (mut stack, vpc) = network(false);
        let bundle = vpc
            .create_vpc_flow_logs(&mut stack, FlowLogPolicyScope::LogGroup)
            .unwrap();
        let policy = policy_document(&stack, &bundle);
        assert_eq!(
            policy["Statement"][0]["Resource"],
            json!([
                "${platform-k8s-log-group-dev.arn}",
                "${platform-k8s-log-group-dev.arn}:*"
            ])
        );
        assert!(stack
            .dependencies(bundle.role_policy.name())
            .contains("platform-k8s-log-group-dev"));
    }
}
