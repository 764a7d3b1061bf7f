//! CSV report of the subnet allocation.

use crate::error::Result;
use crate::models::{broadcast_addr, usable_hosts, SubnetPurpose};
use crate::network::{AllocatedSubnet, SubnetHandle};
use crate::platform_k8s::PlatformK8s;
use std::io::Write;

use super::terminal::{format_field, purpose_label};

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetRow {
    pub cnt: usize,
    pub purpose: SubnetPurpose,
    pub zone: String,
    pub subnet_cidr: String,
    pub broadcast: String,
    pub usable_hosts: u64,
    pub subnet_name: String,
    pub route_table: String,
}

fn subnet_row(cnt: usize, subnet: &SubnetHandle, route_table: &str) -> Result<SubnetRow> {
    Ok(SubnetRow {
        cnt,
        purpose: subnet.purpose.clone(),
        zone: subnet.zone.clone(),
        subnet_cidr: subnet.cidr.to_string(),
        broadcast: broadcast_addr(subnet.cidr.addr, subnet.cidr.mask)?.to_string(),
        usable_hosts: usable_hosts(subnet.cidr.mask)?,
        subnet_name: subnet.resource.name().to_string(),
        route_table: route_table.to_string(),
    })
}

fn routed<'a>(
    allocated: &'a AllocatedSubnet,
    main_route_table: &'a str,
) -> (&'a SubnetHandle, &'a str) {
    let table = allocated
        .routing
        .as_ref()
        .map_or(main_route_table, |r| r.route_table.name());
    (&allocated.subnet, table)
}

/// Rows sorted by subnet block, so the slot layout reads top to bottom.
pub fn subnet_rows(platform: &PlatformK8s) -> Result<Vec<SubnetRow>> {
    let main_route_table = platform.vpc.main_route_table().name();
    let mut subnets: Vec<(&SubnetHandle, &str)> =
        vec![(&platform.utility_subnet, main_route_table)];
    for zone in &platform.zones {
        subnets.extend(
            zone.public_subnet
                .iter()
                .chain(zone.private_subnets.iter())
                .map(|allocated| routed(allocated, main_route_table)),
        );
    }
    subnets.sort_by_key(|(s, _)| s.cidr);

    subnets
        .into_iter()
        .enumerate()
        .map(|(i, (subnet, table))| subnet_row(i + 1, subnet, table))
        .collect()
}

/// Write the CSV header and one line per subnet.
pub fn write_subnets<W: Write>(out: &mut W, platform: &PlatformK8s) -> Result<usize> {
    let rows = subnet_rows(platform)?;
    log::info!(
        "#Start write_subnets() {} subnets in {}",
        rows.len(),
        platform.vpc.vpc_cidr()
    );

    writeln!(
        out,
        r#" "cnt",       "purpose",      "zone",     "subnet_cidr",        "broadcast", "hosts",                                  "subnet_name",                         "route_table""#
    )?;
    for row in &rows {
        log::debug!("{} {}", purpose_label(&row.purpose), row.subnet_cidr);
        writeln!(out, "{}", csv_line(row))?;
    }
    Ok(rows.len())
}

/// Print the report to stdout after a timestamped banner.
pub fn subnet_print(platform: &PlatformK8s) -> Result<()> {
    let now = chrono::Utc::now();
    println!(
        "# {} subnets of {} generated {}",
        platform.root_resource_name(),
        platform.vpc.vpc_cidr(),
        now.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    write_subnets(&mut lock, platform)?;
    Ok(())
}

fn csv_line(row: &SubnetRow) -> String {
    format!(
        r#"{cnt},{purpose},{zone},{subnet_cidr},{broadcast},{hosts},{subnet_name},{route_table}"#,
        cnt = format_field(row.cnt, 6),
        purpose = format_field(&row.purpose, 16),
        zone = format_field(&row.zone, 12),
        subnet_cidr = format_field(&row.subnet_cidr, 18),
        broadcast = format_field(format!("{}_br", row.broadcast), 19),
        hosts = format_field(row.usable_hosts, 8),
        subnet_name = format_field(&row.subnet_name, 56),
        route_table = format_field(&row.route_table, 50),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use crate::synthesize;
    use std::path::Path;

    #[test]
    fn test_subnet_rows_dev() {
        let config = load_config(Path::new("src/tests/test_data/platform_k8s_dev.toml"))
            .expect("Error reading test config");
        let synthesis = synthesize(&config).expect("Error synthesizing");
        let rows = subnet_rows(synthesis.platform()).unwrap();

        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].purpose, SubnetPurpose::Utility);
        assert_eq!(rows[0].subnet_cidr, "10.20.0.0/24");
        assert_eq!(rows[0].route_table, "platform-k8s-route-table-dev");
        assert_eq!(rows[1].subnet_cidr, "10.20.1.0/24");
        assert_eq!(rows[3].subnet_cidr, "10.20.16.0/24");
        assert_eq!(rows[3].broadcast, "10.20.16.255");
        assert_eq!(rows[3].usable_hosts, 251);
        assert_eq!(
            rows[6].subnet_name,
            "platform-k8s-private-subnet-us-east-1b-green-dev"
        );
        assert_eq!(
            rows[6].route_table,
            "platform-k8s-private-route-table-us-east-1b-green-dev"
        );
    }

    #[test]
    fn test_write_subnets_has_header_and_rows() {
        let config = load_config(Path::new("src/tests/test_data/platform_k8s_dev.toml"))
            .expect("Error reading test config");
        let synthesis = synthesize(&config).expect("Error synthesizing");
        let mut buf = Vec::new();
        let count = write_subnets(&mut buf, synthesis.platform()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(count, 7);
        assert_eq!(text.lines().count(), 8);
        assert!(text.lines().next().unwrap().contains("\"subnet_cidr\""));
        assert!(text.contains("\"10.20.64.0/24\""));
        assert!(text.contains("\"private/green\""));
    }
}
