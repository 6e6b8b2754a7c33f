//! JSON records handed to UI and report consumers.

use crate::models::{Allocation, AllocationResult};
use crate::output::report::{describe_steps, StepReport};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One allocated subnet, with string-typed addresses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetRecord {
    /// CIDR form, e.g. `192.168.1.0/26`.
    pub network: String,
    pub network_address: String,
    #[serde(rename = "firstIP")]
    pub first_ip: String,
    #[serde(rename = "lastIP")]
    pub last_ip: String,
    pub broadcast: String,
    pub subnet_mask: String,
    pub wildcard_mask: String,
    pub usable_hosts: u64,
    pub required_hosts: u64,
    pub prefix_length: u8,
    pub original_index: usize,
    pub label: usize,
}

impl From<&AllocationResult> for SubnetRecord {
    fn from(r: &AllocationResult) -> SubnetRecord {
        SubnetRecord {
            network: r.assigned_block.to_string(),
            network_address: r.network_address.to_string(),
            first_ip: r.first_usable.to_string(),
            last_ip: r.last_usable.to_string(),
            broadcast: r.broadcast.to_string(),
            subnet_mask: r.subnet_mask.to_string(),
            wildcard_mask: r.wildcard_mask.to_string(),
            usable_hosts: r.usable_host_count,
            required_hosts: r.requirement.host_count,
            prefix_length: r.prefix(),
            original_index: r.requirement.original_index,
            label: r.requirement.label,
        }
    }
}

pub fn to_records(allocation: &Allocation) -> Vec<SubnetRecord> {
    allocation.results.iter().map(SubnetRecord::from).collect()
}

/// Full JSON document: subnets, free space and optionally the derivation steps.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonDocument {
    base: String,
    strategy: String,
    subnets: Vec<SubnetRecord>,
    free: Vec<String>,
    /// Addresses left unassigned, whether listed or not.
    free_addresses: u64,
    /// Set when `free` stops short of all free blocks.
    free_truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<Vec<StepReport>>,
}

/// Write the allocation as pretty-printed JSON.
pub fn write_json<W: Write>(
    out: &mut W,
    allocation: &Allocation,
    with_steps: bool,
) -> serde_json::Result<()> {
    let free_runs = allocation.free_blocks();
    let free_count: u64 = free_runs.iter().map(|run| run.len()).sum();
    let doc = JsonDocument {
        base: allocation.base.to_string(),
        strategy: allocation.strategy.to_string(),
        subnets: to_records(allocation),
        free: free_runs
            .iter()
            .flat_map(|run| run.iter().take(MAX_LISTED_FREE).map(|b| b.to_string()))
            .take(MAX_LISTED_FREE)
            .collect(),
        free_addresses: free_runs.iter().map(|run| run.size()).sum(),
        free_truncated: free_count > MAX_LISTED_FREE as u64,
        steps: with_steps.then(|| describe_steps(&allocation.steps)),
    };
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out).map_err(serde_json::Error::io)?;
    Ok(())
}

/// Cap on individually listed free blocks; a /1 split into /30s would list 2^29.
const MAX_LISTED_FREE: usize = 1024;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Strategy;
    use crate::processing::allocate;

    #[test]
    fn test_record_field_names() {
        let allocation =
            allocate("192.168.1.0/24".parse().unwrap(), &[50], Strategy::First).unwrap();
        let records = to_records(&allocation);
        let value = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(value["network"], "192.168.1.0/26");
        assert_eq!(value["networkAddress"], "192.168.1.0");
        assert_eq!(value["firstIP"], "192.168.1.1");
        assert_eq!(value["lastIP"], "192.168.1.62");
        assert_eq!(value["broadcast"], "192.168.1.63");
        assert_eq!(value["subnetMask"], "255.255.255.192");
        assert_eq!(value["wildcardMask"], "0.0.0.63");
        assert_eq!(value["usableHosts"], 62);
        assert_eq!(value["requiredHosts"], 50);
        assert_eq!(value["prefixLength"], 26);
        assert_eq!(value["originalIndex"], 0);
        assert_eq!(value["label"], 1);
    }

    #[test]
    fn test_write_json() {
        let allocation =
            allocate("192.168.1.0/24".parse().unwrap(), &[50, 30, 10], Strategy::Last).unwrap();
        let mut buf = Vec::new();
        write_json(&mut buf, &allocation, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["base"], "192.168.1.0/24");
        assert_eq!(value["strategy"], "last");
        assert_eq!(value["subnets"].as_array().unwrap().len(), 3);
        assert_eq!(value["subnets"][0]["network"], "192.168.1.192/26");
        assert_eq!(value["steps"].as_array().unwrap().len(), 3);
        assert_eq!(
            value["free"],
            serde_json::json!(["192.168.1.0/28", "192.168.1.64/26", "192.168.1.128/26"])
        );
        assert_eq!(value["freeAddresses"], 144);
        assert_eq!(value["freeTruncated"], false);
    }

    #[test]
    fn test_write_json_without_steps() {
        let allocation =
            allocate("10.0.0.0/8".parse().unwrap(), &[2], Strategy::First).unwrap();
        let mut buf = Vec::new();
        write_json(&mut buf, &allocation, false).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert!(value.get("steps").is_none());
        assert_eq!(value["free"].as_array().unwrap().len(), MAX_LISTED_FREE);
        assert_eq!(value["free"][0], "10.0.0.4/30");
        assert_eq!(value["freeTruncated"], true);
        assert_eq!(value["freeAddresses"], (1u64 << 24) - 4);
    }

    /// Writer that accepts one complete JSON object and fails on anything after it.
    struct CloseAfterDocument {
        buf: Vec<u8>,
    }

    impl CloseAfterDocument {
        fn document_done(&self) -> bool {
            let open = self.buf.iter().filter(|&&b| b == b'{').count();
            let close = self.buf.iter().filter(|&&b| b == b'}').count();
            open > 0 && open == close
        }
    }

    impl Write for CloseAfterDocument {
        fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
            if self.document_done() {
                return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
            }
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_json_reports_io_error() {
        let allocation =
            allocate("10.0.0.0/24".parse().unwrap(), &[10], Strategy::First).unwrap();
        let mut out = CloseAfterDocument { buf: Vec::new() };
        let err = write_json(&mut out, &allocation, false).unwrap_err();
        assert!(err.is_io());
        let value: serde_json::Value = serde_json::from_slice(&out.buf).unwrap();
        assert_eq!(value["base"], "10.0.0.0/24");
    }
}
