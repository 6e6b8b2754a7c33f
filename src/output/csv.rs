//! CSV output of allocation results.

use crate::models::Allocation;
use std::io::{self, Write};

const HEADER: [&str; 12] = [
    "label",
    "original_index",
    "required_hosts",
    "network",
    "network_address",
    "first_ip",
    "last_ip",
    "broadcast",
    "subnet_mask",
    "wildcard_mask",
    "prefix_length",
    "usable_hosts",
];

/// Write results as CSV with a header row, one line per subnet.
pub fn write_csv<W: Write>(out: &mut W, allocation: &Allocation) -> io::Result<()> {
    writeln!(out, "{}", HEADER.join(","))?;
    for r in &allocation.results {
        let row = [
            r.requirement.label.to_string(),
            r.requirement.original_index.to_string(),
            r.requirement.host_count.to_string(),
            r.assigned_block.to_string(),
            r.network_address.to_string(),
            r.first_usable.to_string(),
            r.last_usable.to_string(),
            r.broadcast.to_string(),
            r.subnet_mask.to_string(),
            r.wildcard_mask.to_string(),
            r.prefix().to_string(),
            r.usable_host_count.to_string(),
        ];
        let line = row
            .iter()
            .map(|field| escape_csv_field(field))
            .collect::<Vec<String>>()
            .join(",");
        writeln!(out, "{line}")?;
    }
    Ok(())
}

pub fn escape_csv_field(input: &str) -> String {
    if input.contains(',') || input.contains('"') {
        // excel does not like spaces after comma between fields
        let escaped = input.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        input.to_string()
    }
}
