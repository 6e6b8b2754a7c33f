//! Terminal output utilities.
//!
//! Aligned, colored tables for allocation results and remaining free space.

use crate::models::Allocation;
use colored::Colorize;
use std::io::{self, Write};

/// Format a value as a left-aligned field of at least `width` characters.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    if value_str.len() >= width {
        value_str
    } else {
        format!("{value_str:<width$}")
    }
}

const COLUMNS: [(&str, usize); 9] = [
    ("#", 4),
    ("hosts", 10),
    ("subnet", 19),
    ("first", 16),
    ("last", 16),
    ("broadcast", 16),
    ("mask", 16),
    ("wildcard", 16),
    ("usable", 10),
];

/// Write the allocation results as an aligned table.
pub fn write_table<W: Write>(out: &mut W, allocation: &Allocation) -> io::Result<()> {
    let header: String = COLUMNS
        .iter()
        .map(|(name, width)| format_field(name, *width))
        .collect::<Vec<String>>()
        .join(" ");
    writeln!(out, "{}", header.trim_end().bold())?;

    for r in &allocation.results {
        let fields = [
            r.requirement.label.to_string(),
            r.requirement.host_count.to_string(),
            r.assigned_block.to_string(),
            r.first_usable.to_string(),
            r.last_usable.to_string(),
            r.broadcast.to_string(),
            r.subnet_mask.to_string(),
            r.wildcard_mask.to_string(),
            r.usable_host_count.to_string(),
        ];
        let line = fields
            .iter()
            .zip(COLUMNS.iter())
            .map(|(value, (_, width))| format_field(value, *width))
            .collect::<Vec<String>>()
            .join(" ");
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

/// Write the fragments left free after the allocation.
pub fn write_free<W: Write>(out: &mut W, allocation: &Allocation) -> io::Result<()> {
    let free = allocation.free_blocks();
    writeln!(
        out,
        "{} ({} run(s), {} addresses)",
        "Free space".bold(),
        free.len(),
        free.iter().map(|r| r.size()).sum::<u64>()
    )?;
    for run in free {
        writeln!(out, "  {run}")?;
    }
    Ok(())
}
