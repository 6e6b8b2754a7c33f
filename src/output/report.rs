//! Step-by-step derivation of an allocation.
//!
//! Works from the processing-order trace, not from the sorted results, so the text
//! follows the order in which subnets were actually carved.

use crate::error::Result;
use crate::models::{AddressBlock, Allocation, AllocationStep, MAX_LENGTH};
use serde::Serialize;
use std::fmt::Write;

/// Numbers behind one placement.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// 1-based processing position.
    pub step: usize,
    pub label: usize,
    pub required_hosts: u64,
    pub host_bits: u8,
    pub target_prefix: u8,
    pub parent_block: AddressBlock,
    pub borrowed_bits: u8,
    pub block_size: u64,
    pub subnet_count: u64,
    /// 1-based position of the assigned child among its siblings.
    pub chosen_position: u64,
    pub assigned_block: AddressBlock,
}

impl StepReport {
    pub fn from_step(step: usize, s: &AllocationStep) -> StepReport {
        StepReport {
            step,
            label: s.requirement.label,
            required_hosts: s.requirement.host_count,
            host_bits: MAX_LENGTH - s.target_prefix,
            target_prefix: s.target_prefix,
            parent_block: s.parent_block,
            borrowed_bits: s.borrowed_bits(),
            block_size: s.assigned_block().size(),
            subnet_count: s.all_child_blocks.len(),
            chosen_position: s.chosen_child_index + 1,
            assigned_block: s.assigned_block(),
        }
    }
}

pub fn describe_steps(steps: &[AllocationStep]) -> Vec<StepReport> {
    steps
        .iter()
        .enumerate()
        .map(|(i, s)| StepReport::from_step(i + 1, s))
        .collect()
}

/// Human readable derivation of every step.
pub fn render_report(allocation: &Allocation) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Base network {} ({} addresses), strategy '{}'",
        allocation.base,
        allocation.base.size(),
        allocation.strategy
    );
    for report in describe_steps(&allocation.steps) {
        render_step(&mut out, &report);
    }
    let _ = writeln!(
        out,
        "Allocated {} of {} addresses ({:.1}%)",
        allocation.total_allocated(),
        allocation.base.size(),
        allocation.utilisation() * 100.0
    );
    out
}

/// Report text for a successful allocation, or the error as a single line.
pub fn render_outcome(outcome: &Result<Allocation>) -> String {
    match outcome {
        Ok(allocation) => render_report(allocation),
        Err(e) => format!("Error: {e}\n"),
    }
}

fn render_step(out: &mut String, r: &StepReport) {
    let _ = writeln!(
        out,
        "Step {}: subnet #{} needs {} hosts",
        r.step, r.label, r.required_hosts
    );
    let _ = writeln!(
        out,
        "  host bits: {} (2^{} - 2 = {} >= {}) -> /{}",
        r.host_bits,
        r.host_bits,
        r.block_size.saturating_sub(2),
        r.required_hosts,
        r.target_prefix
    );
    if r.borrowed_bits == 0 {
        let _ = writeln!(
            out,
            "  parent block: {} is already /{}, no bits borrowed",
            r.parent_block, r.target_prefix
        );
        let _ = writeln!(out, "  assigned: whole block {}", r.assigned_block);
        return;
    }
    let _ = writeln!(
        out,
        "  parent block: {}, borrowed bits: {} - {} = {}",
        r.parent_block, r.target_prefix, r.parent_block.prefix, r.borrowed_bits
    );
    let _ = writeln!(
        out,
        "  block size: {} addresses, subnets: 2^{} = {}",
        r.block_size, r.borrowed_bits, r.subnet_count
    );
    let _ = writeln!(
        out,
        "  assigned: child {} of {} -> {}",
        r.chosen_position, r.subnet_count, r.assigned_block
    );
}
