//! Allocation results and the per-step trace.

use super::fragment::{BlockRun, Fragment};
use super::ipv4::AddressBlock;
use super::requirement::{Requirement, Strategy};
use serde::Serialize;
use std::net::Ipv4Addr;

/// The subnet assigned to one requirement, with its derived addresses.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AllocationResult {
    pub assigned_block: AddressBlock,
    pub network_address: Ipv4Addr,
    pub first_usable: Ipv4Addr,
    pub last_usable: Ipv4Addr,
    pub broadcast: Ipv4Addr,
    pub subnet_mask: Ipv4Addr,
    pub wildcard_mask: Ipv4Addr,
    pub usable_host_count: u64,
    pub requirement: Requirement,
}

impl AllocationResult {
    pub fn new(block: AddressBlock, requirement: Requirement) -> AllocationResult {
        AllocationResult {
            assigned_block: block,
            network_address: Ipv4Addr::from(block.addr),
            first_usable: Ipv4Addr::from(block.first_usable()),
            last_usable: Ipv4Addr::from(block.last_usable()),
            broadcast: Ipv4Addr::from(block.broadcast()),
            subnet_mask: block.mask(),
            wildcard_mask: block.wildcard(),
            usable_host_count: block.usable_hosts(),
            requirement,
        }
    }

    pub fn prefix(&self) -> u8 {
        self.assigned_block.prefix
    }
}

/// Trace record of one requirement being placed.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AllocationStep {
    pub requirement: Requirement,
    /// Block the assignment was carved from.
    pub parent_block: AddressBlock,
    pub parent_prefix: u8,
    pub target_prefix: u8,
    pub pool_before: Vec<Fragment>,
    pub pool_after: Vec<Fragment>,
    /// Children of `parent_block` at `target_prefix`. A single block when no split happened.
    pub all_child_blocks: BlockRun,
    pub chosen_child_index: u64,
}

impl AllocationStep {
    pub fn assigned_block(&self) -> AddressBlock {
        self.all_child_blocks
            .get(self.chosen_child_index)
            .unwrap_or(self.parent_block)
    }

    pub fn borrowed_bits(&self) -> u8 {
        self.target_prefix - self.parent_prefix
    }

    pub fn was_split(&self) -> bool {
        self.target_prefix > self.parent_prefix
    }
}

/// Everything one `allocate` call produces.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub base: AddressBlock,
    pub strategy: Strategy,
    /// Sorted by ascending prefix, then by original input position.
    pub results: Vec<AllocationResult>,
    /// One entry per requirement, in processing order.
    pub steps: Vec<AllocationStep>,
    /// Pool state after the last step.
    pub pool: Vec<Fragment>,
}

impl Allocation {
    /// Runs of address space left unassigned.
    pub fn free_blocks(&self) -> Vec<BlockRun> {
        self.pool.iter().filter(|f| !f.used).map(|f| f.run).collect()
    }

    /// Addresses handed out to subnets.
    pub fn total_allocated(&self) -> u64 {
        self.results.iter().map(|r| r.assigned_block.size()).sum()
    }

    /// Share of the base network handed out, in `0.0..=1.0`.
    pub fn utilisation(&self) -> f64 {
        self.total_allocated() as f64 / self.base.size() as f64
    }
}
