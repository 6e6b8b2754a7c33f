//! Domain models for subnet planning.
//!
//! This module contains the core data structures used throughout the application:
//! - [`AddressBlock`] and the address/CIDR helpers in `ipv4`
//! - [`Requirement`] and [`Strategy`] - what to allocate and how to split
//! - [`Fragment`] and [`BlockRun`] - entries of the allocation pool
//! - [`Allocation`], [`AllocationResult`], [`AllocationStep`] - allocation output

mod allocation;
mod fragment;
mod ipv4;
mod requirement;

// Re-export public types
pub use allocation::{Allocation, AllocationResult, AllocationStep};
pub use fragment::{BlockRun, Fragment};
pub use ipv4::{
    block_size, broadcast_address, get_cidr_mask, minimal_prefix_for, network_address,
    prefix_to_mask, prefix_to_wildcard, to_dotted, to_int, usable_host_count, AddressBlock,
    MAX_LENGTH, MAX_PREFIX, MIN_PREFIX,
};
pub use requirement::{Requirement, Strategy};
