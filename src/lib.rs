// cargo watch -x 'fmt' -x 'test'

//! IPv4 subnet planning with variable-length subnet masks.
//!
//! [`allocate`] carves a base network into the smallest non-overlapping subnets that
//! satisfy a list of host counts. [`allocate_cidr`] is the string-in, records-out form
//! used by UI and report layers.

pub mod cmd;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

pub use error::{PlanError, Result};
pub use models::{AddressBlock, Allocation, AllocationResult, AllocationStep, Strategy};
pub use output::SubnetRecord;
pub use processing::allocate;

/// Allocate from textual input.
///
/// # Arguments
/// * `base` - Base network, e.g. `"192.168.1.0/24"`
/// * `host_counts` - Hosts per subnet; zero and negative entries are dropped
/// * `strategy` - `"first"` or `"last"`
///
/// # Examples
/// ```
/// let records = vlsm_planner::allocate_cidr("192.168.1.0/24", &[50, 30, 10], "first").unwrap();
/// assert_eq!(records[0].network, "192.168.1.0/26");
/// assert_eq!(records[2].network, "192.168.1.96/28");
/// ```
pub fn allocate_cidr(base: &str, host_counts: &[i64], strategy: &str) -> Result<Vec<SubnetRecord>> {
    let base = AddressBlock::base_network(base)?;
    let strategy: Strategy = strategy.parse()?;
    let allocation = allocate(base, host_counts, strategy)?;
    Ok(output::to_records(&allocation))
}
