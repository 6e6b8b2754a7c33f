//! Subnet allocation logic.
//!
//! - [`fragment_pool`] - Free and consumed address blocks of one allocation
//! - [`allocator`] - Requirement ordering, best-fit placement and the trace

mod allocator;
mod fragment_pool;

// Re-export public functions
pub use allocator::{allocate, allocate_requirements};
pub use fragment_pool::FragmentPool;
