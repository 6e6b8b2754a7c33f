//! Error types for subnet planning.
//!
//! Every kernel operation returns [`Result`], and no error is recovered from inside the
//! kernel. A failed allocation never hands back partial results.

/// Failures surfaced by address parsing, sizing and allocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The dotted string is not four octets in `0..=255`.
    #[error("Malformed address: '{0}'")]
    MalformedAddress(String),

    /// Base network prefix outside `1..=30`, or the CIDR string could not be parsed.
    #[error("Invalid base network '{input}': {reason}")]
    InvalidBaseNetwork { input: String, reason: String },

    /// Every supplied host count was absent, zero or negative.
    #[error("No valid host requirements (all entries are empty or <= 0)")]
    NoValidRequirements,

    /// The host count does not fit even in a /1 block.
    #[error("{hosts} hosts exceed the capacity of a /1 block")]
    UnsatisfiableHostCount { hosts: u64 },

    /// No free fragment is large enough for a requirement. Aborts the whole allocation.
    #[error("Insufficient space: no free block can host subnet #{label} ({hosts} hosts, needs /{prefix})")]
    InsufficientSpace { label: usize, hosts: u64, prefix: u8 },

    /// Strategy name other than `first` or `last`.
    #[error("Unknown strategy '{0}', expected 'first' or 'last'")]
    UnknownStrategy(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
