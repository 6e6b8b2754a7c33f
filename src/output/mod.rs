//! Output formatting for allocation results.
//!
//! - [`csv`] - CSV output formatting
//! - [`json`] - JSON records with camelCase field names
//! - [`report`] - Step-by-step derivation text
//! - [`terminal`] - Terminal tables with colors

pub mod csv;
pub mod json;
pub mod report;
pub mod terminal;

pub use self::csv::write_csv;
pub use self::json::{to_records, write_json, SubnetRecord};
pub use self::report::{describe_steps, render_outcome, render_report, StepReport};
pub use self::terminal::{format_field, write_free, write_table};
