//! Export functionality for analysis and reporting
//!
//! This module writes the learned tables and the trial log as CSV so runs can
//! be inspected and compared outside the crate.

mod trial_log;
mod value_tables;

pub use trial_log::TrialLogCsv;
pub use value_tables::{ValueTableCsv, ValueTableKind};
