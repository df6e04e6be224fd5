//! Utility modules
//!
//! - Error types and result types
//! - Run reports

pub mod error;
pub mod report;

pub use error::{FilterError, FilterResult};
pub use report::FilterReport;
