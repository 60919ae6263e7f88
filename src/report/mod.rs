//! Reporting: terminal summary and markdown fit reports.

pub mod format;
pub mod markdown;

pub use format::*;
pub use markdown::*;
