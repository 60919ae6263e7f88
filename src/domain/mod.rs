//! Data types shared by fitting, plotting, export and the UI.

pub mod types;

pub use types::*;
