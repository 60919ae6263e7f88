//! Input/output helpers.
//!
//! - CSV ingest + inline list parsing (`ingest`)
//! - band CSV export (`export`)
//! - band JSON read/write (`band_file`)

pub mod band_file;
pub mod export;
pub mod ingest;

pub use band_file::*;
pub use export::*;
pub use ingest::*;
