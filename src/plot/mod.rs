//! Chart rendering.
//!
//! - `ascii`: fixed-grid text chart for plain terminal output
//! - `chart`: Plotters drawing shared by the interactive view and SVG output
//! - `svg`: SVG file output

pub mod ascii;
pub mod chart;
pub mod svg;

pub use ascii::*;
pub use chart::*;
pub use svg::*;
