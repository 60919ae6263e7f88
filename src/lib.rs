//! `linfit` library crate.
//!
//! Least-squares line fitting with a confidence band, plus the chart output
//! around it. The binary (`linfit`) is a thin wrapper around this library so
//! that the fit and band math is testable without spawning processes or
//! opening a terminal.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
