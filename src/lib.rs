//! Side-by-side diagnostics for two MCMC chains: trace, posterior and
//! autocorrelation plots for every parameter, written to a multi-page PDF.
//!
//! The `chain-compare` binary drives [`app::ComparisonJob`]; the
//! `average_autocorrelation` binary summarises the autocorrelation of all
//! parameters on a single page.

pub mod app;
pub mod average;
pub mod cli;
pub mod color;
pub mod compare;
pub mod data;
pub mod error;
pub mod render;
pub mod stats;
