//! Data layer: core types, loading, and the burn-in cut.
//!
//! Architecture:
//! ```text
//!  .parquet / .json / .csv  (or a directory holding <table>.parquet|csv)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → ChainTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  step > burn_in → retained row indices
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Chain    │  labelled columns, stats accessors
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;

/// Table read from each chain source unless told otherwise.
pub const DEFAULT_TABLE: &str = "posteriors";
