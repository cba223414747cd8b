//! Shared, cross-cutting helpers used by every other `arbspread` crate.

pub mod observability;

/// Re-exported so downstream crates don't need to depend on `anyhow` just to
/// bubble up a top-level error from `main`.
pub use anyhow::{Context, Error, Result};
