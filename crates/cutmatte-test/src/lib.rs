//! cutmatte-test - Regression test framework for cutmatte
//!
//! This crate provides a small regression test harness with two modes:
//!
//! - **Compare**: Check computed values and rasters (default)
//! - **Display**: Additionally dump rasters as PNG for visual inspection
//!
//! It also provides synthetic [`fixtures`] so that tests need no binary
//! test data.
//!
//! # Usage
//!
//! ```ignore
//! use cutmatte_test::{RegParams, fixtures};
//!
//! let mut rp = RegParams::new("despeckle");
//! rp.compare_values(2500.0, count as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
pub mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // cutmatte-test is at crates/cutmatte-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
