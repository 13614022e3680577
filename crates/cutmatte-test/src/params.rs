//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use cutmatte_core::Raster;
use std::fs;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare computed values and rasters (default)
    #[default]
    Compare,
    /// Also write intermediate rasters to the regout directory
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "despeckle")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn record_failure(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.record_failure(msg);
            false
        } else {
            true
        }
    }

    /// Compare two rasters for exact equality
    ///
    /// # Returns
    ///
    /// `true` if both rasters have the same size and identical bytes.
    pub fn compare_raster(&mut self, raster1: &Raster, raster2: &Raster) -> bool {
        self.index += 1;

        if !raster1.sizes_equal(raster2) {
            let msg = format!(
                "Failure in {}_reg: raster comparison for index {} - dimension mismatch \
                 {}x{} vs {}x{}",
                self.test_name,
                self.index,
                raster1.width(),
                raster1.height(),
                raster2.width(),
                raster2.height()
            );
            self.record_failure(msg);
            return false;
        }

        let width = raster1.width();
        for y in 0..raster1.height() {
            for x in 0..width {
                let p1 = raster1.get_rgba_unchecked(x, y);
                let p2 = raster2.get_rgba_unchecked(x, y);
                if p1 != p2 {
                    let msg = format!(
                        "Failure in {}_reg: raster comparison for index {} - pixel mismatch \
                         at ({}, {}): {:?} vs {:?}",
                        self.test_name, self.index, x, y, p1, p2
                    );
                    self.record_failure(msg);
                    return false;
                }
            }
        }

        true
    }

    /// Write a raster as PNG to the regout directory in display mode.
    ///
    /// Does nothing in compare mode.
    pub fn write_raster(&mut self, raster: &Raster, label: &str) -> TestResult<()> {
        self.index += 1;
        if !self.display() {
            return Ok(());
        }

        let dir = regout_dir();
        fs::create_dir_all(&dir).map_err(|e| TestError::DirectoryCreate {
            path: dir.clone(),
            message: e.to_string(),
        })?;
        let path = format!("{}/{}.{:02}.{}.png", dir, self.test_name, self.index, label);
        cutmatte_io::write_image(raster, &path, cutmatte_io::OutputFormat::Png).map_err(|e| {
            TestError::ImageWrite {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;
        eprintln!("Wrote: {}", path);
        Ok(())
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
