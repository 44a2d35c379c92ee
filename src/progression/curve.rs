//! Piecewise-linear XP curve
//!
//! Maps a raw quantity (dataset lines processed) to an XP award. Between two
//! breakpoints the award is linearly interpolated; past the last breakpoint
//! the curve saturates.

use crate::core::error::{ProgressionError, Result};
use serde::{Deserialize, Serialize};

/// One point of the curve: (quantity threshold, XP at that threshold)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpBreakpoint(pub i64, pub i64);

impl XpBreakpoint {
    pub fn threshold(&self) -> i64 {
        self.0
    }

    pub fn xp(&self) -> i64 {
        self.1
    }
}

/// Default dataset-size curve. Existing fixtures depend on these exact values.
pub const DEFAULT_BREAKPOINTS: [XpBreakpoint; 6] = [
    XpBreakpoint(0, 0),
    XpBreakpoint(10, 20),
    XpBreakpoint(100, 200),
    XpBreakpoint(500, 750),
    XpBreakpoint(4800, 1400),
    XpBreakpoint(20000, 2600),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "XpCurveTable")]
pub struct XpCurve {
    breakpoints: Vec<XpBreakpoint>,
}

impl Default for XpCurve {
    fn default() -> Self {
        Self { breakpoints: DEFAULT_BREAKPOINTS.to_vec() }
    }
}

/// Unchecked curve as read from config
#[derive(Debug, Deserialize)]
#[serde(default)]
struct XpCurveTable {
    breakpoints: Vec<XpBreakpoint>,
}

impl Default for XpCurveTable {
    fn default() -> Self {
        Self { breakpoints: DEFAULT_BREAKPOINTS.to_vec() }
    }
}

impl TryFrom<XpCurveTable> for XpCurve {
    type Error = ProgressionError;

    fn try_from(table: XpCurveTable) -> Result<Self> {
        XpCurve::new(table.breakpoints)
    }
}

impl XpCurve {
    /// Build and validate a curve
    pub fn new(breakpoints: Vec<XpBreakpoint>) -> Result<Self> {
        let curve = Self { breakpoints };
        curve.validate()?;
        Ok(curve)
    }

    pub fn breakpoints(&self) -> &[XpBreakpoint] {
        &self.breakpoints
    }

    /// Thresholds must be strictly ascending and XP non-decreasing, otherwise
    /// the curve is not monotonic.
    pub fn validate(&self) -> Result<()> {
        if self.breakpoints.len() < 2 {
            return Err(ProgressionError::config(format!(
                "XP curve needs at least 2 breakpoints, got {}",
                self.breakpoints.len()
            )));
        }
        if self.breakpoints[0] != XpBreakpoint(0, 0) {
            return Err(ProgressionError::config(format!(
                "XP curve must start at (0, 0), got {:?}",
                self.breakpoints[0]
            )));
        }
        for pair in self.breakpoints.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if b.threshold() <= a.threshold() {
                return Err(ProgressionError::config(format!(
                    "XP curve thresholds must be strictly ascending ({} then {})",
                    a.threshold(),
                    b.threshold()
                )));
            }
            if b.xp() < a.xp() {
                return Err(ProgressionError::config(format!(
                    "XP curve values must not decrease ({} then {})",
                    a.xp(),
                    b.xp()
                )));
            }
        }
        Ok(())
    }

    /// Highest XP the curve can award
    pub fn max_xp(&self) -> i64 {
        self.breakpoints.last().map_or(0, |b| b.xp())
    }

    /// Resolve a quantity to XP
    ///
    /// Interpolated values are rounded half-up using exact integer math, so
    /// fixtures are reproducible across platforms.
    pub fn resolve(&self, quantity: i64) -> Result<i64> {
        if quantity < 0 {
            return Err(ProgressionError::invalid(format!(
                "quantity must be non-negative, got {}",
                quantity
            )));
        }
        if quantity == 0 {
            return Ok(0);
        }

        let last = match self.breakpoints.last() {
            Some(last) => *last,
            None => return Ok(0),
        };
        if quantity >= last.threshold() {
            return Ok(last.xp());
        }

        // Highest breakpoint with threshold <= quantity; the one after it exists
        // because quantity < last threshold.
        let idx = self
            .breakpoints
            .partition_point(|b| b.threshold() <= quantity)
            .saturating_sub(1);
        let XpBreakpoint(x0, y0) = self.breakpoints[idx];
        let XpBreakpoint(x1, y1) = self.breakpoints[idx + 1];

        let span = (x1 - x0) as i128;
        let num = (quantity - x0) as i128 * (y1 - y0) as i128;
        let step = (2 * num + span) / (2 * span);

        Ok(y0 + step as i64)
    }
}
