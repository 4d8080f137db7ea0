//! Coordinate-tolerance and per-call configuration.
//!
//! A single coordinate-equality tolerance knob, plus the machine-scale
//! floor used when a topology has no configured `precision`.

use crate::geometry::point::Point2d;

/// Coordinate tolerance bundle threaded through every editor and inserter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// The topology's configured `precision`. `None` means "use the
    /// per-geometry machine-scale floor".
    pub precision: Option<f64>,
}

impl Tolerance {
    pub fn fixed(precision: f64) -> Self {
        Self { precision: Some(precision) }
    }

    pub fn floating() -> Self {
        Self { precision: None }
    }

    /// Resolve the tolerance to use for operations touching `points`,
    /// falling back to a per-geometry machine-scale floor:
    /// `3.6 * 10^(log10(max(|coord|)) - 15)`.
    pub fn resolve(&self, points: impl IntoIterator<Item = Point2d>) -> f64 {
        match self.precision {
            Some(p) if p > 0.0 => p,
            _ => Self::min_tolerance_for(points),
        }
    }

    /// The machine-scale floor for a set of points.
    pub fn min_tolerance_for(points: impl IntoIterator<Item = Point2d>) -> f64 {
        let max_ordinate = points
            .into_iter()
            .map(|p| p.max_ordinate())
            .fold(0.0_f64, f64::max);
        Self::min_tolerance(max_ordinate)
    }

    /// The floor for a single coordinate magnitude.
    pub fn min_tolerance(max_ordinate: f64) -> f64 {
        let magnitude = max_ordinate.max(1.0);
        3.6 * 10f64.powf(magnitude.log10() - 15.0)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::floating()
    }
}

/// Defaults shared by every low-level editor's `skip_checks` flag: every
/// editor takes an explicit skip-checks flag, but `AddPoint`/`AddLine`/
/// `AddPolygon` need a uniform default to call through with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditorConfig {
    pub skip_checks: bool,
}

impl EditorConfig {
    pub const CHECKED: Self = Self { skip_checks: false };
    pub const SKIP_CHECKS: Self = Self { skip_checks: true };
}
