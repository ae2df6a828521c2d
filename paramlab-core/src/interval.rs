//! Bounded numeric domains and ordered intervals.
//!
//! An [`Interval`] can only be built through a normalizing constructor, so
//! `low <= high` holds for every value of the type, including ones that came
//! in through deserialization.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from constructing a [`Domain`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("domain bounds must be finite (got [{min}, {max}])")]
    NonFinite { min: f64, max: f64 },
    #[error("domain minimum {min} must be below maximum {max}")]
    Empty { min: f64, max: f64 },
    #[error("quantization step must be positive and finite (got {0})")]
    InvalidStep(f64),
}

/// A closed numeric range with a quantization step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    min: f64,
    max: f64,
    step: f64,
}

impl Domain {
    /// Sampling temperature: `[0, 2]` in hundredths.
    pub const TEMPERATURE: Domain = Domain {
        min: 0.0,
        max: 2.0,
        step: 0.01,
    };

    /// Nucleus sampling mass: `[0, 1]` in hundredths.
    pub const TOP_P: Domain = Domain {
        min: 0.0,
        max: 1.0,
        step: 0.01,
    };

    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, DomainError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(DomainError::NonFinite { min, max });
        }
        if min >= max {
            return Err(DomainError::Empty { min, max });
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(DomainError::InvalidStep(step));
        }
        Ok(Self { min, max, step })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Snap to the nearest multiple of `step`, then clamp.
    pub fn quantize(&self, value: f64) -> f64 {
        let snapped = snap((value / self.step).round() * self.step);
        self.clamp(snapped)
    }

    /// Position of `value` along the domain as a percentage (0–100).
    pub fn offset_pct(&self, value: f64) -> f64 {
        (value - self.min) / self.span() * 100.0
    }

    /// The full domain as an interval.
    pub fn full(&self) -> Interval {
        Interval::new(self.min, self.max)
    }
}

/// Strip float noise left over from `n * step` products (0.5700000000000001).
pub(crate) fn snap(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// An ordered `(low, high)` pair.
///
/// Serialized as a two-element array `[low, high]`; an out-of-order array is
/// normalized on the way in rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Interval {
    low: f64,
    high: f64,
}

impl Interval {
    /// Build an interval from two endpoints in either order.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// A degenerate interval at a single value.
    pub fn point(value: f64) -> Self {
        Self {
            low: value,
            high: value,
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    /// Clamp both endpoints into `domain`. Ordering is preserved.
    pub fn clamped_to(&self, domain: &Domain) -> Self {
        Self {
            low: domain.clamp(self.low),
            high: domain.clamp(self.high),
        }
    }

    pub(crate) fn with_low(self, low: f64) -> Self {
        Self {
            low: low.min(self.high),
            high: self.high,
        }
    }

    pub(crate) fn with_high(self, high: f64) -> Self {
        Self {
            low: self.low,
            high: high.max(self.low),
        }
    }
}

impl From<(f64, f64)> for Interval {
    fn from((a, b): (f64, f64)) -> Self {
        Interval::new(a, b)
    }
}

impl From<Interval> for (f64, f64) {
    fn from(iv: Interval) -> Self {
        (iv.low, iv.high)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}, {:.2}]", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_normalizes_reversed_endpoints() {
        let iv = Interval::new(0.9, 0.3);
        assert_eq!(iv.low(), 0.3);
        assert_eq!(iv.high(), 0.9);
    }

    #[test]
    fn interval_deserializes_through_normalization() {
        let iv: Interval = serde_json::from_str("[1.0, 0.4]").unwrap();
        assert_eq!((iv.low(), iv.high()), (0.4, 1.0));
        assert_eq!(serde_json::to_string(&iv).unwrap(), "[0.4,1.0]");
    }

    #[test]
    fn domain_rejects_bad_bounds() {
        assert_eq!(
            Domain::new(1.0, 1.0, 0.1),
            Err(DomainError::Empty { min: 1.0, max: 1.0 })
        );
        assert!(matches!(
            Domain::new(0.0, f64::INFINITY, 0.1),
            Err(DomainError::NonFinite { .. })
        ));
        assert_eq!(Domain::new(0.0, 1.0, 0.0), Err(DomainError::InvalidStep(0.0)));
    }

    #[test]
    fn quantize_snaps_and_clamps() {
        let d = Domain::TOP_P;
        assert_eq!(d.quantize(0.574), 0.57);
        assert_eq!(d.quantize(0.576), 0.58);
        assert_eq!(d.quantize(1.3), 1.0);
        assert_eq!(d.quantize(-0.2), 0.0);
    }

    #[test]
    fn offset_pct_spans_zero_to_hundred() {
        let d = Domain::TEMPERATURE;
        assert_eq!(d.offset_pct(0.0), 0.0);
        assert_eq!(d.offset_pct(1.0), 50.0);
        assert_eq!(d.offset_pct(2.0), 100.0);
    }

    #[test]
    fn clamped_to_keeps_order() {
        let iv = Interval::new(-0.5, 3.0).clamped_to(&Domain::TEMPERATURE);
        assert_eq!((iv.low(), iv.high()), (0.0, 2.0));
    }

    #[test]
    fn with_low_never_crosses_high() {
        let iv = Interval::new(0.2, 0.5).with_low(0.9);
        assert_eq!((iv.low(), iv.high()), (0.5, 0.5));
        let iv = Interval::new(0.2, 0.5).with_high(0.1);
        assert_eq!((iv.low(), iv.high()), (0.2, 0.2));
    }

    #[test]
    fn round2_matches_two_decimal_display() {
        assert_eq!(round2(0.8500000000000001), 0.85);
        assert_eq!(round2(1.0000000000000002), 1.0);
    }
}
