//! Sweep generation and parameter grids.
//!
//! A sweep samples an interval at evenly spaced points; a grid is the
//! Cartesian product of a temperature sweep and a top_p sweep. Grid order is
//! fixed (temperature outer, top_p inner) so positions can be relied on.

use serde::{Deserialize, Serialize};

use crate::interval::{round2, Domain, Interval};

/// `max_tokens` attached to every generated [`ParamSet`] unless overridden.
pub const DEFAULT_MAX_TOKENS: u32 = 256;

/// `steps` values evenly spaced from `min` to `max` inclusive, each rounded
/// to two decimals. `steps <= 1` yields `[min]`.
pub fn sweep(min: f64, max: f64, steps: usize) -> Vec<f64> {
    if steps <= 1 {
        return vec![min];
    }
    let stride = (max - min) / (steps - 1) as f64;
    (0..steps)
        .map(|i| round2(min + i as f64 * stride))
        .collect()
}

/// One sampled dimension: an interval and how many points to take from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    pub interval: Interval,
    pub steps: usize,
}

impl SweepSpec {
    pub fn new(interval: Interval, steps: usize) -> Self {
        Self { interval, steps }
    }

    /// Number of values this sweep expands to (never zero).
    pub fn len(&self) -> usize {
        self.steps.max(1)
    }

    /// Always false: a sweep has at least one value.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn values(&self) -> Vec<f64> {
        sweep(self.interval.low(), self.interval.high(), self.steps)
    }
}

/// One combination of sampling parameters sent for evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamSet {
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

impl ParamSet {
    /// Build a param set with both values clamped to their domains.
    pub fn clamped(temperature: f64, top_p: f64, max_tokens: u32) -> Self {
        Self {
            temperature: Domain::TEMPERATURE.clamp(temperature),
            top_p: Domain::TOP_P.clamp(top_p),
            max_tokens,
        }
    }
}

/// Parameter grid: two sweeps and a fixed token budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub temperature: SweepSpec,
    pub top_p: SweepSpec,
    pub max_tokens: u32,
}

impl ParamGrid {
    /// A grid sampling both intervals with the same step count.
    pub fn new(temperature: Interval, top_p: Interval, steps: usize) -> Self {
        Self {
            temperature: SweepSpec::new(temperature, steps),
            top_p: SweepSpec::new(top_p, steps),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Returns the total number of combinations in this grid.
    pub fn size(&self) -> usize {
        self.temperature.len() * self.top_p.len()
    }

    /// Generates all combinations, temperature-major.
    pub fn generate(&self) -> Vec<ParamSet> {
        let temps = self.temperature.values();
        let tops = self.top_p.values();

        let mut sets = Vec::with_capacity(temps.len() * tops.len());
        for &t in &temps {
            for &p in &tops {
                sets.push(ParamSet::clamped(t, p, self.max_tokens));
            }
        }

        tracing::debug!(
            combinations = sets.len(),
            temperature = %self.temperature.interval,
            top_p = %self.top_p.interval,
            "param grid generated"
        );
        sets
    }
}

/// Expand two intervals and a shared step count into the full grid.
pub fn build_param_sets(temperature: Interval, top_p: Interval, steps: usize) -> Vec<ParamSet> {
    ParamGrid::new(temperature, top_p, steps).generate()
}
