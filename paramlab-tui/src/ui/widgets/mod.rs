//! Reusable widgets.

pub mod interval;

pub use interval::IntervalWidget;
