//! ParamLab Core — interval selection and parameter sweeps.
//!
//! This crate contains the interaction and sampling logic, free of any
//! rendering host:
//! - Bounded domains and always-ordered intervals
//! - Dual-thumb interval selector as a pure drag state machine
//! - Evenly spaced sweeps and the temperature × top_p parameter grid
//! - Named presets

pub mod interval;
pub mod preset;
pub mod selector;
pub mod sweep;

pub use interval::{round2, Domain, DomainError, Interval};
pub use preset::{Preset, PresetParseError};
pub use selector::{
    commit_value, nearest_thumb, transition, DragSession, IgnoreReason, IntervalSelector,
    PointerEvent, PointerId, SelectorEffect, SelectorState, Thumb, TrackGeometry, Transition,
};
pub use sweep::{build_param_sets, sweep, ParamGrid, ParamSet, SweepSpec, DEFAULT_MAX_TOKENS};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: values handed across threads by hosts are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Interval>();
        require_sync::<Interval>();
        require_send::<ParamSet>();
        require_sync::<ParamSet>();
        require_send::<ParamGrid>();
        require_sync::<ParamGrid>();
        require_send::<IntervalSelector>();
        require_sync::<IntervalSelector>();
    }
}
