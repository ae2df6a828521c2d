//! Dual-thumb interval selector as an explicit drag state machine.
//!
//! ```text
//! Idle --down--> Dragging(Left | Right) --move--> Dragging (commit)
//!                     \--up / cancel--> Idle
//! ```
//!
//! [`transition`] is pure: it takes the current state, the current interval
//! and one pointer event and returns the next state plus the effects the host
//! should apply. [`IntervalSelector`] wraps it with owned state and a
//! synchronous change callback.
//!
//! Two rules keep the reported interval ordered even though the thumbs can be
//! dragged past each other:
//! - the left thumb commits `min(v, high)`;
//! - the right thumb commits `max(v, low)`.

use serde::{Deserialize, Serialize};

use crate::interval::{Domain, Interval};

/// Identifier of a pointing device (mouse, pen, touch contact).
pub type PointerId = u32;

/// One end of the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Thumb {
    Left,
    Right,
}

impl Thumb {
    pub fn label(self) -> &'static str {
        match self {
            Thumb::Left => "Minimum",
            Thumb::Right => "Maximum",
        }
    }
}

/// Horizontal extent of the track on screen, in host units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    pub left: f64,
    pub width: f64,
}

impl TrackGeometry {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Linear map from a pointer x-position to a domain value, clamped.
    ///
    /// A collapsed track (zero or negative width) maps everything to the
    /// domain minimum.
    pub fn value_at(&self, x: f64, domain: &Domain) -> f64 {
        if self.width <= 0.0 {
            return domain.min();
        }
        let rel = (x - self.left) / self.width;
        domain.clamp(rel * domain.span() + domain.min())
    }
}

impl Default for TrackGeometry {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// A pointer event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { pointer_id: PointerId, x: f64 },
    Move { pointer_id: PointerId, x: f64 },
    Up { pointer_id: PointerId },
    Cancel { pointer_id: PointerId },
}

impl PointerEvent {
    pub fn pointer_id(&self) -> PointerId {
        match *self {
            PointerEvent::Down { pointer_id, .. }
            | PointerEvent::Move { pointer_id, .. }
            | PointerEvent::Up { pointer_id }
            | PointerEvent::Cancel { pointer_id } => pointer_id,
        }
    }
}

/// The captured pointer and the thumb it drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub thumb: Thumb,
    pub pointer_id: PointerId,
}

/// Drag lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorState {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl SelectorState {
    pub fn session(&self) -> Option<DragSession> {
        match *self {
            SelectorState::Idle => None,
            SelectorState::Dragging(session) => Some(session),
        }
    }
}

/// Why an event produced no state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Move, up or cancel with no drag in progress.
    NotDragging,
    /// Event from a pointer other than the captured one.
    PointerMismatch,
    /// A second down while a drag is already in progress.
    AlreadyDragging,
}

/// Side effects the host applies after a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectorEffect {
    /// Route all further events of this pointer to the selector.
    Captured(DragSession),
    /// A new interval to report through the change callback.
    Committed(Interval),
    /// Stop routing events of this pointer to the selector.
    Released {
        pointer_id: PointerId,
        cancelled: bool,
    },
    Ignored(IgnoreReason),
}

/// Result of one [`transition`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: SelectorState,
    pub effects: Vec<SelectorEffect>,
}

impl Transition {
    fn ignored(state: SelectorState, reason: IgnoreReason) -> Self {
        Self {
            next: state,
            effects: vec![SelectorEffect::Ignored(reason)],
        }
    }

    /// The interval committed by this transition, if any.
    pub fn committed(&self) -> Option<Interval> {
        self.effects.iter().rev().find_map(|e| match e {
            SelectorEffect::Committed(iv) => Some(*iv),
            _ => None,
        })
    }
}

/// Pick the thumb closest to `candidate`. Ties go to the left thumb.
pub fn nearest_thumb(candidate: f64, interval: Interval) -> Thumb {
    let d_left = (candidate - interval.low()).abs();
    let d_right = (candidate - interval.high()).abs();
    if d_left <= d_right {
        Thumb::Left
    } else {
        Thumb::Right
    }
}

/// Move one thumb to `value` without letting it cross the other.
pub fn commit_value(interval: Interval, thumb: Thumb, value: f64) -> Interval {
    match thumb {
        Thumb::Left => interval.with_low(value),
        Thumb::Right => interval.with_high(value),
    }
}

/// Pure drag transition: `(state, event) -> (state, effects)`.
pub fn transition(
    state: SelectorState,
    interval: Interval,
    event: &PointerEvent,
    domain: &Domain,
    track: &TrackGeometry,
) -> Transition {
    match (state, *event) {
        (SelectorState::Idle, PointerEvent::Down { pointer_id, x }) => {
            let candidate = track.value_at(x, domain);
            let session = DragSession {
                thumb: nearest_thumb(candidate, interval),
                pointer_id,
            };
            let committed = commit_value(interval, session.thumb, domain.quantize(candidate));
            Transition {
                next: SelectorState::Dragging(session),
                effects: vec![
                    SelectorEffect::Captured(session),
                    SelectorEffect::Committed(committed),
                ],
            }
        }
        (SelectorState::Idle, _) => Transition::ignored(state, IgnoreReason::NotDragging),
        (SelectorState::Dragging(session), _) if event.pointer_id() != session.pointer_id => {
            Transition::ignored(state, IgnoreReason::PointerMismatch)
        }
        (SelectorState::Dragging(_), PointerEvent::Down { .. }) => {
            Transition::ignored(state, IgnoreReason::AlreadyDragging)
        }
        (SelectorState::Dragging(session), PointerEvent::Move { x, .. }) => {
            let value = domain.quantize(track.value_at(x, domain));
            Transition {
                next: state,
                effects: vec![SelectorEffect::Committed(commit_value(
                    interval,
                    session.thumb,
                    value,
                ))],
            }
        }
        (SelectorState::Dragging(session), PointerEvent::Up { .. }) => Transition {
            next: SelectorState::Idle,
            effects: vec![SelectorEffect::Released {
                pointer_id: session.pointer_id,
                cancelled: false,
            }],
        },
        (SelectorState::Dragging(session), PointerEvent::Cancel { .. }) => Transition {
            next: SelectorState::Idle,
            effects: vec![SelectorEffect::Released {
                pointer_id: session.pointer_id,
                cancelled: true,
            }],
        },
    }
}

/// A stateful two-thumb selector over one [`Domain`].
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalSelector {
    domain: Domain,
    interval: Interval,
    state: SelectorState,
    track: TrackGeometry,
}

impl IntervalSelector {
    /// Create an idle selector. `interval` is clamped into `domain`.
    pub fn new(domain: Domain, interval: Interval) -> Self {
        Self {
            domain,
            interval: interval.clamped_to(&domain),
            state: SelectorState::Idle,
            track: TrackGeometry::default(),
        }
    }

    pub fn with_track(mut self, track: TrackGeometry) -> Self {
        self.track = track;
        self
    }

    /// Update the on-screen extent (e.g. after a terminal resize).
    pub fn set_track(&mut self, track: TrackGeometry) {
        self.track = track;
    }

    pub fn track(&self) -> TrackGeometry {
        self.track
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn active_thumb(&self) -> Option<Thumb> {
        self.state.session().map(|s| s.thumb)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SelectorState::Dragging(_))
    }

    /// Feed one pointer event through the state machine.
    ///
    /// `on_change` runs synchronously for every commit, before this returns.
    pub fn handle_pointer<F>(&mut self, event: &PointerEvent, mut on_change: F) -> Transition
    where
        F: FnMut(Interval),
    {
        let t = transition(self.state, self.interval, event, &self.domain, &self.track);
        for effect in &t.effects {
            match *effect {
                SelectorEffect::Captured(session) => {
                    tracing::debug!(
                        thumb = ?session.thumb,
                        pointer_id = session.pointer_id,
                        "pointer captured"
                    );
                }
                SelectorEffect::Committed(iv) => {
                    self.interval = iv;
                    tracing::trace!(low = iv.low(), high = iv.high(), "interval committed");
                    on_change(iv);
                }
                SelectorEffect::Released {
                    pointer_id,
                    cancelled,
                } => {
                    tracing::debug!(pointer_id, cancelled, "pointer released");
                }
                SelectorEffect::Ignored(_) => {}
            }
        }
        self.state = t.next;
        t
    }

    /// Programmatic update (presets, restored state). Normalized and clamped;
    /// any drag in progress stays captured.
    pub fn set_interval(&mut self, interval: Interval) {
        self.interval = interval.clamped_to(&self.domain);
    }

    /// Move one thumb by `steps` quantization steps, with the same
    /// non-crossing rule as dragging.
    pub fn nudge<F>(&mut self, thumb: Thumb, steps: i32, mut on_change: F) -> Interval
    where
        F: FnMut(Interval),
    {
        let current = match thumb {
            Thumb::Left => self.interval.low(),
            Thumb::Right => self.interval.high(),
        };
        let target = self
            .domain
            .quantize(current + f64::from(steps) * self.domain.step());
        self.interval = commit_value(self.interval, thumb, target);
        on_change(self.interval);
        self.interval
    }

    /// Drop the drag session without a pointer event (focus loss, teardown).
    pub fn release(&mut self) -> Option<DragSession> {
        let session = self.state.session();
        if let Some(s) = session {
            tracing::debug!(pointer_id = s.pointer_id, "drag released by host");
        }
        self.state = SelectorState::Idle;
        session
    }

    /// Left and right thumb positions as percentages of the track.
    pub fn thumb_offsets(&self) -> (f64, f64) {
        (
            self.domain.offset_pct(self.interval.low()),
            self.domain.offset_pct(self.interval.high()),
        )
    }

    /// Text for assistive output, e.g. `Minimum 0.70, Maximum 1.00`.
    pub fn live_status(&self) -> String {
        format!(
            "Minimum {:.2}, Maximum {:.2}",
            self.interval.low(),
            self.interval.high()
        )
    }
}
