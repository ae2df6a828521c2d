//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. Selector commits are forwarded to the
//! controller synchronously, so the grid preview never lags the thumbs.

use std::collections::VecDeque;

use chrono::NaiveDateTime;
use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};

use paramlab_core::{
    Domain, IntervalSelector, PointerEvent, Preset, SelectorEffect, Thumb, Transition,
};
use paramlab_runner::{
    DryRunSubmitter, ExperimentConfigController, ExperimentDraft, SubmissionReceipt,
};

use crate::ui;

const HISTORY_CAP: usize = 20;

/// Focusable form fields, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Title,
    Prompt,
    Temperature,
    TopP,
    Steps,
    Provider,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Title,
        Field::Prompt,
        Field::Temperature,
        Field::TopP,
        Field::Steps,
        Field::Provider,
    ];

    pub fn index(self) -> usize {
        Field::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Prompt => "Prompt",
            Field::Temperature => "Temperature",
            Field::TopP => "Top P",
            Field::Steps => "Steps",
            Field::Provider => "Provider",
        }
    }

    pub fn next(self) -> Field {
        Field::ALL[(self.index() + 1) % Field::ALL.len()]
    }

    pub fn prev(self) -> Field {
        Field::ALL[(self.index() + Field::ALL.len() - 1) % Field::ALL.len()]
    }

    /// The selector behind this field, if it is one.
    pub fn selector(self) -> Option<SelectorId> {
        match self {
            Field::Temperature => Some(SelectorId::Temperature),
            Field::TopP => Some(SelectorId::TopP),
            _ => None,
        }
    }
}

/// One of the two interval selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorId {
    Temperature,
    TopP,
}

impl SelectorId {
    pub fn field(self) -> Field {
        match self {
            SelectorId::Temperature => Field::Temperature,
            SelectorId::TopP => Field::TopP,
        }
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Which text field an edit overlay writes back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Title,
    Prompt,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Grid,
    Edit(EditTarget),
    Alert { title: String, message: String },
}

/// A dry-run submission, newest first in the history.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub timestamp: NaiveDateTime,
    pub receipt: SubmissionReceipt,
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub focus: Field,
    pub overlay: Overlay,

    pub controller: ExperimentConfigController,
    pub temperature: IntervalSelector,
    pub top_p: IntervalSelector,
    /// Selector holding the mouse pointer capture.
    pub drag_owner: Option<SelectorId>,
    pub draft: ExperimentDraft,

    pub edit_buffer: String,
    pub grid_scroll: usize,
    pub status_message: Option<(String, StatusLevel)>,
    pub submissions: VecDeque<SubmissionRecord>,

    /// Last known terminal area; drives both rendering and hit-testing.
    pub viewport: Rect,
}

impl AppState {
    pub fn new(controller: ExperimentConfigController, draft: ExperimentDraft) -> Self {
        let temperature = IntervalSelector::new(Domain::TEMPERATURE, controller.temperature());
        let top_p = IntervalSelector::new(Domain::TOP_P, controller.top_p());
        Self {
            running: true,
            focus: Field::Prompt,
            overlay: Overlay::None,
            controller,
            temperature,
            top_p,
            drag_owner: None,
            draft,
            edit_buffer: String::new(),
            grid_scroll: 0,
            status_message: None,
            submissions: VecDeque::with_capacity(HISTORY_CAP),
            viewport: Rect::default(),
        }
    }

    pub fn selector(&self, id: SelectorId) -> &IntervalSelector {
        match id {
            SelectorId::Temperature => &self.temperature,
            SelectorId::TopP => &self.top_p,
        }
    }

    /// Record the terminal size and re-derive both track geometries.
    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
        let layout = ui::form_layout(area);
        self.temperature
            .set_track(ui::track_geometry(layout.temperature_track));
        self.top_p.set_track(ui::track_geometry(layout.top_p_track));
    }

    /// Feed one pointer event to a selector, forwarding commits to the
    /// controller.
    pub fn feed_pointer(&mut self, id: SelectorId, event: &PointerEvent) -> Transition {
        let controller = &mut self.controller;
        let t = match id {
            SelectorId::Temperature => self
                .temperature
                .handle_pointer(event, |iv| controller.set_temperature_interval(iv)),
            SelectorId::TopP => self
                .top_p
                .handle_pointer(event, |iv| controller.set_top_p_interval(iv)),
        };
        for effect in &t.effects {
            match effect {
                SelectorEffect::Captured(_) => {
                    self.drag_owner = Some(id);
                    self.focus = id.field();
                }
                SelectorEffect::Released { .. } => self.drag_owner = None,
                _ => {}
            }
        }
        t
    }

    /// Keyboard step on one thumb of the focused selector.
    pub fn nudge(&mut self, id: SelectorId, thumb: Thumb, steps: i32) {
        let controller = &mut self.controller;
        match id {
            SelectorId::Temperature => {
                self.temperature
                    .nudge(thumb, steps, |iv| controller.set_temperature_interval(iv));
            }
            SelectorId::TopP => {
                self.top_p
                    .nudge(thumb, steps, |iv| controller.set_top_p_interval(iv));
            }
        };
    }

    /// Drop any drag in progress, e.g. when the terminal loses focus.
    pub fn cancel_drag(&mut self) {
        if let Some(id) = self.drag_owner {
            let pointer_id = self.selector(id).state().session().map(|s| s.pointer_id);
            if let Some(pointer_id) = pointer_id {
                self.feed_pointer(id, &PointerEvent::Cancel { pointer_id });
            }
            self.drag_owner = None;
        }
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        self.controller.apply_preset(preset);
        self.sync_selectors();
        self.set_status(format!(
            "{} preset: temperature {}, top_p {}",
            preset.label(),
            self.controller.temperature(),
            self.controller.top_p()
        ));
    }

    /// Push controller intervals back into the selectors.
    pub fn sync_selectors(&mut self) {
        self.temperature.set_interval(self.controller.temperature());
        self.top_p.set_interval(self.controller.top_p());
    }

    pub fn adjust_steps(&mut self, delta: i64) {
        let current = self.controller.steps() as i64;
        let requested = (current + delta).max(0) as usize;
        let kept = self.controller.set_steps(requested);
        if kept == current as usize {
            self.set_warning(format!("Steps stay at {kept} (range 1-5)"));
        } else {
            self.grid_scroll = 0;
            self.set_status(format!(
                "Steps {kept}: {} combinations",
                self.controller.combination_count()
            ));
        }
    }

    pub fn cycle_provider(&mut self) {
        let next = self.draft.provider.next();
        self.draft.set_provider(next);
        self.set_status(format!(
            "Provider {} ({})",
            next.label(),
            self.draft.effective_model()
        ));
    }

    /// Dry-run submit the current draft and record the outcome.
    pub fn submit(&mut self) {
        match self.controller.submit(&self.draft, &DryRunSubmitter) {
            Ok(receipt) => {
                self.set_status(format!(
                    "Experiment {} accepted: {} responses expected",
                    receipt.experiment_id, receipt.num_responses
                ));
                self.submissions.push_front(SubmissionRecord {
                    timestamp: chrono::Local::now().naive_local(),
                    receipt,
                });
                self.submissions.truncate(HISTORY_CAP);
            }
            Err(err) => {
                tracing::warn!(error = %err, "submission failed");
                self.status_message = Some((err.to_string(), StatusLevel::Error));
                self.overlay = Overlay::Alert {
                    title: err.title().to_string(),
                    message: err.to_string(),
                };
            }
        }
    }

    pub fn begin_edit(&mut self, target: EditTarget) {
        self.edit_buffer = match target {
            EditTarget::Title => self.draft.title.clone(),
            EditTarget::Prompt => self.draft.prompt.clone(),
        };
        self.focus = match target {
            EditTarget::Title => Field::Title,
            EditTarget::Prompt => Field::Prompt,
        };
        self.overlay = Overlay::Edit(target);
    }

    pub fn commit_edit(&mut self) {
        if let Overlay::Edit(target) = self.overlay {
            let text = std::mem::take(&mut self.edit_buffer);
            match target {
                EditTarget::Title => self.draft.title = text,
                EditTarget::Prompt => self.draft.prompt = text,
            }
        }
        self.overlay = Overlay::None;
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

#[cfg(test)]
pub(crate) fn test_app() -> AppState {
    let mut app = AppState::new(ExperimentConfigController::new(), ExperimentDraft::default());
    app.set_viewport(Rect::new(0, 0, 100, 40));
    app
}
