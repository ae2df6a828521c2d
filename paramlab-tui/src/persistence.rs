//! App state persistence — JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use paramlab_core::{Interval, DEFAULT_MAX_TOKENS};
use paramlab_runner::{Provider, DEFAULT_STEPS, DEFAULT_TITLE};

use crate::app::{AppState, Field};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub temperature: Interval,
    pub top_p: Interval,
    pub steps: usize,
    pub max_tokens: u32,
    pub title: String,
    pub provider: Provider,
    pub model: Option<String>,
    pub focus: Field,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            temperature: Interval::new(0.7, 1.0),
            top_p: Interval::new(0.7, 1.0),
            steps: DEFAULT_STEPS,
            max_tokens: DEFAULT_MAX_TOKENS,
            title: DEFAULT_TITLE.to_string(),
            provider: Provider::default(),
            model: None,
            focus: Field::Prompt,
        }
    }
}

/// Load persisted state from disk. `None` if the file is missing or corrupt,
/// so the caller keeps its configured defaults.
pub fn load(path: &Path) -> Option<PersistedState> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring corrupt state file");
            None
        }
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        temperature: app.controller.temperature(),
        top_p: app.controller.top_p(),
        steps: app.controller.steps(),
        max_tokens: app.controller.max_tokens(),
        title: app.draft.title.clone(),
        provider: app.draft.provider,
        model: app.draft.model.clone(),
        focus: app.focus,
    }
}

/// Apply persisted state to AppState. Values pass through the controller's
/// setters, so a hand-edited file cannot put the form out of range.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.controller.set_temperature_interval(state.temperature);
    app.controller.set_top_p_interval(state.top_p);
    app.controller.set_steps(state.steps);
    app.controller.set_max_tokens(state.max_tokens);
    app.sync_selectors();
    app.draft.title = state.title;
    app.draft.provider = state.provider;
    app.draft.model = state.model;
    app.focus = state.focus;
}
