//! Experiment configuration controller.
//!
//! Owns the two sampling intervals, the step count and the token budget, and
//! turns them into the parameter grid and the submission payload. Hosts
//! forward interval changes from their selectors here; nothing is recomputed
//! until `materialize` is called.

use paramlab_core::{Domain, Interval, ParamGrid, ParamSet, Preset, DEFAULT_MAX_TOKENS};

use crate::config::LabConfig;
use crate::submission::{
    ExperimentDraft, ExperimentPayload, SubmissionReceipt, SubmitError, Submitter, PROMPT_LIMIT,
};

pub const MIN_STEPS: usize = 1;
pub const MAX_STEPS: usize = 5;
pub const DEFAULT_STEPS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfigController {
    temperature: Interval,
    top_p: Interval,
    steps: usize,
    max_tokens: u32,
}

impl Default for ExperimentConfigController {
    fn default() -> Self {
        Self {
            temperature: Interval::new(0.7, 1.0),
            top_p: Interval::new(0.7, 1.0),
            steps: DEFAULT_STEPS,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ExperimentConfigController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller seeded from the `[sweep]` section. Out-of-range values are
    /// clamped the same way the setters clamp them.
    pub fn from_config(config: &LabConfig) -> Self {
        let mut ctl = Self::default();
        ctl.set_temperature_interval(config.sweep.temperature);
        ctl.set_top_p_interval(config.sweep.top_p);
        ctl.set_steps(config.sweep.steps);
        ctl.set_max_tokens(config.sweep.max_tokens);
        ctl
    }

    pub fn temperature(&self) -> Interval {
        self.temperature
    }

    pub fn top_p(&self) -> Interval {
        self.top_p
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn set_temperature_interval(&mut self, interval: Interval) {
        self.temperature = interval.clamped_to(&Domain::TEMPERATURE);
    }

    pub fn set_top_p_interval(&mut self, interval: Interval) {
        self.top_p = interval.clamped_to(&Domain::TOP_P);
    }

    /// Set the step count, clamped into `1..=5`. Returns the value kept.
    pub fn set_steps(&mut self, steps: usize) -> usize {
        let kept = steps.clamp(MIN_STEPS, MAX_STEPS);
        if kept != steps {
            tracing::warn!(requested = steps, kept, "step count out of range, clamped");
        }
        self.steps = kept;
        kept
    }

    pub fn set_max_tokens(&mut self, max_tokens: u32) {
        self.max_tokens = max_tokens.max(1);
    }

    /// Load both intervals from a preset. Steps are left alone.
    pub fn apply_preset(&mut self, preset: Preset) {
        self.set_temperature_interval(preset.temperature());
        self.set_top_p_interval(preset.top_p());
        tracing::debug!(%preset, "preset applied");
    }

    pub fn grid(&self) -> ParamGrid {
        ParamGrid::new(self.temperature, self.top_p, self.steps).with_max_tokens(self.max_tokens)
    }

    /// The full grid, temperature-major.
    pub fn materialize(&self) -> Vec<ParamSet> {
        self.grid().generate()
    }

    pub fn combination_count(&self) -> usize {
        self.grid().size()
    }

    pub fn temperature_values(&self) -> Vec<f64> {
        self.grid().temperature.values()
    }

    pub fn top_p_values(&self) -> Vec<f64> {
        self.grid().top_p.values()
    }

    /// Validate a draft and attach the current grid.
    pub fn build_payload(&self, draft: &ExperimentDraft) -> Result<ExperimentPayload, SubmitError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(SubmitError::MissingTitle);
        }
        let prompt = draft.prompt.trim();
        if prompt.is_empty() {
            return Err(SubmitError::MissingPrompt);
        }
        let prompt: String = prompt.chars().take(PROMPT_LIMIT).collect();

        Ok(ExperimentPayload {
            title: title.to_string(),
            prompt,
            provider: draft.provider,
            model: Some(draft.effective_model().to_string()),
            param_sets: self.materialize(),
        })
    }

    pub fn submit(
        &self,
        draft: &ExperimentDraft,
        submitter: &dyn Submitter,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let payload = self.build_payload(draft)?;
        tracing::info!(
            title = %payload.title,
            provider = %payload.provider,
            combinations = payload.param_sets.len(),
            "submitting experiment"
        );
        submitter.submit(&payload)
    }
}

/// `[0.70, 0.85, 1.00]`
pub fn format_values(values: &[f64]) -> String {
    let inner: Vec<String> = values.iter().map(|v| format!("{v:.2}")).collect();
    format!("[{}]", inner.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::{DryRunSubmitter, Provider};

    #[test]
    fn defaults_give_nine_combinations() {
        let ctl = ExperimentConfigController::new();
        assert_eq!(ctl.combination_count(), 9);
        assert_eq!(ctl.temperature_values(), vec![0.7, 0.85, 1.0]);
        assert_eq!(ctl.materialize().len(), 9);
    }

    #[test]
    fn steps_are_clamped() {
        let mut ctl = ExperimentConfigController::new();
        assert_eq!(ctl.set_steps(0), 1);
        assert_eq!(ctl.combination_count(), 1);
        assert_eq!(ctl.set_steps(9), 5);
        assert_eq!(ctl.combination_count(), 25);
        assert_eq!(ctl.set_steps(4), 4);
    }

    #[test]
    fn intervals_are_clamped_to_domains() {
        let mut ctl = ExperimentConfigController::new();
        ctl.set_temperature_interval(Interval::new(-1.0, 3.0));
        ctl.set_top_p_interval(Interval::new(0.5, 1.5));
        assert_eq!(ctl.temperature(), Interval::new(0.0, 2.0));
        assert_eq!(ctl.top_p(), Interval::new(0.5, 1.0));
    }

    #[test]
    fn materialize_reflects_latest_setters() {
        let mut ctl = ExperimentConfigController::new();
        ctl.set_steps(2);
        ctl.set_temperature_interval(Interval::new(0.2, 0.4));
        ctl.set_top_p_interval(Interval::new(0.5, 0.9));
        let sets = ctl.materialize();
        let pairs: Vec<(f64, f64)> = sets.iter().map(|s| (s.temperature, s.top_p)).collect();
        assert_eq!(pairs, vec![(0.2, 0.5), (0.2, 0.9), (0.4, 0.5), (0.4, 0.9)]);
        assert!(sets.iter().all(|s| s.max_tokens == 256));
    }

    #[test]
    fn materialize_is_idempotent() {
        let mut ctl = ExperimentConfigController::new();
        ctl.set_steps(4);
        ctl.apply_preset(Preset::Precise);
        ctl.set_top_p_interval(Interval::new(0.35, 0.8));
        ctl.set_max_tokens(512);
        let first = ctl.materialize();
        assert_eq!(first, ctl.materialize());
        assert_eq!(first.len(), ctl.combination_count());
    }

    #[test]
    fn preset_keeps_steps() {
        let mut ctl = ExperimentConfigController::new();
        ctl.set_steps(5);
        ctl.apply_preset(Preset::Balanced);
        assert_eq!(ctl.temperature(), Interval::new(0.4, 0.8));
        assert_eq!(ctl.top_p(), Interval::new(0.6, 1.0));
        assert_eq!(ctl.steps(), 5);
    }

    #[test]
    fn payload_requires_title_and_prompt() {
        let ctl = ExperimentConfigController::new();
        let mut draft = ExperimentDraft {
            title: "   ".into(),
            prompt: "hi".into(),
            ..ExperimentDraft::default()
        };
        assert!(matches!(ctl.build_payload(&draft), Err(SubmitError::MissingTitle)));
        draft.title = "t".into();
        draft.prompt = "\n".into();
        assert!(matches!(ctl.build_payload(&draft), Err(SubmitError::MissingPrompt)));
    }

    #[test]
    fn payload_truncates_long_prompt() {
        let ctl = ExperimentConfigController::new();
        let draft = ExperimentDraft {
            prompt: "é".repeat(PROMPT_LIMIT + 50),
            ..ExperimentDraft::default()
        };
        let payload = ctl.build_payload(&draft).unwrap();
        assert_eq!(payload.prompt.chars().count(), PROMPT_LIMIT);
        assert_eq!(payload.model.as_deref(), Some("gemini-2.5-flash"));
    }

    #[test]
    fn dry_run_submit_counts_responses() {
        let mut ctl = ExperimentConfigController::new();
        ctl.set_steps(4);
        let draft = ExperimentDraft {
            prompt: "Write a haiku".into(),
            provider: Provider::Mock,
            ..ExperimentDraft::default()
        };
        let receipt = ctl.submit(&draft, &DryRunSubmitter).unwrap();
        assert_eq!(receipt.num_responses, 16);
    }

    #[test]
    fn from_config_clamps_steps() {
        let mut cfg = LabConfig::default();
        cfg.sweep.steps = 12;
        cfg.sweep.max_tokens = 0;
        let ctl = ExperimentConfigController::from_config(&cfg);
        assert_eq!(ctl.steps(), MAX_STEPS);
        assert_eq!(ctl.max_tokens(), 1);
    }

    #[test]
    fn formats_value_lists() {
        assert_eq!(format_values(&[0.7, 0.85, 1.0]), "[0.70, 0.85, 1.00]");
        assert_eq!(format_values(&[]), "[]");
    }
}
