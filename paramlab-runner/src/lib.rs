//! ParamLab Runner — experiment configuration and submission.
//!
//! This crate builds on `paramlab-core` to provide:
//! - The experiment configuration controller (intervals, steps, grid)
//! - TOML lab configuration
//! - Payload validation and the submission boundary

pub mod config;
pub mod controller;
pub mod submission;

pub use config::{ConfigError, ExperimentSection, LabConfig, SweepSection};
pub use controller::{
    format_values, ExperimentConfigController, DEFAULT_STEPS, MAX_STEPS, MIN_STEPS,
};
pub use submission::{
    DryRunSubmitter, ExperimentDraft, ExperimentPayload, Provider, ProviderParseError,
    SubmissionReceipt, SubmitError, Submitter, DEFAULT_TITLE, PROMPT_LIMIT,
};
