//! Submission boundary: payload types, the `Submitter` trait, failure
//! classification.
//!
//! Transport is not handled here. A `Submitter` receives a fully built
//! [`ExperimentPayload`] and answers with a receipt or a [`SubmitError`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use paramlab_core::ParamSet;

/// Prompts longer than this are truncated (in characters).
pub const PROMPT_LIMIT: usize = 2000;

/// Title used when none is configured.
pub const DEFAULT_TITLE: &str = "LLM Title";

const UNKNOWN_FAILURE: &str = "An unknown error occurred while creating the experiment.";
const QUOTA_FALLBACK: &str =
    "You exceeded your current quota, please check your plan and billing details.";

/// LLM provider that evaluates the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    OpenAi,
    Groq,
    Mock,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Gemini,
        Provider::OpenAi,
        Provider::Groq,
        Provider::Mock,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
            Provider::Groq => "groq",
            Provider::Mock => "mock",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::OpenAi => "OpenAI",
            Provider::Groq => "Groq",
            Provider::Mock => "Mock",
        }
    }

    /// The model offered for this provider.
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Groq => "llama-3.1-8b-instant",
            Provider::Mock => "mock",
        }
    }

    pub fn next(self) -> Provider {
        let i = Provider::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Provider::ALL[(i + 1) % Provider::ALL.len()]
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown provider '{0}' (expected gemini, openai, groq or mock)")]
pub struct ProviderParseError(pub String);

impl FromStr for Provider {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProviderParseError(s.to_string()))
    }
}

/// User-entered experiment fields, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentDraft {
    pub title: String,
    pub prompt: String,
    pub provider: Provider,
    /// `None` means the provider's default model.
    pub model: Option<String>,
}

impl Default for ExperimentDraft {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            prompt: String::new(),
            provider: Provider::default(),
            model: None,
        }
    }
}

impl ExperimentDraft {
    /// Model that will be sent: the explicit one if non-blank, else the
    /// provider default.
    pub fn effective_model(&self) -> &str {
        match self.model.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m,
            _ => self.provider.default_model(),
        }
    }

    /// Switch provider and reset the model to its default.
    pub fn set_provider(&mut self, provider: Provider) {
        self.provider = provider;
        self.model = None;
    }
}

/// Body handed to the submission collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentPayload {
    pub title: String,
    pub prompt: String,
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub param_sets: Vec<ParamSet>,
}

/// What the collaborator reports back on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub experiment_id: String,
    pub num_responses: usize,
}

/// Errors from building or submitting a payload.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("experiment title is required")]
    MissingTitle,
    #[error("prompt is required")]
    MissingPrompt,
    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("quota exceeded: {message}")]
    Quota {
        message: String,
        experiment_id: Option<String>,
    },
    #[error("{message}")]
    Rejected { message: String },
}

impl SubmitError {
    /// Classify a failure body returned by the collaborator.
    ///
    /// Accepts plain text or JSON shaped as `{detail: "..."}`,
    /// `{detail: {reason | message}}` or `{error: {message}}`.
    pub fn from_failure_body(body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let detail = parsed.as_ref().map(|b| b.get("detail").unwrap_or(b));

        let reason = detail
            .and_then(|d| {
                d.as_str()
                    .or_else(|| d.get("reason").and_then(Value::as_str))
                    .or_else(|| d.get("message").and_then(Value::as_str))
            })
            .or_else(|| {
                parsed
                    .as_ref()
                    .and_then(|b| b.pointer("/error/message"))
                    .and_then(Value::as_str)
            })
            .map(str::to_string)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    UNKNOWN_FAILURE.to_string()
                } else {
                    body.trim().to_string()
                }
            });

        let lower = reason.to_ascii_lowercase();
        let is_quota = lower.contains("quota") || lower.contains("429");
        let message = exceeded_sentence(&reason).unwrap_or_else(|| reason.clone());

        if !is_quota {
            return SubmitError::Rejected { message };
        }

        let experiment_id = detail
            .and_then(|d| d.get("experiment_id"))
            .or_else(|| parsed.as_ref().and_then(|b| b.get("experiment_id")))
            .or_else(|| parsed.as_ref().and_then(|b| b.get("experimentId")))
            .and_then(Value::as_str)
            .map(str::to_string);

        SubmitError::Quota {
            message: if message.trim().is_empty() {
                QUOTA_FALLBACK.to_string()
            } else {
                message
            },
            experiment_id,
        }
    }

    pub fn is_quota(&self) -> bool {
        matches!(self, SubmitError::Quota { .. })
    }

    /// Short heading for an alert.
    pub fn title(&self) -> &'static str {
        match self {
            SubmitError::Quota { .. } => "Quota exceeded",
            SubmitError::MissingTitle | SubmitError::MissingPrompt => "Missing input",
            _ => "Error",
        }
    }
}

/// Pull a "You exceeded ..." sentence out of a provider error dump.
fn exceeded_sentence(text: &str) -> Option<String> {
    let start = text.to_ascii_lowercase().find("you exceeded")?;
    let rest = &text[start..];
    let head_len = "you exceeded".len();

    let stop = rest[head_len..]
        .find(['.', '}', '\''])
        .map(|i| head_len + i)
        .unwrap_or(rest.len());
    if stop == head_len {
        return None;
    }

    let mut end = stop;
    if rest[stop..].starts_with('.') {
        end = rest[stop..]
            .find('\'')
            .map(|i| stop + i)
            .unwrap_or(rest.len());
    }
    Some(rest[..end].trim().to_string())
}

/// Receives a built payload and hands it to whatever evaluates it.
pub trait Submitter {
    fn submit(&self, payload: &ExperimentPayload) -> Result<SubmissionReceipt, SubmitError>;
}

/// Accepts every payload without sending it anywhere.
///
/// The experiment id is content-addressed: the first 16 hex characters of the
/// blake3 hash of the payload JSON, so identical payloads get identical ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSubmitter;

impl Submitter for DryRunSubmitter {
    fn submit(&self, payload: &ExperimentPayload) -> Result<SubmissionReceipt, SubmitError> {
        let json = serde_json::to_string(payload)?;
        let hash = blake3::hash(json.as_bytes());
        let experiment_id = hash.to_hex()[..16].to_string();
        tracing::info!(
            %experiment_id,
            provider = %payload.provider,
            combinations = payload.param_sets.len(),
            "dry-run submission accepted"
        );
        Ok(SubmissionReceipt {
            experiment_id,
            num_responses: payload.param_sets.len(),
        })
    }
}
