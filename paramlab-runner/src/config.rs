//! TOML lab configuration.
//!
//! ```toml
//! [sweep]
//! steps = 3
//! max_tokens = 256
//! temperature = [0.7, 1.0]
//! top_p = [0.7, 1.0]
//!
//! [experiment]
//! title = "LLM Title"
//! provider = "gemini"
//! model = "gemini-2.5-flash"
//! ```
//!
//! Every key is optional; missing keys take the defaults above.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use paramlab_core::{Interval, DEFAULT_MAX_TOKENS};

use crate::controller::DEFAULT_STEPS;
use crate::submission::{Provider, DEFAULT_TITLE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSection {
    pub steps: usize,
    pub max_tokens: u32,
    pub temperature: Interval,
    pub top_p: Interval,
}

impl Default for SweepSection {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: Interval::new(0.7, 1.0),
            top_p: Interval::new(0.7, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentSection {
    pub title: String,
    pub provider: Provider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Default for ExperimentSection {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            provider: Provider::default(),
            model: None,
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub sweep: SweepSection,
    pub experiment: ExperimentSection,
}

impl LabConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded lab config");
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
