//! Inspector configuration.

use std::env;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => bail!("Unknown output format '{other}' (expected text or json)"),
        }
    }
}

/// Settings that can come from the environment as well as the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectConfig {
    pub format: OutputFormat,
    pub log_level: String,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            log_level: "warn".to_string(),
        }
    }
}

impl InspectConfig {
    /// Load from `NC_INSPECT_FORMAT` and `NC_INSPECT_LOG_LEVEL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let format = match lookup("NC_INSPECT_FORMAT") {
            Some(value) => value.parse()?,
            None => defaults.format,
        };
        let log_level = lookup("NC_INSPECT_LOG_LEVEL").unwrap_or(defaults.log_level);
        Ok(Self { format, log_level })
    }

    /// Command-line values win over the environment.
    pub fn with_overrides(mut self, format: Option<OutputFormat>, log_level: Option<String>) -> Self {
        if let Some(format) = format {
            self.format = format;
        }
        if let Some(log_level) = log_level {
            self.log_level = log_level;
        }
        self
    }
}
