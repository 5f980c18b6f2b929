//! Configuration for histograms created by embedding applications

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::streaming::StreamingHistogram;

pub const CONFIG_ENV_VAR: &str = "STREAMHIST_HISTOGRAM_CONFIG";

/// Capacity settings, deserializable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// Maximum number of bins retained, trades memory for accuracy
    pub max_bins: usize,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self { max_bins: 64 }
    }
}

impl HistogramConfig {
    /// Load configuration from environment variable or use defaults
    pub fn from_env() -> Result<Self> {
        if let Ok(config_json) = std::env::var(CONFIG_ENV_VAR) {
            serde_json::from_str(&config_json)
                .with_context(|| format!("Failed to parse {CONFIG_ENV_VAR}"))
        } else {
            Ok(Self::default())
        }
    }

    pub fn build(&self) -> crate::errors::Result<StreamingHistogram> {
        StreamingHistogram::new(self.max_bins)
    }
}
