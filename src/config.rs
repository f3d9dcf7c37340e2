//! Run configuration
//!
//! Settings come from an optional JSON file. Missing fields take the
//! defaults below; the CLI may override individual knobs afterwards.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::audio::MAX_DURATION_SECS;
use crate::dsp::{EngineTuning, ReverbParams};
use crate::error::{ReverbError, Result};

/// Everything a render needs besides the audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub reverb: ReverbParams,
    pub tuning: EngineTuning,
    /// Inputs longer than this are truncated, with a warning
    pub max_duration_secs: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reverb: ReverbParams::default(),
            tuning: EngineTuning::default(),
            max_duration_secs: MAX_DURATION_SECS,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading settings from {}", path.display());
        let text = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&text)?;
        Ok(settings)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.reverb.validate()?;
        self.tuning.validate()?;
        if !(self.max_duration_secs > 0.0 && self.max_duration_secs.is_finite()) {
            return Err(ReverbError::InvalidParameter {
                param: "max_duration_secs".to_string(),
                value: self.max_duration_secs.to_string(),
                expected: "a positive number of seconds".to_string(),
            });
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
