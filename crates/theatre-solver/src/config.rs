// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Serialisable solver configuration.
//!
//! `SolverConfig` is the on-disk form of `BnbConfig`: flat, every field
//! optional in JSON, the time limit in milliseconds.
//!
//! ```json
//! { "node_limit": 100000, "time_limit_ms": 2000, "lp": { "max_iterations": 5000 } }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use theatre_bnb::config::BnbConfig;
use theatre_lp::config::LpConfig;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration from `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Stop after this many explored nodes.
    pub node_limit: Option<u64>,
    /// Stop after this many milliseconds.
    pub time_limit_ms: Option<u64>,
    pub integrality_tolerance: f64,
    pub objective_tolerance: f64,
    /// Attach a progress logging monitor to every search.
    pub log_progress: bool,
    pub lp: LpConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let bnb = BnbConfig::default();
        Self {
            node_limit: bnb.node_limit,
            time_limit_ms: None,
            integrality_tolerance: bnb.integrality_tolerance,
            objective_tolerance: bnb.objective_tolerance,
            log_progress: false,
            lp: bnb.lp,
        }
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{} is not a finite non-negative number", value),
        })
    }
}

impl SolverConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_path<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lp.max_iterations == 0 {
            return Err(ConfigError::Invalid {
                field: "lp.max_iterations",
                reason: "must be positive".to_string(),
            });
        }
        non_negative("lp.pivot_tolerance", self.lp.pivot_tolerance)?;
        non_negative("lp.feasibility_tolerance", self.lp.feasibility_tolerance)?;
        non_negative("objective_tolerance", self.objective_tolerance)?;
        non_negative("integrality_tolerance", self.integrality_tolerance)?;
        if self.integrality_tolerance >= 0.5 {
            return Err(ConfigError::Invalid {
                field: "integrality_tolerance",
                reason: format!(
                    "{} would treat every value as integral",
                    self.integrality_tolerance
                ),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}

impl From<&SolverConfig> for BnbConfig {
    fn from(config: &SolverConfig) -> Self {
        BnbConfig {
            node_limit: config.node_limit,
            time_limit: config.time_limit(),
            integrality_tolerance: config.integrality_tolerance,
            objective_tolerance: config.objective_tolerance,
            lp: config.lp,
        }
    }
}
