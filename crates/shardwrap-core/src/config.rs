//! Wrapper configuration (`shardwrap.yaml`).
//!
//! ```yaml
//! runner: third_party/gtest-parallel/gtest-parallel
//! interpreter: vpython3
//! shard_index_var: GTEST_SHARD_INDEX
//! shard_count_var: GTEST_TOTAL_SHARDS
//! artifacts_subdir: test_artifacts
//! cores: 8
//! ```
//!
//! Every key is optional. Unknown keys are rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifacts::DEFAULT_ARTIFACTS_SUBDIR;
use crate::errors::ConfigError;
use crate::invocation::{ParsedInvocation, TranslateOptions};
use crate::shard_env::{DEFAULT_SHARD_COUNT_VAR, DEFAULT_SHARD_INDEX_VAR};
use crate::workers::{CoreCount, FixedCores, SystemCores};

pub const DEFAULT_RUNNER: &str = "gtest-parallel";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WrapperConfig {
    /// Path of the gtest-parallel script.
    pub runner: String,
    /// Interpreter placed in front of the runner, e.g. `vpython3`.
    pub interpreter: Option<String>,
    pub shard_index_var: String,
    pub shard_count_var: String,
    pub artifacts_subdir: String,
    /// Overrides logical core detection for `<factor>x` worker specs.
    pub cores: Option<usize>,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            runner: DEFAULT_RUNNER.to_string(),
            interpreter: None,
            shard_index_var: DEFAULT_SHARD_INDEX_VAR.to_string(),
            shard_count_var: DEFAULT_SHARD_COUNT_VAR.to_string(),
            artifacts_subdir: DEFAULT_ARTIFACTS_SUBDIR.to_string(),
            cores: None,
        }
    }
}

impl WrapperConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_yaml_str(&content, path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Parse YAML. `path` is only used in error messages.
    pub fn from_yaml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        // An empty file deserializes to unit, not to a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Self = serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate(path)?;
        Ok(cfg)
    }

    /// `load` when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: message.to_string(),
        };
        if self.runner.trim().is_empty() {
            return Err(invalid("runner must not be empty"));
        }
        if self.shard_index_var.is_empty() || self.shard_count_var.is_empty() {
            return Err(invalid("shard variable names must not be empty"));
        }
        if self.shard_index_var == self.shard_count_var {
            return Err(invalid("shard_index_var and shard_count_var must differ"));
        }
        if self.artifacts_subdir.is_empty() {
            return Err(invalid("artifacts_subdir must not be empty"));
        }
        if self.cores == Some(0) {
            return Err(invalid("cores must be at least 1"));
        }
        Ok(())
    }

    pub fn translate_options(&self) -> TranslateOptions {
        TranslateOptions {
            shard_index_var: self.shard_index_var.clone(),
            shard_count_var: self.shard_count_var.clone(),
            artifacts_subdir: self.artifacts_subdir.clone(),
        }
    }

    pub fn core_count(&self) -> Box<dyn CoreCount> {
        match self.cores {
            Some(n) => Box::new(FixedCores(n)),
            None => Box::new(SystemCores),
        }
    }

    pub fn launch_command(&self, invocation: &ParsedInvocation) -> Vec<String> {
        invocation.launch_command(&self.runner, self.interpreter.as_deref())
    }
}
