//! Translation entry point and its output record.
//!
//! ```text
//! raw args + env ──► classify ──► workers ──► shard env ──► artifacts
//!                                                              │
//!                                                              ▼
//!                                                      ParsedInvocation
//! ```
//!
//! The output command line is
//! `--shard_index=I --shard_count=N <runner flags> <executable> -- <executable args>`,
//! with the separator omitted when there are no executable arguments.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::artifacts::{self, DEFAULT_ARTIFACTS_SUBDIR};
use crate::classify::{classify, SEPARATOR};
use crate::errors::TranslateError;
use crate::flags::FlagKey;
use crate::shard_env::{shard_flags, ShardEnv, DEFAULT_SHARD_COUNT_VAR, DEFAULT_SHARD_INDEX_VAR};
use crate::workers::{resolve_workers, CoreCount};

/// Knobs that come from configuration rather than the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    pub shard_index_var: String,
    pub shard_count_var: String,
    pub artifacts_subdir: String,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            shard_index_var: DEFAULT_SHARD_INDEX_VAR.to_string(),
            shard_count_var: DEFAULT_SHARD_COUNT_VAR.to_string(),
            artifacts_subdir: DEFAULT_ARTIFACTS_SUBDIR.to_string(),
        }
    }
}

/// One translated invocation. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedInvocation {
    /// Runner flags, starting with the shard index and count.
    pub runner_args: Vec<String>,
    pub executable: String,
    pub executable_args: Vec<String>,
    pub output_dir: Option<String>,
    pub test_artifacts_dir: Option<String>,
    /// Environment for the child process.
    #[serde(skip)]
    pub environment: BTreeMap<String, String>,
    /// Variables stripped from the ambient environment.
    pub removed_env: Vec<String>,
    /// Compatibility flags that were accepted and discarded.
    pub dropped_flags: Vec<String>,
}

impl ParsedInvocation {
    /// Argument vector for the parallel runner.
    pub fn command_line(&self) -> Vec<String> {
        let mut out = self.runner_args.clone();
        out.push(self.executable.clone());
        if !self.executable_args.is_empty() {
            out.push(SEPARATOR.to_string());
            out.extend(self.executable_args.iter().cloned());
        }
        out
    }

    /// Full launch vector: optional interpreter, runner path, then
    /// [`command_line`](Self::command_line).
    pub fn launch_command(&self, runner: &str, interpreter: Option<&str>) -> Vec<String> {
        interpreter
            .into_iter()
            .map(str::to_string)
            .chain(std::iter::once(runner.to_string()))
            .chain(self.command_line())
            .collect()
    }
}

/// Translate a raw argument vector and environment.
pub fn translate<S: AsRef<str>>(
    args: &[S],
    env: &BTreeMap<String, String>,
    cores: &dyn CoreCount,
    options: &TranslateOptions,
) -> Result<ParsedInvocation, TranslateError> {
    let mut classified = classify(args)?;
    let executable = classified
        .executable
        .take()
        .ok_or(TranslateError::MissingExecutable)?;

    if let Some(spec) = classified.runner.value(FlagKey::Workers) {
        let resolved = resolve_workers(spec, cores)?;
        classified
            .runner
            .set(FlagKey::Workers, Some(resolved.to_string()));
    }

    let output_dir = classified
        .runner
        .value(FlagKey::OutputDir)
        .map(str::to_string);
    let test_artifacts_dir = artifacts::derive_artifacts_dir(
        classified.store_test_artifacts,
        output_dir.as_deref(),
        &options.artifacts_subdir,
    )?;

    let mut executable_args = classified.executable_args;
    if let Some(dir) = &test_artifacts_dir {
        artifacts::inject_artifacts_flag(&mut executable_args, dir);
    }

    // Explicit shard flags win over the environment, but the variables are
    // stripped either way.
    let shard = ShardEnv::new(&options.shard_index_var, &options.shard_count_var).translate(env);
    let shard_index = classified
        .runner
        .remove(FlagKey::ShardIndex)
        .unwrap_or_else(|| shard.shard_index.clone());
    let shard_count = classified
        .runner
        .remove(FlagKey::ShardCount)
        .unwrap_or_else(|| shard.shard_count.clone());

    let mut runner_args = Vec::with_capacity(classified.runner.len() + 2);
    runner_args.extend(shard_flags(&shard_index, &shard_count));
    runner_args.extend(classified.runner.to_args());

    tracing::info!(
        executable = %executable,
        shard_index = %shard_index,
        shard_count = %shard_count,
        runner_flags = runner_args.len(),
        executable_args = executable_args.len(),
        stored_artifacts = test_artifacts_dir.is_some(),
        "translated gtest-parallel invocation"
    );

    Ok(ParsedInvocation {
        runner_args,
        executable,
        executable_args,
        output_dir,
        test_artifacts_dir,
        environment: shard.child_env,
        removed_env: shard.removed_keys,
        dropped_flags: classified.dropped,
    })
}
