//! Shard environment translation.
//!
//! CI harnesses shard a suite through environment variables. gtest binaries
//! read the same variables and partition themselves, so if they reach the
//! test executable while gtest-parallel is also sharding, only the tests of
//! the first inner shard ever run. This module strips them from the child
//! environment and turns them into explicit `--shard_index` / `--shard_count`
//! runner flags.
//!
//! The process environment is never mutated; callers get a new map.

use std::collections::BTreeMap;

pub const DEFAULT_SHARD_INDEX_VAR: &str = "GTEST_SHARD_INDEX";
pub const DEFAULT_SHARD_COUNT_VAR: &str = "GTEST_TOTAL_SHARDS";
pub const DEFAULT_SHARD_INDEX: &str = "0";
pub const DEFAULT_SHARD_COUNT: &str = "1";

/// Shard environment translator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardEnv {
    index_var: String,
    count_var: String,
}

/// Result of translating the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardEnvResult {
    /// The environment to pass to the child process
    pub child_env: BTreeMap<String, String>,
    pub shard_index: String,
    pub shard_count: String,
    /// Keys that were present and removed (sorted)
    pub removed_keys: Vec<String>,
}

impl Default for ShardEnv {
    fn default() -> Self {
        Self::new(DEFAULT_SHARD_INDEX_VAR, DEFAULT_SHARD_COUNT_VAR)
    }
}

impl ShardEnv {
    pub fn new(index_var: impl Into<String>, count_var: impl Into<String>) -> Self {
        Self {
            index_var: index_var.into(),
            count_var: count_var.into(),
        }
    }

    pub fn translate(&self, env: &BTreeMap<String, String>) -> ShardEnvResult {
        let mut child_env = env.clone();
        let mut removed_keys = Vec::new();

        let shard_index = child_env.remove(&self.index_var);
        if shard_index.is_some() {
            removed_keys.push(self.index_var.clone());
        }
        let shard_count = child_env.remove(&self.count_var);
        if shard_count.is_some() {
            removed_keys.push(self.count_var.clone());
        }
        removed_keys.sort();

        ShardEnvResult {
            child_env,
            shard_index: shard_index.unwrap_or_else(|| DEFAULT_SHARD_INDEX.to_string()),
            shard_count: shard_count.unwrap_or_else(|| DEFAULT_SHARD_COUNT.to_string()),
            removed_keys,
        }
    }
}

/// The two runner flags, index first.
pub fn shard_flags(index: &str, count: &str) -> [String; 2] {
    [
        format!("--shard_index={index}"),
        format!("--shard_count={count}"),
    ]
}

/// Snapshot of the process environment. Non UTF-8 entries are skipped.
pub fn current_env() -> BTreeMap<String, String> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}
