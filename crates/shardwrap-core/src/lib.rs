//! Argument translation between CI harnesses and gtest-parallel.
//!
//! Given a raw argument vector and the ambient environment, [`translate`]
//! produces the argument vector for gtest-parallel, the environment for the
//! child process, and the output/artifact directories the launcher has to
//! manage. It performs no I/O besides reading what it is handed.

pub mod artifacts;
pub mod classify;
pub mod config;
pub mod errors;
pub mod flags;
pub mod invocation;
pub mod shard_env;
pub mod workers;

pub use config::WrapperConfig;
pub use errors::{ConfigError, TranslateError};
pub use invocation::{translate, ParsedInvocation, TranslateOptions};
pub use shard_env::{current_env, ShardEnv};
pub use workers::{resolve_workers, CoreCount, Factor, FixedCores, SystemCores, WorkerCount};
