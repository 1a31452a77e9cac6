//! Exit codes for the `shardwrap` binary. Part of the public contract.

use shardwrap_core::{ConfigError, TranslateError};

pub const SUCCESS: i32 = 0;
pub const INTERNAL_ERROR: i32 = 1; // Output/serialization failure
pub const USAGE_ERROR: i32 = 2; // Bad flags, missing executable, bad config
pub const INVALID_WORKERS: i32 = 3; // --workers is neither N nor <factor>x

/// Map an error chain to an exit code.
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(e) = err.downcast_ref::<TranslateError>() {
        return match e {
            TranslateError::InvalidWorkerSpec { .. } => INVALID_WORKERS,
            _ => USAGE_ERROR,
        };
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return USAGE_ERROR;
    }
    INTERNAL_ERROR
}
