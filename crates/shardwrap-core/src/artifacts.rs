//! Test artifact directory derivation.
//!
//! Creating the directory and archiving it after the run belong to the
//! process launcher; nothing here touches the filesystem.

use std::path::Path;

use crate::errors::TranslateError;

pub const DEFAULT_ARTIFACTS_SUBDIR: &str = "test_artifacts";

/// `<output_dir>/<subdir>` when artifact storage was requested.
pub fn derive_artifacts_dir(
    store: bool,
    output_dir: Option<&str>,
    subdir: &str,
) -> Result<Option<String>, TranslateError> {
    if !store {
        return Ok(None);
    }
    let output_dir = output_dir.filter(|d| !d.is_empty()).ok_or_else(|| {
        TranslateError::configuration(
            "--output_dir must be specified for storing test artifacts",
        )
    })?;
    Ok(Some(Path::new(output_dir).join(subdir).display().to_string()))
}

/// Flag handed to the test executable.
pub fn artifacts_flag(dir: &str) -> String {
    format!("--test_artifacts_dir={dir}")
}

/// Put the artifacts flag first in the executable arguments.
pub fn inject_artifacts_flag(executable_args: &mut Vec<String>, dir: &str) {
    executable_args.insert(0, artifacts_flag(dir));
}
