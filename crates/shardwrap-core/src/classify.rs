//! Flag classifier: splits the raw token stream into runner flags and
//! executable arguments.
//!
//! Recognized flags are consumed wherever they appear before a literal `--`,
//! including after the executable token. A repeated flag keeps the position
//! of its first occurrence and the value of its last. Unknown tokens are
//! never rejected; they flow to the executable in their original order,
//! followed by everything after `--`.

use crate::errors::TranslateError;
use crate::flags::{self, FlagKey, FlagKind};

pub const SEPARATOR: &str = "--";

/// Runner flags in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerFlags {
    entries: Vec<(FlagKey, Option<String>)>,
}

impl RunnerFlags {
    /// Record a flag. Later values overwrite earlier ones in place.
    pub fn set(&mut self, key: FlagKey, value: Option<String>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn value(&self, key: FlagKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn remove(&mut self, key: FlagKey) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        self.entries.remove(pos).1
    }

    pub fn iter(&self) -> impl Iterator<Item = (FlagKey, Option<&str>)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical `--dest=value` / `--dest` tokens, in order.
    pub fn to_args(&self) -> Vec<String> {
        self.iter()
            .filter_map(|(key, value)| flags::spec(key).emit(value))
            .collect()
    }
}

/// Output of [`classify`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub runner: RunnerFlags,
    pub executable: Option<String>,
    pub executable_args: Vec<String>,
    pub store_test_artifacts: bool,
    /// Dropped compatibility flags that were seen.
    pub dropped: Vec<String>,
}

pub fn classify<S: AsRef<str>>(args: &[S]) -> Result<Classified, TranslateError> {
    let mut out = Classified::default();
    let mut trailing: Vec<String> = Vec::new();
    let mut after_separator = false;
    let mut first_trailing = true;

    let mut i = 0;
    while i < args.len() {
        let token = args[i].as_ref();
        i += 1;

        if after_separator {
            // With no executable before `--`, the first trailing token takes
            // that role unless it looks like a flag.
            if first_trailing && out.executable.is_none() && !is_flag_like(token) {
                out.executable = Some(token.to_string());
            } else {
                trailing.push(token.to_string());
            }
            first_trailing = false;
            continue;
        }

        if token == SEPARATOR {
            after_separator = true;
            continue;
        }

        let Some((spec, inline)) = flags::lookup(token) else {
            if is_flag_like(token) {
                tracing::debug!(token, "unrecognized flag forwarded to executable");
                out.executable_args.push(token.to_string());
            } else if out.executable.is_none() {
                out.executable = Some(token.to_string());
            } else {
                out.executable_args.push(token.to_string());
            }
            continue;
        };

        if spec.takes_value() {
            let value = match inline {
                Some(v) => v.to_string(),
                None => {
                    let next = args
                        .get(i)
                        .map(|next| next.as_ref())
                        .filter(|next| *next != SEPARATOR)
                        .ok_or_else(|| TranslateError::MissingFlagValue {
                            flag: token.to_string(),
                        })?;
                    i += 1;
                    next.to_string()
                }
            };

            match spec.kind {
                FlagKind::Runner => {
                    tracing::debug!(flag = spec.dest, value = %value, "runner flag");
                    out.runner.set(spec.key, Some(value));
                }
                _ => {
                    // Forwarded verbatim, in whichever form it was given.
                    out.executable_args.push(token.to_string());
                    if inline.is_none() {
                        out.executable_args.push(value);
                    }
                }
            }
            continue;
        }

        if inline.is_some() {
            return Err(TranslateError::UnexpectedFlagValue {
                flag: token.to_string(),
            });
        }

        match spec.kind {
            FlagKind::RunnerSwitch => out.runner.set(spec.key, None),
            FlagKind::LocalSwitch => out.store_test_artifacts = true,
            _ => {
                tracing::warn!(flag = token, "ignoring unsupported compatibility flag");
                out.dropped.push(token.to_string());
            }
        }
    }

    out.executable_args.extend(trailing);
    Ok(out)
}

/// `-` alone is a positional (conventionally stdin), anything else starting
/// with `-` is a flag.
fn is_flag_like(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}
