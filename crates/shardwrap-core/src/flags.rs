//! The enumerated runner flag set.
//!
//! Every flag the wrapper understands is declared once in [`FLAGS`]. Anything
//! not in this table belongs to the test executable.

/// Identity of a recognized flag. Aliases share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlagKey {
    ShardIndex,
    ShardCount,
    OutputDir,
    Repeat,
    RetryFailed,
    Workers,
    GtestColor,
    GtestFilter,
    AlsoRunDisabledTests,
    Timeout,
    JsonTestResults,
    PerfOutput,
    NoSandbox,
    StoreTestArtifacts,
}

/// How a recognized flag is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Takes a value; re-emitted to the runner as `--<dest>=<value>`.
    Runner,
    /// Takes no value; re-emitted to the runner as `--<dest>`.
    RunnerSwitch,
    /// Takes a value; forwarded verbatim to the test executable.
    Forward,
    /// Takes no value; consumed by the wrapper itself.
    LocalSwitch,
    /// Accepted and discarded.
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    pub key: FlagKey,
    /// Long spellings including the leading `--`.
    pub long: &'static [&'static str],
    /// Short spelling including the leading `-`.
    pub short: Option<&'static str>,
    pub kind: FlagKind,
    /// Name used when the flag is re-emitted.
    pub dest: &'static str,
}

impl FlagSpec {
    pub fn takes_value(&self) -> bool {
        matches!(self.kind, FlagKind::Runner | FlagKind::Forward)
    }

    /// Canonical runner-facing form, `None` for flags the runner never sees.
    pub fn emit(&self, value: Option<&str>) -> Option<String> {
        match (self.kind, value) {
            (FlagKind::Runner, Some(v)) => Some(format!("--{}={}", self.dest, v)),
            (FlagKind::RunnerSwitch, _) => Some(format!("--{}", self.dest)),
            _ => None,
        }
    }
}

pub const FLAGS: &[FlagSpec] = &[
    FlagSpec {
        key: FlagKey::ShardIndex,
        long: &["--shard_index"],
        short: None,
        kind: FlagKind::Runner,
        dest: "shard_index",
    },
    FlagSpec {
        key: FlagKey::ShardCount,
        long: &["--shard_count"],
        short: None,
        kind: FlagKind::Runner,
        dest: "shard_count",
    },
    FlagSpec {
        key: FlagKey::OutputDir,
        long: &["--output_dir"],
        short: Some("-d"),
        kind: FlagKind::Runner,
        dest: "output_dir",
    },
    FlagSpec {
        key: FlagKey::Repeat,
        long: &["--repeat"],
        short: Some("-r"),
        kind: FlagKind::Runner,
        dest: "repeat",
    },
    // The infra retry limit shares a destination with --retry_failed.
    FlagSpec {
        key: FlagKey::RetryFailed,
        long: &["--retry_failed", "--isolated-script-test-launcher-retry-limit"],
        short: None,
        kind: FlagKind::Runner,
        dest: "retry_failed",
    },
    FlagSpec {
        key: FlagKey::Workers,
        long: &["--workers"],
        short: Some("-w"),
        kind: FlagKind::Runner,
        dest: "workers",
    },
    FlagSpec {
        key: FlagKey::GtestColor,
        long: &["--gtest_color"],
        short: None,
        kind: FlagKind::Runner,
        dest: "gtest_color",
    },
    FlagSpec {
        key: FlagKey::GtestFilter,
        long: &["--gtest_filter"],
        short: None,
        kind: FlagKind::Runner,
        dest: "gtest_filter",
    },
    FlagSpec {
        key: FlagKey::AlsoRunDisabledTests,
        long: &["--gtest_also_run_disabled_tests"],
        short: None,
        kind: FlagKind::RunnerSwitch,
        dest: "gtest_also_run_disabled_tests",
    },
    FlagSpec {
        key: FlagKey::Timeout,
        long: &["--timeout"],
        short: None,
        kind: FlagKind::Runner,
        dest: "timeout",
    },
    FlagSpec {
        key: FlagKey::JsonTestResults,
        long: &["--isolated-script-test-output", "--dump_json_test_results"],
        short: None,
        kind: FlagKind::Runner,
        dest: "dump_json_test_results",
    },
    // Perf output files are shared across test processes and cannot be split
    // per shard, so the runner never sees this one.
    FlagSpec {
        key: FlagKey::PerfOutput,
        long: &["--isolated-script-test-perf-output"],
        short: None,
        kind: FlagKind::Forward,
        dest: "isolated-script-test-perf-output",
    },
    FlagSpec {
        key: FlagKey::NoSandbox,
        long: &["--no-sandbox"],
        short: None,
        kind: FlagKind::Dropped,
        dest: "no-sandbox",
    },
    FlagSpec {
        key: FlagKey::StoreTestArtifacts,
        long: &["--store-test-artifacts"],
        short: None,
        kind: FlagKind::LocalSwitch,
        dest: "store-test-artifacts",
    },
];

/// Find the spec for `key`.
pub fn spec(key: FlagKey) -> &'static FlagSpec {
    FLAGS
        .iter()
        .find(|s| s.key == key)
        .unwrap_or_else(|| unreachable!("every FlagKey has a FLAGS entry"))
}

/// Match a raw token against the table.
///
/// Long flags match `--name` and `--name=value` exactly (no abbreviation).
/// Short flags match only the bare `-d` form; the value is the next token.
pub fn lookup(token: &str) -> Option<(&'static FlagSpec, Option<&str>)> {
    if let Some(rest) = token.strip_prefix("--") {
        if rest.is_empty() {
            return None;
        }
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        return FLAGS
            .iter()
            .find(|s| s.long.contains(&name))
            .map(|s| (s, inline));
    }

    FLAGS
        .iter()
        .find(|s| s.short == Some(token))
        .map(|s| (s, None))
}
