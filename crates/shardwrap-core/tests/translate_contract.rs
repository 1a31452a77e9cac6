use std::collections::BTreeMap;

use shardwrap_core::{translate, FixedCores, ParsedInvocation, TranslateError, TranslateOptions};

fn env_of(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn parse(args: &[&str]) -> Result<ParsedInvocation, TranslateError> {
    parse_with(args, &BTreeMap::new(), 4)
}

fn parse_with(
    args: &[&str],
    env: &BTreeMap<String, String>,
    cores: usize,
) -> Result<ParsedInvocation, TranslateError> {
    translate(args, env, &FixedCores(cores), &TranslateOptions::default())
}

#[test]
fn shard_flags_default_to_single_shard() {
    let inv = parse(&["exec"]).unwrap();
    assert_eq!(&inv.runner_args[..2], &["--shard_index=0", "--shard_count=1"]);
    assert!(inv.removed_env.is_empty());
}

#[test]
fn shard_env_becomes_flags_and_is_stripped() {
    let env = env_of(&[
        ("GTEST_SHARD_INDEX", "42"),
        ("GTEST_TOTAL_SHARDS", "64"),
        ("PATH", "/usr/bin"),
    ]);
    let inv = parse_with(&["--gtest_color=no", "exec"], &env, 4).unwrap();

    assert_eq!(
        inv.command_line(),
        vec!["--shard_index=42", "--shard_count=64", "--gtest_color=no", "exec"]
    );
    assert_eq!(inv.environment, env_of(&[("PATH", "/usr/bin")]));
    assert_eq!(inv.removed_env, vec!["GTEST_SHARD_INDEX", "GTEST_TOTAL_SHARDS"]);
}

#[test]
fn shard_flags_appear_exactly_once() {
    let env = env_of(&[("GTEST_SHARD_INDEX", "1"), ("GTEST_TOTAL_SHARDS", "2")]);
    let inv = parse_with(
        &["--shard_count=8", "exec", "--shard_index=3", "--", "--shard_index=9"],
        &env,
        4,
    )
    .unwrap();
    let runner_index = inv
        .runner_args
        .iter()
        .filter(|a| a.starts_with("--shard_index="))
        .count();
    let runner_count = inv
        .runner_args
        .iter()
        .filter(|a| a.starts_with("--shard_count="))
        .count();
    assert_eq!((runner_index, runner_count), (1, 1));
    assert_eq!(&inv.runner_args[..2], &["--shard_index=3", "--shard_count=8"]);
    // Tokens after the separator belong to the executable.
    assert_eq!(inv.executable_args, vec!["--shard_index=9"]);
}

#[test]
fn isolated_script_test_output_is_renamed() {
    let inv = parse(&["--isolated-script-test-output=/tmp/foo", "exec"]).unwrap();
    assert!(inv
        .runner_args
        .contains(&"--dump_json_test_results=/tmp/foo".to_string()));
    assert_eq!(inv.executable, "exec");
    assert!(inv.executable_args.is_empty());
}

#[test]
fn isolated_script_test_perf_output_passes_through() {
    let inv = parse(&["--isolated-script-test-perf-output=/tmp/bar", "exec"]).unwrap();
    assert_eq!(inv.runner_args, vec!["--shard_index=0", "--shard_count=1"]);
    assert_eq!(
        inv.executable_args,
        vec!["--isolated-script-test-perf-output=/tmp/bar"]
    );
}

#[test]
fn no_sandbox_is_dropped() {
    let inv = parse(&["--no-sandbox", "exec", "--foo"]).unwrap();
    assert_eq!(
        inv.command_line(),
        vec!["--shard_index=0", "--shard_count=1", "exec", "--", "--foo"]
    );
    assert_eq!(inv.dropped_flags, vec!["--no-sandbox"]);
}

#[test]
fn workers_multiplier() {
    let inv = parse_with(&["--workers", "2x", "exec"], &BTreeMap::new(), 8).unwrap();
    assert!(inv.runner_args.contains(&"--workers=16".to_string()));

    let inv = parse_with(&["--workers=0.5x", "exec"], &BTreeMap::new(), 8).unwrap();
    assert!(inv.runner_args.contains(&"--workers=4".to_string()));

    let inv = parse_with(&["--workers=0.5x", "exec"], &BTreeMap::new(), 1).unwrap();
    assert!(inv.runner_args.contains(&"--workers=1".to_string()));
}

#[test]
fn workers_literal() {
    let inv = parse(&["-w", "17", "exec"]).unwrap();
    assert!(inv.runner_args.contains(&"--workers=17".to_string()));
}

#[test]
fn invalid_workers_fails() {
    let err = parse(&["--workers=lots", "exec"]).unwrap_err();
    assert!(matches!(err, TranslateError::InvalidWorkerSpec { .. }));
}

#[test]
fn store_test_artifacts() {
    let inv = parse(&[
        "exec",
        "--store-test-artifacts",
        "--output_dir",
        "/tmp/foo",
    ])
    .unwrap();
    assert_eq!(inv.output_dir.as_deref(), Some("/tmp/foo"));
    assert_eq!(
        inv.test_artifacts_dir.as_deref(),
        Some("/tmp/foo/test_artifacts")
    );
    assert_eq!(
        inv.executable_args[0],
        "--test_artifacts_dir=/tmp/foo/test_artifacts"
    );
    assert!(inv.runner_args.contains(&"--output_dir=/tmp/foo".to_string()));
}

#[test]
fn store_test_artifacts_with_short_output_dir() {
    let inv = parse(&["-d", "/tmp/foo", "--store-test-artifacts", "exec", "--x"]).unwrap();
    assert_eq!(
        inv.executable_args,
        vec!["--test_artifacts_dir=/tmp/foo/test_artifacts", "--x"]
    );
    assert!(inv.runner_args.contains(&"--output_dir=/tmp/foo".to_string()));
}

#[test]
fn store_test_artifacts_requires_output_dir() {
    let err = parse(&["--store-test-artifacts", "exec"]).unwrap_err();
    assert!(matches!(err, TranslateError::Configuration { .. }));
}

#[test]
fn no_artifacts_without_store_flag() {
    let inv = parse(&["--output_dir=/tmp/foo", "exec"]).unwrap();
    assert_eq!(inv.output_dir.as_deref(), Some("/tmp/foo"));
    assert_eq!(inv.test_artifacts_dir, None);
}

#[test]
fn last_occurrence_wins() {
    let inv = parse(&["--timeout=123", "exec", "--timeout", "124"]).unwrap();
    assert!(inv.runner_args.contains(&"--timeout=124".to_string()));
    assert!(!inv.runner_args.contains(&"--timeout=123".to_string()));
    assert!(inv.executable_args.is_empty());
}

#[test]
fn retry_limit_alias_overrides_retry_failed() {
    let inv = parse(&[
        "--retry_failed=1",
        "exec",
        "--isolated-script-test-launcher-retry-limit=0",
    ])
    .unwrap();
    assert_eq!(
        inv.runner_args,
        vec!["--shard_index=0", "--shard_count=1", "--retry_failed=0"]
    );
}

#[test]
fn gtest_parallel_flags_in_first_occurrence_order() {
    let inv = parse(&[
        "--gtest_filter=Foo.*",
        "-r",
        "3",
        "--gtest_also_run_disabled_tests",
        "--timeout=60",
        "--gtest_color=yes",
        "exec",
    ])
    .unwrap();
    assert_eq!(
        inv.runner_args,
        vec![
            "--shard_index=0",
            "--shard_count=1",
            "--gtest_filter=Foo.*",
            "--repeat=3",
            "--gtest_also_run_disabled_tests",
            "--timeout=60",
            "--gtest_color=yes",
        ]
    );
}

#[test]
fn unrecognized_flags_go_to_the_executable() {
    let inv = parse(&["--some_flag=some_value", "exec", "--another_flag", "positional"]).unwrap();
    assert_eq!(inv.executable, "exec");
    assert_eq!(
        inv.executable_args,
        vec!["--some_flag=some_value", "--another_flag", "positional"]
    );
}

#[test]
fn full_ci_invocation() {
    let env = env_of(&[("GTEST_SHARD_INDEX", "0"), ("GTEST_TOTAL_SHARDS", "2")]);
    let inv = parse_with(
        &[
            "some_test",
            "--some_flag=some_value",
            "--another_flag",
            "--output_dir=/out",
            "--store-test-artifacts",
            "--isolated-script-test-output=/out/results.json",
            "--isolated-script-test-perf-output=/out/perf.json",
            "--",
            "--foo=bar",
            "--baz",
        ],
        &env,
        4,
    )
    .unwrap();

    assert_eq!(
        inv.command_line(),
        vec![
            "--shard_index=0",
            "--shard_count=2",
            "--output_dir=/out",
            "--dump_json_test_results=/out/results.json",
            "some_test",
            "--",
            "--test_artifacts_dir=/out/test_artifacts",
            "--some_flag=some_value",
            "--another_flag",
            "--isolated-script-test-perf-output=/out/perf.json",
            "--foo=bar",
            "--baz",
        ]
    );
    assert_eq!(inv.output_dir.as_deref(), Some("/out"));
    assert_eq!(inv.test_artifacts_dir.as_deref(), Some("/out/test_artifacts"));
}

#[test]
fn missing_executable() {
    assert_eq!(
        parse(&["--gtest_filter=A.*"]).unwrap_err(),
        TranslateError::MissingExecutable
    );
    assert_eq!(parse(&[]).unwrap_err(), TranslateError::MissingExecutable);
}

#[test]
fn executable_after_separator_must_not_look_like_a_flag() {
    assert_eq!(
        parse(&["--", "--timeout=5", "x"]).unwrap_err(),
        TranslateError::MissingExecutable
    );
    assert_eq!(
        parse(&["--", "-foo"]).unwrap_err(),
        TranslateError::MissingExecutable
    );

    let inv = parse(&["--timeout=5", "--", "x", "--timeout=6"]).unwrap();
    assert_eq!(
        inv.command_line(),
        vec!["--shard_index=0", "--shard_count=1", "--timeout=5", "x", "--", "--timeout=6"]
    );
    let again = parse(&inv.command_line().iter().map(String::as_str).collect::<Vec<_>>()).unwrap();
    assert_eq!(again.command_line(), inv.command_line());
}

#[test]
fn invocation_serializes_without_environment() {
    let env = env_of(&[("SECRET_THING", "x")]);
    let inv = parse_with(&["exec"], &env, 1).unwrap();
    let json = serde_json::to_value(&inv).unwrap();
    assert_eq!(json["executable"], "exec");
    assert!(json.get("environment").is_none());
    assert!(json["test_artifacts_dir"].is_null());
}
