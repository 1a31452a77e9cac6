//! `shardwrap plan`: translate and print, never launch.

use anyhow::Context as _;
use serde::Serialize;
use shardwrap_core::{current_env, translate, ParsedInvocation, WrapperConfig};

use crate::cli::args::{PlanArgs, PlanFormat};
use crate::exit_codes::SUCCESS;

#[derive(Serialize)]
struct PlanReport<'a> {
    command: Vec<String>,
    #[serde(flatten)]
    invocation: &'a ParsedInvocation,
}

pub fn run(args: PlanArgs, config: &WrapperConfig) -> anyhow::Result<i32> {
    let env = current_env();
    let cores = config.core_count();
    let invocation = translate(&args.args, &env, &*cores, &config.translate_options())
        .context("failed to translate arguments")?;
    let command = config.launch_command(&invocation);

    tracing::debug!(
        removed_env = ?invocation.removed_env,
        child_env_vars = invocation.environment.len(),
        "planned child environment"
    );

    match args.format {
        PlanFormat::Text => print!("{}", render_text(&command, &invocation)),
        PlanFormat::Json => {
            let report = PlanReport {
                command,
                invocation: &invocation,
            };
            let json = serde_json::to_string_pretty(&report).context("failed to encode plan")?;
            println!("{json}");
        }
    }
    Ok(SUCCESS)
}

fn render_text(command: &[String], invocation: &ParsedInvocation) -> String {
    let mut out = shell_words::join(command);
    out.push('\n');
    if let Some(dir) = &invocation.output_dir {
        out.push_str(&format!("output_dir: {dir}\n"));
    }
    if let Some(dir) = &invocation.test_artifacts_dir {
        out.push_str(&format!("test_artifacts_dir: {dir}\n"));
    }
    if !invocation.removed_env.is_empty() {
        out.push_str(&format!("removed_env: {}\n", invocation.removed_env.join(", ")));
    }
    if !invocation.dropped_flags.is_empty() {
        out.push_str(&format!("dropped: {}\n", invocation.dropped_flags.join(", ")));
    }
    out
}
