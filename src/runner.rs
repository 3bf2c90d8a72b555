//! Tool resolution and subprocess execution seam.
//!
//! The pipelines only ever talk to a `ToolRunner`, so the real system
//! runner, the dry-run previewer and the tests' canned-answer double are
//! interchangeable. `which` lookups are in-process and do not count as
//! tool invocations; `run` calls do.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::errors::TaskError;
use crate::exec::{self, ExecRequest};
use crate::plan::CommandPlan;

#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

pub trait ToolRunner {
    fn which(&self, tool: &str) -> Result<PathBuf>;
    fn run(&mut self, plan: &CommandPlan) -> Result<ToolOutput>;
}

/// Real subprocess execution. Captures output (the captured stderr becomes
/// the failure reason on non-zero exit) and echoes captured stdout to the
/// task log afterwards.
pub struct SystemRunner {
    verbose: bool,
}

impl SystemRunner {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ToolRunner for SystemRunner {
    fn which(&self, tool: &str) -> Result<PathBuf> {
        which::which(tool).map_err(|e| anyhow!("{tool}: {e}"))
    }

    fn run(&mut self, plan: &CommandPlan) -> Result<ToolOutput> {
        if self.verbose {
            eprintln!("appstore-deploy: running: {}", plan.preview());
        }
        let mut request = ExecRequest::new(&plan.program)
            .args(plan.args.iter().map(String::as_str))
            .capture_output(true);
        for (key, value) in &plan.env {
            request = request.env(key, value);
        }
        let out = exec::run(request)?;
        if !out.stdout.is_empty() {
            print!("{}", out.stdout);
        }
        let exit_code = out.status.code().unwrap_or(-1);
        if exit_code == 0 && !out.stderr.is_empty() {
            eprint!("{}", out.stderr);
        }
        Ok(ToolOutput {
            exit_code,
            stdout: out.stdout,
            stderr: out.stderr,
        })
    }
}

/// Prints what would run instead of running it. Probe outputs come back
/// empty, so version provisioning previews its pessimistic branch.
pub struct DryRunRunner;

impl ToolRunner for DryRunRunner {
    fn which(&self, tool: &str) -> Result<PathBuf> {
        Ok(PathBuf::from(tool))
    }

    fn run(&mut self, plan: &CommandPlan) -> Result<ToolOutput> {
        let keys = plan.env_keys();
        if keys.is_empty() {
            eprintln!("appstore-deploy: would run: {}", plan.preview());
        } else {
            eprintln!(
                "appstore-deploy: would run: {} (env: {})",
                plan.preview(),
                keys.join(", ")
            );
        }
        Ok(ToolOutput {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

/// Run a plan, mapping spawn failures into the task taxonomy but leaving
/// the exit code to the caller (the gem version probe is allowed to exit
/// non-zero).
pub fn run_raw(
    runner: &mut dyn ToolRunner,
    plan: &CommandPlan,
) -> Result<ToolOutput, TaskError> {
    runner.run(plan).map_err(|e| {
        let not_found = e
            .downcast_ref::<std::io::Error>()
            .map(|io| io.kind() == std::io::ErrorKind::NotFound)
            .unwrap_or(false);
        TaskError::ToolExecutionFailed {
            message: format!("{e:#}"),
            not_found,
        }
    })
}

/// Run a plan and require exit code 0; non-zero is terminal with the
/// captured stderr as the failure reason.
pub fn run_checked(
    runner: &mut dyn ToolRunner,
    plan: &CommandPlan,
) -> Result<ToolOutput, TaskError> {
    let out = run_raw(runner, plan)?;
    if !out.success() {
        let stderr = out.stderr.trim();
        let message = if stderr.is_empty() {
            format!("{} failed with exit code {}", plan.program, out.exit_code)
        } else {
            stderr.to_string()
        };
        return Err(TaskError::tool_failed(message));
    }
    Ok(out)
}

/// Run the final fastlane command. The two-factor staging lines bracket
/// the invocation on every exit path, success or failure, mirroring the
/// scoped acquire/release the host expects to see in its log.
pub fn run_fastlane(
    runner: &mut dyn ToolRunner,
    plan: &CommandPlan,
) -> Result<(), TaskError> {
    let two_factor = !plan.env.is_empty();
    if two_factor {
        println!("Using two-factor authentication");
    }
    let result = run_checked(runner, plan);
    if two_factor {
        println!("Clearing two-factor authentication environment variables");
    }
    result.map(|_| ())
}
