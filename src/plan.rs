//! Command synthesis and preview rendering.
//!
//! Argument order is a compatibility contract: the host's historical test
//! suite asserts exact command strings, so every synthesizer appends flags
//! in a fixed, documented order. Changing the order is a breaking change
//! even when fastlane itself would accept either.

use crate::credentials::Credentials;
use crate::errors::TaskError;
use crate::inputs::{nonempty, PromoteInputs, ReleaseInputs};

/// A fully assembled subprocess invocation: program, argv and the
/// environment overlay handed to the spawn call. Built once, executed
/// once, discarded.
#[derive(Debug, Clone, Default)]
pub struct CommandPlan {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl CommandPlan {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn push(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    pub fn push_pair(&mut self, flag: &str, value: impl Into<String>) {
        self.args.push(flag.to_string());
        self.args.push(value.into());
    }

    /// Shell-escaped rendition of the invocation, for logs, dry runs and
    /// exact-string assertions. Overlay values are never part of it.
    pub fn preview(&self) -> String {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(self.program.clone());
        words.extend(self.args.iter().cloned());
        shell_join(&words)
    }

    /// Overlay variable names, for previews that must not leak values.
    pub fn env_keys(&self) -> Vec<&str> {
        self.env.iter().map(|(k, _)| k.as_str()).collect()
    }
}

pub fn shell_escape(s: &str) -> String {
    if s.is_empty() {
        "''".to_string()
    } else if s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_=./:@".contains(c))
    {
        s.to_string()
    } else {
        let escaped = s.replace('\'', "'\"'\"'");
        format!("'{}'", escaped)
    }
}

pub fn shell_join(args: &[String]) -> String {
    args.iter()
        .map(|a| shell_escape(a))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `fastlane pilot upload` for the TestFlight track.
///
/// Flag order: `-u`, `-i`, `-q`, `-r`, `-a`, `--skip_submission`,
/// `--skip_waiting_for_build_processing`, external-tester distribution
/// (`--distribute_external`, `--changelog`, `--groups`), extra arguments.
pub fn pilot_upload_plan(
    creds: &Credentials,
    ipa: &str,
    inputs: &ReleaseInputs,
) -> CommandPlan {
    let mut plan = CommandPlan::new("fastlane");
    plan.push("pilot");
    plan.push("upload");
    plan.push_pair("-u", &creds.username);
    plan.push_pair("-i", ipa);
    if let Some(team) = nonempty(&inputs.team_id) {
        plan.push_pair("-q", team);
    }
    if let Some(team) = nonempty(&inputs.team_name) {
        plan.push_pair("-r", team);
    }
    if let Some(app) = nonempty(&inputs.app_identifier) {
        plan.push_pair("-a", app);
    }
    if inputs.skip_submission {
        plan.push_pair("--skip_submission", "true");
    }
    if inputs.skip_waiting_for_processing {
        plan.push_pair("--skip_waiting_for_build_processing", "true");
    }
    if inputs.distribute_to_external_testers {
        // Non-empty release notes were enforced before synthesis.
        plan.push_pair("--distribute_external", "true");
        if let Some(notes) = nonempty(&inputs.release_notes) {
            plan.push_pair("--changelog", notes);
        }
        if let Some(groups) = nonempty(&inputs.external_tester_groups) {
            plan.push_pair("--groups", groups);
        }
    }
    push_extra_arguments(&mut plan, &inputs.fastlane_arguments);
    plan.env = creds.two_factor_env();
    plan
}

/// `fastlane deliver --force` for the Production track.
///
/// Flag order: `-u`, `-a`, `-i`, `--skip_binary_upload`,
/// metadata (`-m` or `--skip_metadata`), screenshots (`-w` or
/// `--skip_screenshots`), `-k`, `-e`, `--submit_for_review`,
/// `--automatic_release`, extra arguments. `appIdentifier` is mandatory
/// here and deliberately validated this late: provisioning has already
/// run by the time synthesis happens.
pub fn deliver_upload_plan(
    creds: &Credentials,
    ipa: &str,
    inputs: &ReleaseInputs,
) -> Result<CommandPlan, TaskError> {
    let app = nonempty(&inputs.app_identifier).ok_or(TaskError::InputRequired("appIdentifier"))?;
    let mut plan = CommandPlan::new("fastlane");
    plan.push("deliver");
    plan.push("--force");
    plan.push_pair("-u", &creds.username);
    plan.push_pair("-a", app);
    plan.push_pair("-i", ipa);
    if inputs.skip_binary_upload {
        plan.push_pair("--skip_binary_upload", "true");
    }
    if inputs.upload_metadata {
        if let Some(path) = nonempty(&inputs.metadata_path) {
            plan.push_pair("-m", path);
        }
    } else {
        plan.push_pair("--skip_metadata", "true");
    }
    if inputs.upload_screenshots {
        if let Some(path) = nonempty(&inputs.screenshots_path) {
            plan.push_pair("-w", path);
        }
    } else {
        plan.push_pair("--skip_screenshots", "true");
    }
    if let Some(team) = nonempty(&inputs.team_id) {
        plan.push_pair("-k", team);
    }
    if let Some(team) = nonempty(&inputs.team_name) {
        plan.push_pair("-e", team);
    }
    if inputs.submit_for_review {
        plan.push_pair("--submit_for_review", "true");
    }
    if inputs.auto_release {
        plan.push_pair("--automatic_release", "true");
    }
    push_extra_arguments(&mut plan, &inputs.fastlane_arguments);
    plan.env = creds.two_factor_env();
    Ok(plan)
}

/// `fastlane deliver submit_build` for the promote task.
///
/// The skip trio is always emitted; `--automatic_release` (valueless
/// here) only with auto-release; `--force` always trails so deliver
/// never stops for the HTML report confirmation.
pub fn deliver_submit_plan(
    creds: &Credentials,
    app_identifier: &str,
    build_number: Option<&str>,
    inputs: &PromoteInputs,
) -> CommandPlan {
    let mut plan = CommandPlan::new("fastlane");
    plan.push("deliver");
    plan.push("submit_build");
    plan.push_pair("-u", &creds.username);
    plan.push_pair("-a", app_identifier);
    if let Some(build) = build_number {
        plan.push_pair("-n", build);
    }
    plan.push_pair("--skip_binary_upload", "true");
    plan.push_pair("--skip_metadata", "true");
    plan.push_pair("--skip_screenshots", "true");
    if let Some(team) = nonempty(&inputs.team_id) {
        plan.push_pair("-k", team);
    }
    if let Some(team) = nonempty(&inputs.team_name) {
        plan.push_pair("-e", team);
    }
    if inputs.auto_release {
        plan.push("--automatic_release");
    }
    plan.push("--force");
    plan.env = creds.two_factor_env();
    plan
}

fn push_extra_arguments(plan: &mut CommandPlan, extra: &Option<String>) {
    if let Some(raw) = nonempty(extra) {
        for word in raw.split_whitespace() {
            plan.push(word);
        }
    }
}
