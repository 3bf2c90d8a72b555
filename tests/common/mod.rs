#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use appstore_deploy::{AuthInputs, CommandPlan, ReleaseInputs, ToolOutput, ToolRunner};

/// Canned-answer tool runner: `which` resolves from a fixed table and every
/// `run` call is recorded by its preview string, so tests can assert exact
/// command sequences and invocation counts without spawning anything.
pub struct RecordingRunner {
    pub which_answers: HashMap<String, PathBuf>,
    pub exec_answers: HashMap<String, (i32, String, String)>,
    /// Preview strings of every run() call, in order.
    pub invoked: Vec<String>,
    /// Environment overlay key names per run() call, in order.
    pub invoked_env: Vec<Vec<String>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        let mut which_answers = HashMap::new();
        for tool in ["ruby", "gem", "fastlane"] {
            which_answers.insert(tool.to_string(), PathBuf::from(format!("/usr/bin/{tool}")));
        }
        Self {
            which_answers,
            exec_answers: HashMap::new(),
            invoked: Vec::new(),
            invoked_env: Vec::new(),
        }
    }

    /// Commands without an explicit answer succeed with empty output.
    pub fn answer(&mut self, command: &str, exit_code: i32, stdout: &str) {
        self.exec_answers.insert(
            command.to_string(),
            (exit_code, stdout.to_string(), String::new()),
        );
    }

    pub fn answer_with_stderr(&mut self, command: &str, exit_code: i32, stderr: &str) {
        self.exec_answers.insert(
            command.to_string(),
            (exit_code, String::new(), stderr.to_string()),
        );
    }

    pub fn drop_tool(&mut self, tool: &str) {
        self.which_answers.remove(tool);
    }
}

impl ToolRunner for RecordingRunner {
    fn which(&self, tool: &str) -> Result<PathBuf> {
        self.which_answers
            .get(tool)
            .cloned()
            .ok_or_else(|| anyhow!("{tool}: not found"))
    }

    fn run(&mut self, plan: &CommandPlan) -> Result<ToolOutput> {
        let preview = plan.preview();
        self.invoked.push(preview.clone());
        self.invoked_env.push(
            plan.env_keys()
                .iter()
                .map(|k| k.to_string())
                .collect(),
        );
        let (exit_code, stdout, stderr) = self
            .exec_answers
            .get(&preview)
            .cloned()
            .unwrap_or((0, String::new(), String::new()));
        Ok(ToolOutput {
            exit_code,
            stdout,
            stderr,
        })
    }
}

pub fn userpass_auth() -> AuthInputs {
    AuthInputs {
        auth_type: Some("UserAndPass".to_string()),
        username: Some("creds-username".to_string()),
        password: Some("creds-password".to_string()),
        ..AuthInputs::default()
    }
}

/// A temp dir holding the given file names, plus the `*.ipa` glob into it.
pub fn ipa_dir(files: &[&str]) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tmpdir");
    for name in files {
        std::fs::write(dir.path().join(name), b"ipa").expect("write ipa");
    }
    let pattern = format!("{}/*.ipa", dir.path().display());
    (dir, pattern)
}

/// TestFlight release inputs with user/pass auth and the given ipa glob.
pub fn testflight_inputs(ipa_pattern: &str) -> ReleaseInputs {
    ReleaseInputs {
        auth: userpass_auth(),
        release_track: Some("TestFlight".to_string()),
        ipa_path: Some(ipa_pattern.to_string()),
        ..ReleaseInputs::default()
    }
}

/// The path `resolve_ipa` yields for a single-match fixture.
pub fn resolved_ipa(dir: &tempfile::TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}
