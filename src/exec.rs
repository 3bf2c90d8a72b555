//! Explicit subprocess execution: program, argv, working directory and an
//! environment overlay handed to the spawn call. Secrets travel on the
//! request, never through the parent process environment.
//!
//! Invocations are synchronous and blocking; the planner defines no
//! timeout of its own.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};

#[derive(Debug, Default)]
pub struct ExecRequest {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    env: Vec<(OsString, OsString)>,
    capture_output: bool,
}

impl ExecRequest {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }
}

#[derive(Debug)]
pub struct ExecOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

pub fn run(request: ExecRequest) -> Result<ExecOutput> {
    let mut cmd = Command::new(&request.program);
    for arg in &request.args {
        cmd.arg(arg);
    }
    if let Some(ref cwd) = request.cwd {
        cmd.current_dir(cwd);
    }
    for (key, value) in &request.env {
        cmd.env(key, value);
    }

    if request.capture_output {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        let out = cmd.output().with_context(|| {
            format!(
                "failed to spawn {:?} with args {:?}",
                request.program, request.args
            )
        })?;
        Ok(ExecOutput {
            status: out.status,
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    } else {
        let status = cmd.status().with_context(|| {
            format!(
                "failed to spawn {:?} with args {:?}",
                request.program, request.args
            )
        })?;
        Ok(ExecOutput {
            status,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}
