//! Task error taxonomy and exit-code mapping.
//!
//! Every failure is terminal for the current run. The `Display` output of
//! `TaskError` is the exact marker line the pipeline host consumes, so the
//! strings here are a compatibility surface: do not reword them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    /// A mandatory task input is missing or empty. Raised before any
    /// subprocess runs for structurally-required inputs; `appIdentifier`
    /// on the Production track is the one late check (it is validated at
    /// synthesis time, after provisioning).
    #[error("Input required: {0}")]
    InputRequired(&'static str),

    /// fastlane and gem need a Darwin host; checked before anything else.
    #[error("Error: DarwinOnly")]
    DarwinOnly,

    /// A service endpoint carried an app-specific password without a
    /// session token. App-specific-password auth is only valid paired
    /// with a fastlane session.
    #[error("Error: FastlaneSessionEmpty")]
    FastlaneSessionEmpty,

    #[error("Error: NoIpaFilesFound")]
    NoIpaFilesFound,

    #[error("Error: MultipleIpaFilesFound")]
    MultipleIpaFilesFound,

    /// External-tester distribution was requested without release notes.
    #[error("Error: ReleaseNotesRequiredForExternalTesting")]
    ReleaseNotesRequiredForExternalTesting,

    /// A subprocess exited non-zero or could not be spawned. The message
    /// carries the captured stderr (or the spawn error).
    #[error("Error: ToolExecutionFailed: {message}")]
    ToolExecutionFailed { message: String, not_found: bool },
}

impl TaskError {
    pub fn tool_failed(message: impl Into<String>) -> Self {
        TaskError::ToolExecutionFailed {
            message: message.into(),
            not_found: false,
        }
    }

    pub fn tool_not_found(tool: &str) -> Self {
        TaskError::ToolExecutionFailed {
            message: format!("{tool} not found on PATH"),
            not_found: true,
        }
    }
}

/// Map a task error to the process exit code:
/// - 127 when a required tool could not be found
/// - 1 for everything else
pub fn exit_code_for_task_error(e: &TaskError) -> u8 {
    match e {
        TaskError::ToolExecutionFailed {
            not_found: true, ..
        } => 127,
        _ => 1,
    }
}
