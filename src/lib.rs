//! appstore-deploy — drive fastlane for TestFlight and App Store
//! submission from a CI task.
//!
//! The whole crate is one strict, blocking pipeline: input resolution →
//! platform guard → credential resolution → artifact resolution →
//! toolchain provisioning → command synthesis → execution → result
//! reporting. No concurrency, no retries, no timeouts; every failure is
//! terminal and maps to a non-zero process exit with a marker line the
//! pipeline host consumes.

pub mod artifact;
pub mod cli;
pub mod color;
pub mod credentials;
pub mod doctor;
pub mod errors;
pub mod exec;
pub mod gems;
pub mod inputs;
pub mod plan;
pub mod platform;
pub mod promote;
pub mod release;
pub mod runner;

pub use color::{
    color_enabled_stderr, color_enabled_stdout, log_error_stderr, log_info_stderr,
    log_warn_stderr, paint, set_color_mode, ColorMode,
};
pub use credentials::{Credentials, APP_SPECIFIC_PASSWORD_VAR, FASTLANE_SESSION_VAR};
pub use errors::{exit_code_for_task_error, TaskError};
pub use gems::FastlaneVersionPlan;
pub use inputs::{AuthInputs, PromoteInputs, ReleaseInputs};
pub use plan::{shell_escape, shell_join, CommandPlan};
pub use promote::run_promote;
pub use release::run_release;
pub use runner::{DryRunRunner, SystemRunner, ToolOutput, ToolRunner};
