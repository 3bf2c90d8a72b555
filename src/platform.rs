//! Darwin host precondition.

use crate::errors::TaskError;

/// Override so non-darwin CI can exercise the full pipeline end to end.
pub const ASSUME_DARWIN_VAR: &str = "APPSTORE_DEPLOY_ASSUME_DARWIN";

pub fn current_os() -> &'static str {
    if std::env::var(ASSUME_DARWIN_VAR).ok().as_deref() == Some("1") {
        "macos"
    } else {
        std::env::consts::OS
    }
}

/// The gem/fastlane toolchain needs a Darwin host; checked before any
/// other validation.
pub fn ensure_darwin(os: &str) -> Result<(), TaskError> {
    if os == "macos" {
        Ok(())
    } else {
        Err(TaskError::DarwinOnly)
    }
}
