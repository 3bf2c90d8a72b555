//! IPA artifact resolution.

use crate::errors::TaskError;

/// Expand the ipaPath glob; exactly one file must match. Zero and multiple
/// matches are distinct terminal errors so the task never guesses which
/// binary to ship. Runs before any tool invocation.
pub fn resolve_ipa(pattern: &str) -> Result<String, TaskError> {
    let entries = glob::glob(pattern).map_err(|_| TaskError::NoIpaFilesFound)?;
    let mut matches: Vec<String> = Vec::new();
    for path in entries.flatten() {
        if path.is_file() {
            matches.push(path.to_string_lossy().into_owned());
        }
    }
    match matches.len() {
        0 => Err(TaskError::NoIpaFilesFound),
        1 => Ok(matches.remove(0)),
        _ => Err(TaskError::MultipleIpaFilesFound),
    }
}
