//! Task input model.
//!
//! Inputs arrive as optional strings/booleans from the host channel and are
//! immutable once read. Required-field failures use the field's wire name
//! (`Input required: <name>`) and fire in a fixed order, before any
//! subprocess runs.

use crate::errors::TaskError;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AuthType {
    UserAndPass,
    ServiceEndpoint,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ReleaseTrack {
    TestFlight,
    Production,
}

/// Which uploaded build the promote task targets.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BuildSelector {
    Latest,
    Specify,
}

/// Authentication inputs shared by both tasks.
#[derive(Debug, Clone, Default)]
pub struct AuthInputs {
    pub auth_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub app_specific_password: Option<String>,
    pub fastlane_session: Option<String>,
    pub service_endpoint: Option<String>,
}

impl AuthInputs {
    pub fn auth_type(&self) -> Result<AuthType, TaskError> {
        match require(&self.auth_type, "authType")? {
            "UserAndPass" => Ok(AuthType::UserAndPass),
            "ServiceEndpoint" => Ok(AuthType::ServiceEndpoint),
            _ => Err(TaskError::InputRequired("authType")),
        }
    }
}

/// Inputs of the release task (TestFlight and Production tracks).
#[derive(Debug, Clone, Default)]
pub struct ReleaseInputs {
    pub auth: AuthInputs,
    pub release_track: Option<String>,
    /// Optional for TestFlight, mandatory for Production.
    pub app_identifier: Option<String>,
    /// Glob pattern; must resolve to exactly one file.
    pub ipa_path: Option<String>,
    pub team_id: Option<String>,
    pub team_name: Option<String>,
    pub skip_submission: bool,
    pub skip_waiting_for_processing: bool,
    pub distribute_to_external_testers: bool,
    pub external_tester_groups: Option<String>,
    pub release_notes: Option<String>,
    pub skip_binary_upload: bool,
    pub upload_metadata: bool,
    pub metadata_path: Option<String>,
    pub upload_screenshots: bool,
    pub screenshots_path: Option<String>,
    pub submit_for_review: bool,
    pub auto_release: bool,
    pub install_fastlane: bool,
    pub fastlane_tools_version: Option<String>,
    pub fastlane_tools_specific_version: Option<String>,
    /// Raw extra arguments, appended verbatim (whitespace-split) to the
    /// fastlane invocation.
    pub fastlane_arguments: Option<String>,
    /// From the GEM_CACHE environment variable.
    pub gem_cache: Option<String>,
}

impl ReleaseInputs {
    pub fn release_track(&self) -> Result<ReleaseTrack, TaskError> {
        match require(&self.release_track, "releaseTrack")? {
            "TestFlight" => Ok(ReleaseTrack::TestFlight),
            "Production" => Ok(ReleaseTrack::Production),
            _ => Err(TaskError::InputRequired("releaseTrack")),
        }
    }
}

/// Inputs of the promote task.
#[derive(Debug, Clone, Default)]
pub struct PromoteInputs {
    pub auth: AuthInputs,
    pub app_identifier: Option<String>,
    pub choose_build: Option<String>,
    pub build_number: Option<String>,
    pub auto_release: bool,
    pub team_id: Option<String>,
    pub team_name: Option<String>,
    pub install_fastlane: bool,
    pub fastlane_tools_version: Option<String>,
    pub fastlane_tools_specific_version: Option<String>,
    pub gem_cache: Option<String>,
}

impl PromoteInputs {
    /// `chooseBuild` defaults to the latest uploaded build; the comparison
    /// is case-insensitive, matching the wire values `latest`/`specify`.
    pub fn build_selector(&self) -> Result<BuildSelector, TaskError> {
        match nonempty(&self.choose_build) {
            None => Ok(BuildSelector::Latest),
            Some(v) if v.eq_ignore_ascii_case("latest") => Ok(BuildSelector::Latest),
            Some(v) if v.eq_ignore_ascii_case("specify") => Ok(BuildSelector::Specify),
            Some(_) => Err(TaskError::InputRequired("chooseBuild")),
        }
    }
}

/// A required input: present and non-blank, or `Input required: <name>`.
pub fn require<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, TaskError> {
    nonempty(value).ok_or(TaskError::InputRequired(name))
}

/// Trimmed value of an optional input, `None` when absent or blank.
pub fn nonempty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
