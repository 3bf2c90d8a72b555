//! CLI surface. Task inputs that must surface as `Input required: <name>`
//! are optional at the clap layer and validated by the input resolver,
//! never via clap's own `required` machinery.

use clap::{Args, Parser, Subcommand};

use crate::color::ColorMode;
use crate::inputs::{AuthInputs, PromoteInputs, ReleaseInputs};

#[derive(Parser, Debug)]
#[command(
    name = "appstore-deploy",
    version,
    about = "Upload and promote iOS builds through fastlane (TestFlight and the App Store)."
)]
pub struct Cli {
    /// Print detailed execution info
    #[arg(long)]
    pub verbose: bool,

    /// Print the commands that would run, but do not execute anything
    #[arg(long)]
    pub dry_run: bool,

    /// Colorize output: auto|always|never
    #[arg(long = "color", value_enum)]
    pub color: Option<ColorMode>,

    #[command(subcommand)]
    pub command: Task,
}

#[derive(Subcommand, Debug)]
pub enum Task {
    /// Upload an .ipa to TestFlight or the App Store
    Release(ReleaseArgs),
    /// Submit an uploaded TestFlight build for App Store review
    Promote(PromoteArgs),
    /// Run diagnostics to check the Ruby/gem/fastlane environment
    Doctor,
}

#[derive(Args, Debug, Clone)]
pub struct AuthArgs {
    /// Authentication mode: UserAndPass or ServiceEndpoint
    #[arg(long)]
    pub auth_type: Option<String>,

    /// Apple ID username (UserAndPass mode)
    #[arg(long)]
    pub username: Option<String>,

    /// Apple ID password (UserAndPass mode)
    #[arg(long)]
    pub password: Option<String>,

    /// App-specific password for two-factor accounts
    #[arg(long)]
    pub app_specific_password: Option<String>,

    /// Session token paired with the app-specific password
    #[arg(long)]
    pub fastlane_session: Option<String>,

    /// Service endpoint name; its auth blob is read from ENDPOINT_AUTH_<name>
    #[arg(long)]
    pub service_endpoint: Option<String>,
}

impl AuthArgs {
    fn into_inputs(self) -> AuthInputs {
        AuthInputs {
            auth_type: self.auth_type,
            username: self.username,
            password: self.password,
            app_specific_password: self.app_specific_password,
            fastlane_session: self.fastlane_session,
            service_endpoint: self.service_endpoint,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FastlaneToolsArgs {
    /// Install or update fastlane before running it
    #[arg(long)]
    pub install_fastlane: bool,

    /// Version management mode: LatestVersion or SpecificVersion
    #[arg(long)]
    pub fastlane_tools_version: Option<String>,

    /// Exact fastlane version to pin (SpecificVersion mode)
    #[arg(long)]
    pub fastlane_tools_specific_version: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ReleaseArgs {
    #[command(flatten)]
    pub auth: AuthArgs,

    /// Target track: TestFlight or Production
    #[arg(long)]
    pub release_track: Option<String>,

    /// App bundle identifier (mandatory for Production)
    #[arg(long)]
    pub app_identifier: Option<String>,

    /// Glob resolving to exactly one .ipa file
    #[arg(long)]
    pub ipa_path: Option<String>,

    /// Apple Developer team id
    #[arg(long)]
    pub team_id: Option<String>,

    /// Apple Developer team name
    #[arg(long)]
    pub team_name: Option<String>,

    /// TestFlight: upload without submitting to testers
    #[arg(long)]
    pub skip_submission: bool,

    /// TestFlight: do not wait for build processing
    #[arg(long)]
    pub skip_waiting_for_processing: bool,

    /// TestFlight: distribute the build to external testers
    #[arg(long)]
    pub distribute_to_external_testers: bool,

    /// Comma-separated external tester groups
    #[arg(long)]
    pub external_tester_groups: Option<String>,

    /// Release notes (required for external-tester distribution)
    #[arg(long)]
    pub release_notes: Option<String>,

    /// Production: skip uploading the binary itself
    #[arg(long)]
    pub skip_binary_upload: bool,

    /// Production: upload metadata from --metadata-path
    #[arg(long)]
    pub upload_metadata: bool,

    /// Path to the deliver metadata directory
    #[arg(long)]
    pub metadata_path: Option<String>,

    /// Production: upload screenshots from --screenshots-path
    #[arg(long)]
    pub upload_screenshots: bool,

    /// Path to the deliver screenshots directory
    #[arg(long)]
    pub screenshots_path: Option<String>,

    /// Production: submit the build for App Store review
    #[arg(long)]
    pub submit_for_review: bool,

    /// Production: release automatically once approved
    #[arg(long)]
    pub auto_release: bool,

    #[command(flatten)]
    pub fastlane_tools: FastlaneToolsArgs,

    /// Extra arguments appended verbatim to the fastlane invocation
    #[arg(long)]
    pub fastlane_arguments: Option<String>,
}

impl ReleaseArgs {
    pub fn into_inputs(self) -> ReleaseInputs {
        ReleaseInputs {
            auth: self.auth.into_inputs(),
            release_track: self.release_track,
            app_identifier: self.app_identifier,
            ipa_path: self.ipa_path,
            team_id: self.team_id,
            team_name: self.team_name,
            skip_submission: self.skip_submission,
            skip_waiting_for_processing: self.skip_waiting_for_processing,
            distribute_to_external_testers: self.distribute_to_external_testers,
            external_tester_groups: self.external_tester_groups,
            release_notes: self.release_notes,
            skip_binary_upload: self.skip_binary_upload,
            upload_metadata: self.upload_metadata,
            metadata_path: self.metadata_path,
            upload_screenshots: self.upload_screenshots,
            screenshots_path: self.screenshots_path,
            submit_for_review: self.submit_for_review,
            auto_release: self.auto_release,
            install_fastlane: self.fastlane_tools.install_fastlane,
            fastlane_tools_version: self.fastlane_tools.fastlane_tools_version,
            fastlane_tools_specific_version: self
                .fastlane_tools
                .fastlane_tools_specific_version,
            fastlane_arguments: self.fastlane_arguments,
            gem_cache: std::env::var("GEM_CACHE").ok(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PromoteArgs {
    #[command(flatten)]
    pub auth: AuthArgs,

    /// App bundle identifier of the build to promote
    #[arg(long)]
    pub app_identifier: Option<String>,

    /// Which uploaded build to promote: latest or specify
    #[arg(long)]
    pub choose_build: Option<String>,

    /// Build number to promote (with --choose-build specify)
    #[arg(long)]
    pub build_number: Option<String>,

    /// Release automatically once approved
    #[arg(long)]
    pub auto_release: bool,

    /// Apple Developer team id
    #[arg(long)]
    pub team_id: Option<String>,

    /// Apple Developer team name
    #[arg(long)]
    pub team_name: Option<String>,

    #[command(flatten)]
    pub fastlane_tools: FastlaneToolsArgs,
}

impl PromoteArgs {
    pub fn into_inputs(self) -> PromoteInputs {
        PromoteInputs {
            auth: self.auth.into_inputs(),
            app_identifier: self.app_identifier,
            choose_build: self.choose_build,
            build_number: self.build_number,
            auto_release: self.auto_release,
            team_id: self.team_id,
            team_name: self.team_name,
            install_fastlane: self.fastlane_tools.install_fastlane,
            fastlane_tools_version: self.fastlane_tools.fastlane_tools_version,
            fastlane_tools_specific_version: self
                .fastlane_tools
                .fastlane_tools_specific_version,
            gem_cache: std::env::var("GEM_CACHE").ok(),
        }
    }
}
