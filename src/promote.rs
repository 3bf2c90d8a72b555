//! The promote task: submit an already-uploaded TestFlight build for App
//! Store review via `deliver submit_build`. No artifact is involved; the
//! build is addressed by app identifier and, optionally, build number.

use crate::credentials;
use crate::errors::TaskError;
use crate::gems::{self, FastlaneVersionPlan};
use crate::inputs::{require, BuildSelector, PromoteInputs};
use crate::plan;
use crate::platform;
use crate::runner::{run_fastlane, ToolRunner};

pub fn run_promote(
    inputs: &PromoteInputs,
    os: &str,
    runner: &mut dyn ToolRunner,
) -> Result<(), TaskError> {
    platform::ensure_darwin(os)?;

    let creds = credentials::resolve(&inputs.auth)?;
    let app_identifier = require(&inputs.app_identifier, "appIdentifier")?.to_string();
    let build_number = match inputs.build_selector()? {
        BuildSelector::Latest => None,
        BuildSelector::Specify => Some(require(&inputs.build_number, "buildNumber")?.to_string()),
    };

    let version_plan = FastlaneVersionPlan::from_inputs(
        inputs.install_fastlane,
        &inputs.fastlane_tools_version,
        &inputs.fastlane_tools_specific_version,
    )?;
    gems::provision(&version_plan, inputs.gem_cache.as_deref(), runner)?;

    let fastlane =
        plan::deliver_submit_plan(&creds, &app_identifier, build_number.as_deref(), inputs);
    run_fastlane(runner, &fastlane)
}
