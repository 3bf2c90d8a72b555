//! The release task: upload an .ipa to TestFlight or the App Store.
//!
//! Strict sequential pipeline; validation failures fire before any
//! subprocess runs, with one historical exception: the Production track's
//! `appIdentifier` is checked at synthesis time, after provisioning.

use crate::artifact;
use crate::credentials;
use crate::errors::TaskError;
use crate::gems::{self, FastlaneVersionPlan};
use crate::inputs::{nonempty, require, ReleaseInputs, ReleaseTrack};
use crate::plan;
use crate::platform;
use crate::runner::{run_fastlane, ToolRunner};

pub fn run_release(
    inputs: &ReleaseInputs,
    os: &str,
    runner: &mut dyn ToolRunner,
) -> Result<(), TaskError> {
    platform::ensure_darwin(os)?;

    let creds = credentials::resolve(&inputs.auth)?;
    let track = inputs.release_track()?;

    let pattern = require(&inputs.ipa_path, "ipaPath")?;
    let ipa = artifact::resolve_ipa(pattern)?;

    // Policy precondition: external-tester distribution needs release
    // notes, and must fail before any tool runs.
    if track == ReleaseTrack::TestFlight
        && inputs.distribute_to_external_testers
        && nonempty(&inputs.release_notes).is_none()
    {
        return Err(TaskError::ReleaseNotesRequiredForExternalTesting);
    }

    let version_plan = FastlaneVersionPlan::from_inputs(
        inputs.install_fastlane,
        &inputs.fastlane_tools_version,
        &inputs.fastlane_tools_specific_version,
    )?;
    gems::provision(&version_plan, inputs.gem_cache.as_deref(), runner)?;

    let fastlane = match track {
        ReleaseTrack::TestFlight => plan::pilot_upload_plan(&creds, &ipa, inputs),
        ReleaseTrack::Production => plan::deliver_upload_plan(&creds, &ipa, inputs)?,
    };
    run_fastlane(runner, &fastlane)
}
