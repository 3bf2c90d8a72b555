//! fastlane version management via gem.
//!
//! Three plans: do nothing, track latest, or pin a specific version. The
//! pinned path probes the installed state first and skips the
//! uninstall/install pair when the requested version is already present,
//! so exactly one fastlane version exists afterwards either way. The
//! latest path always runs its install/update pair (historical behavior,
//! kept deliberately asymmetric).

use std::path::Path;

use crate::color::{color_enabled_stderr, log_info_stderr, log_warn_stderr};
use crate::errors::TaskError;
use crate::inputs::{nonempty, require};
use crate::plan::CommandPlan;
use crate::runner::{run_checked, run_raw, ToolRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FastlaneVersionPlan {
    DoNothing,
    InstallLatest,
    InstallSpecific(String),
}

impl FastlaneVersionPlan {
    /// `fastlaneToolsVersion` defaults to tracking latest; the pinned mode
    /// requires its companion version input up front, before any
    /// subprocess runs.
    pub fn from_inputs(
        install_fastlane: bool,
        tools_version: &Option<String>,
        specific_version: &Option<String>,
    ) -> Result<Self, TaskError> {
        if !install_fastlane {
            return Ok(FastlaneVersionPlan::DoNothing);
        }
        match nonempty(tools_version).unwrap_or("LatestVersion") {
            "LatestVersion" => Ok(FastlaneVersionPlan::InstallLatest),
            "SpecificVersion" => Ok(FastlaneVersionPlan::InstallSpecific(
                require(specific_version, "fastlaneToolsSpecificVersion")?.to_string(),
            )),
            _ => Err(TaskError::InputRequired("fastlaneToolsVersion")),
        }
    }
}

fn gem_plan(gem: &Path, args: &[&str]) -> CommandPlan {
    let mut plan = CommandPlan::new(gem.to_string_lossy().into_owned());
    for arg in args {
        plan.push(*arg);
    }
    plan
}

/// `gem install fastlane` then `gem update fastlane`; the update is
/// directed at the custom gem cache when one is configured.
pub fn install_latest_plans(gem: &Path, gem_cache: Option<&str>) -> Vec<CommandPlan> {
    let install = gem_plan(gem, &["install", "fastlane"]);
    let mut update = gem_plan(gem, &["update", "fastlane"]);
    if let Some(cache) = gem_cache {
        update.push_pair("-i", cache);
    }
    vec![install, update]
}

/// Probe whether the requested version is already installed; prints
/// `true`/`false`. A non-zero exit is the `false` case, not a failure.
pub fn version_probe_plan(gem: &Path, version: &str) -> CommandPlan {
    let mut plan = gem_plan(gem, &["list", "fastlane", "-i"]);
    plan.push_pair("-v", version);
    plan
}

/// Uninstall every installed fastlane, then install the requested version.
pub fn reinstall_plans(gem: &Path, version: &str) -> Vec<CommandPlan> {
    let uninstall = gem_plan(gem, &["uninstall", "fastlane", "-a", "-I"]);
    let mut install = gem_plan(gem, &["install", "fastlane"]);
    install.push_pair("-v", version);
    vec![uninstall, install]
}

/// Execute the version plan. Each gem invocation is synchronous and a
/// non-zero exit (outside the probe) is terminal for the task.
pub fn provision(
    plan: &FastlaneVersionPlan,
    gem_cache: Option<&str>,
    runner: &mut dyn ToolRunner,
) -> Result<(), TaskError> {
    if *plan == FastlaneVersionPlan::DoNothing {
        return Ok(());
    }
    runner
        .which("ruby")
        .map_err(|_| TaskError::tool_not_found("ruby"))?;
    let gem = runner
        .which("gem")
        .map_err(|_| TaskError::tool_not_found("gem"))?;

    match plan {
        FastlaneVersionPlan::DoNothing => {}
        FastlaneVersionPlan::InstallLatest => {
            for step in install_latest_plans(&gem, gem_cache) {
                run_checked(runner, &step)?;
            }
        }
        FastlaneVersionPlan::InstallSpecific(version) => {
            let probe = version_probe_plan(&gem, version);
            let out = run_raw(runner, &probe)?;
            let use_err = color_enabled_stderr();
            if out.stdout.trim() == "true" {
                log_info_stderr(
                    use_err,
                    &format!("appstore-deploy: fastlane {version} already installed; skipping install."),
                );
                return Ok(());
            }
            log_warn_stderr(
                use_err,
                &format!("appstore-deploy: replacing installed fastlane versions with {version}."),
            );
            for step in reinstall_plans(&gem, version) {
                run_checked(runner, &step)?;
            }
        }
    }
    Ok(())
}
