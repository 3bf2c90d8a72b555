//! Environment diagnostics: toolchain discovery and version report.

use std::process::Command;

use crate::color::{color_enabled_stderr, paint};
use crate::platform;

pub fn run_doctor() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("appstore-deploy doctor");
    eprintln!();
    eprintln!("  version: v{}", version);
    eprintln!(
        "  built:   {} ({}, {})",
        env!("APPSTORE_DEPLOY_BUILD_DATE"),
        env!("APPSTORE_DEPLOY_BUILD_TARGET"),
        env!("APPSTORE_DEPLOY_BUILD_PROFILE")
    );
    eprintln!("  rustc:   {}", env!("APPSTORE_DEPLOY_BUILD_RUSTC"));
    eprintln!(
        "  host:    {} / {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    eprintln!();

    let use_err = color_enabled_stderr();
    let darwin = platform::ensure_darwin(platform::current_os()).is_ok();
    let darwin_val = if darwin {
        paint(use_err, "\x1b[34;1m", "yes")
    } else {
        paint(use_err, "\x1b[33;1m", "no")
    };
    eprintln!("  darwin host: {}", darwin_val);

    match home::home_dir() {
        Some(dir) => eprintln!("  HOME: {}", dir.display()),
        None => eprintln!("  HOME: (unknown)"),
    }
    let gem_cache =
        std::env::var("GEM_CACHE").unwrap_or_else(|_| "(unset)".to_string());
    eprintln!("  GEM_CACHE: {}", gem_cache);
    eprintln!();

    for tool in ["ruby", "gem", "fastlane"] {
        match which::which(tool) {
            Ok(path) => {
                eprintln!("  {}: {}", tool, path.display());
                if let Some(version) = probe_version(&path) {
                    eprintln!("  {} --version: {}", tool, version);
                }
            }
            Err(e) => eprintln!("  {}: not found ({e})", tool),
        }
    }

    eprintln!();
    eprintln!("doctor: completed diagnostics.");
}

/// Best-effort `--version`; first non-empty output line.
fn probe_version(path: &std::path::Path) -> Option<String> {
    let out = Command::new(path).arg("--version").output().ok()?;
    if !out.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&out.stdout);
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}
