// src/installer.rs

use crate::apt;
use crate::model::UpdateOutcome;
use crate::policy::{self, PrivilegedStatus};
use crate::task_runner::{CancelToken, ProgressSink};

/// Packages whose installation warrants a reboot advisory. Kernel images,
/// modules and firmware take effect only after a reboot; userspace driver
/// stacks (nvidia-driver-*, mesa) do not belong here.
pub const REBOOT_PATTERNS: &[&str] = &[
    "linux-image",
    "linux-modules",
    "linux-headers",
    "linux-firmware",
    "intel-microcode",
    "amd64-microcode",
];

pub fn reboot_required_for(package: &str, patterns: &[&str]) -> bool {
    let lower = package.to_lowercase();
    patterns.iter().any(|p| lower.contains(p))
}

/// How one package install ended, as fed to `apply_batch`.
#[derive(Debug, Clone, PartialEq)]
pub enum InstallStep {
    Ok,
    AuthDenied,
    Failed(String),
}

/// Runs a batch through `run`, one package at a time, producing one
/// outcome per attempted package (testable; tests inject `run`).
///
/// A refused authentication fails the current and every pending package
/// without issuing further installs. An ordinary failure only affects its
/// own package. Cancellation is checked before each package.
pub fn apply_batch<F>(
    packages: &[String],
    patterns: &[&str],
    cancel: &CancelToken,
    mut run: F,
) -> Vec<UpdateOutcome>
where
    F: FnMut(&str) -> InstallStep,
{
    let mut outcomes = Vec::new();
    let mut auth_denied = false;

    for package in packages {
        if cancel.is_cancelled() {
            break;
        }
        if auth_denied {
            outcomes.push(UpdateOutcome::failed(
                package,
                "authentication was refused, package skipped",
            ));
            continue;
        }
        match run(package) {
            InstallStep::Ok => {
                outcomes.push(UpdateOutcome::ok(
                    package,
                    reboot_required_for(package, patterns),
                ));
            }
            InstallStep::AuthDenied => {
                auth_denied = true;
                outcomes.push(UpdateOutcome::failed(package, "authentication was refused"));
            }
            InstallStep::Failed(message) => {
                outcomes.push(UpdateOutcome::failed(package, message));
            }
        }
    }

    outcomes
}

/// Installs the given packages with `pkexec apt install`, one invocation
/// per package so failures stay independent.
pub fn install(
    packages: &[String],
    cancel: &CancelToken,
    progress: &ProgressSink,
) -> Vec<UpdateOutcome> {
    let total = packages.len();
    let mut done = 0usize;

    progress.status("Installing driver updates...");
    progress.fraction(0.0);

    let outcomes = apply_batch(packages, REBOOT_PATTERNS, cancel, |package| {
        progress.log(format!("Installing {}...", package));

        // Recommended drivers from a scan may not be installed yet; those
        // are installed fresh instead of upgrade-only.
        let only_upgrade = apt::is_installed(package);
        let step = match policy::install_package(package, only_upgrade) {
            Ok(PrivilegedStatus::Ok) => InstallStep::Ok,
            Ok(PrivilegedStatus::AuthDenied) => InstallStep::AuthDenied,
            Ok(PrivilegedStatus::Failed(code)) => {
                InstallStep::Failed(format!("`apt install` exited with code {}", code))
            }
            Err(err) => InstallStep::Failed(err.to_string()),
        };

        done += 1;
        progress.fraction(done as f64 / total.max(1) as f64);
        match &step {
            InstallStep::Ok => progress.log(format!("{} installed.", package)),
            InstallStep::AuthDenied => progress.log("Authentication was refused."),
            InstallStep::Failed(message) => {
                progress.log(format!("{} failed: {}", package, message))
            }
        }
        step
    });

    progress.status("Installation finished");
    progress.fraction(1.0);
    outcomes
}
