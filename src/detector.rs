// src/detector.rs

use crate::apt;
use crate::model::{DriverEntry, ScanError, ScanResult};
use crate::policy::{self, PrivilegedStatus};
use crate::task_runner::{CancelToken, ProgressSink};
use std::process::Command;

/// Detection strategy, picked by a runtime availability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectStrategy {
    /// `ubuntu-drivers devices` plus per-package version comparison.
    UbuntuDrivers,
    /// Filtered `apt list --upgradable`.
    AptFallback,
}

/// One driver candidate reported by `ubuntu-drivers devices`.
#[derive(Debug, PartialEq, Clone)]
pub struct DriverCandidate {
    pub package_name: String,
    pub is_recommended: bool,
}

pub fn command_available(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

pub fn pick_strategy() -> Option<DetectStrategy> {
    if command_available("ubuntu-drivers") {
        Some(DetectStrategy::UbuntuDrivers)
    } else if command_available("apt") {
        Some(DetectStrategy::AptFallback)
    } else {
        None
    }
}

/// Parses `ubuntu-drivers devices` output into driver candidates
/// (testable). Lines look like:
///
///   driver   : nvidia-driver-535 - distro non-free recommended
///   driver   : xserver-xorg-video-nouveau - distro free builtin
///
/// Builtin candidates are not installable packages and are skipped.
pub fn parse_devices_output(s: &str) -> Vec<DriverCandidate> {
    let mut candidates: Vec<DriverCandidate> = Vec::new();

    for line in s.lines() {
        let line = line.trim();
        if !line.starts_with("driver") {
            continue;
        }
        let Some((_, rest)) = line.split_once(':') else {
            continue;
        };
        let Some(package) = rest.split_whitespace().next() else {
            continue;
        };
        if line.contains("builtin") {
            continue;
        }
        if candidates.iter().any(|c| c.package_name == package) {
            continue;
        }
        candidates.push(DriverCandidate {
            package_name: package.to_string(),
            is_recommended: line.contains("recommended"),
        });
    }

    candidates
}

/// Runs one full detection pass. Never panics and never returns `Err`;
/// failures are carried inside the `ScanResult`. A cancelled scan returns
/// early; the runner suppresses delivery of its result anyway.
pub fn scan(cancel: &CancelToken, progress: &ProgressSink) -> ScanResult {
    match pick_strategy() {
        None => {
            progress.log("Neither ubuntu-drivers nor apt was found on this system.");
            ScanResult::failed(ScanError::DetectionUnavailable)
        }
        Some(DetectStrategy::UbuntuDrivers) => {
            progress.log("Using ubuntu-drivers for driver detection.");
            scan_ubuntu_drivers(cancel, progress)
        }
        Some(DetectStrategy::AptFallback) => {
            progress.log("ubuntu-drivers not found, using apt as fallback.");
            scan_apt_fallback(cancel, progress)
        }
    }
}

fn scan_ubuntu_drivers(cancel: &CancelToken, progress: &ProgressSink) -> ScanResult {
    progress.status("Analyzing devices and driver candidates...");
    progress.fraction(0.1);

    let output = match Command::new("ubuntu-drivers")
        .arg("devices")
        .env("LANG", "C")
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            // Present on PATH a moment ago but not runnable; one shot at
            // the fallback instead of failing the scan.
            progress.log(format!(
                "ubuntu-drivers could not be started ({}), continuing with the apt fallback.",
                err
            ));
            return scan_apt_fallback(cancel, progress);
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let candidates = parse_devices_output(&stdout);
    if cancel.is_cancelled() {
        return ScanResult::ok(Vec::new());
    }

    progress.status("Checking installed and candidate package versions...");
    progress.fraction(0.4);

    let mut entries = Vec::new();
    for candidate in &candidates {
        if cancel.is_cancelled() {
            return ScanResult::ok(Vec::new());
        }
        progress.log(format!("Checking package: {}", candidate.package_name));

        let (installed, available) = match apt::policy(&candidate.package_name) {
            Ok(versions) => versions,
            Err(err) => {
                progress.log(format!(
                    "Version lookup failed for {}: {}",
                    candidate.package_name, err
                ));
                continue;
            }
        };

        if let (Some(current), Some(available)) = (installed, available) {
            if current != available {
                progress.log(format!(
                    "-> Update found: {} {} -> {}",
                    candidate.package_name, current, available
                ));
                entries.push(DriverEntry {
                    package_name: candidate.package_name.clone(),
                    current_version: current,
                    available_version: available,
                    is_recommended: candidate.is_recommended,
                });
            }
        }
    }

    // Nothing to upgrade: offer recommended drivers that are missing
    // entirely, with an empty current version.
    if entries.is_empty() {
        progress.status("Looking for recommended drivers to install...");
        progress.fraction(0.7);

        for candidate in candidates.iter().filter(|c| c.is_recommended) {
            if cancel.is_cancelled() {
                return ScanResult::ok(Vec::new());
            }
            let (installed, available) = match apt::policy(&candidate.package_name) {
                Ok(versions) => versions,
                Err(_) => continue,
            };
            if installed.is_none() {
                if let Some(available) = available {
                    progress.log(format!(
                        "-> Recommended for installation: {} (candidate {})",
                        candidate.package_name, available
                    ));
                    entries.push(DriverEntry {
                        package_name: candidate.package_name.clone(),
                        current_version: String::new(),
                        available_version: available,
                        is_recommended: true,
                    });
                }
            }
        }
    }

    progress.status("Scan complete");
    progress.fraction(1.0);
    ScanResult::ok(entries)
}

fn scan_apt_fallback(cancel: &CancelToken, progress: &ProgressSink) -> ScanResult {
    progress.status("Refreshing package lists...");
    progress.fraction(0.1);
    progress.log("Running `pkexec apt update` to refresh the package lists...");

    match policy::refresh_package_lists() {
        Ok(PrivilegedStatus::Ok) => progress.log("Package lists refreshed."),
        Ok(PrivilegedStatus::AuthDenied) => {
            return ScanResult::failed(ScanError::CommandFailed(
                "authentication was refused while refreshing the package lists".to_string(),
            ));
        }
        Ok(PrivilegedStatus::Failed(code)) => {
            return ScanResult::failed(ScanError::CommandFailed(format!(
                "`apt update` exited with code {}",
                code
            )));
        }
        Err(err) => {
            return ScanResult::failed(ScanError::CommandFailed(err.to_string()));
        }
    }

    if cancel.is_cancelled() {
        return ScanResult::ok(Vec::new());
    }

    progress.status("Checking upgradable packages...");
    progress.fraction(0.5);

    match apt::upgradable_driver_packages() {
        Ok(entries) => {
            for entry in &entries {
                progress.log(format!("-> Possible driver update: {}", entry.package_name));
            }
            progress.status("Scan complete");
            progress.fraction(1.0);
            ScanResult::ok(entries)
        }
        Err(err) => ScanResult::failed(ScanError::CommandFailed(err.to_string())),
    }
}
