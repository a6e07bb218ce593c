// src/apt.rs

use crate::model::DriverEntry;
use anyhow::{Context, Result};
use std::process::Command;

/// Name fragments that mark a package as driver-related. The fallback
/// strategy has no hardware knowledge, so it filters the upgradable list
/// by name.
pub const DRIVER_NAME_PATTERNS: &[&str] = &[
    "driver",
    "firmware",
    "linux-image",
    "linux-modules",
    "linux-headers",
    "nvidia",
    "amdgpu",
    "radeon",
    "mesa",
    "vulkan",
    "broadcom",
    "realtek",
    "microcode",
    "dkms",
];

pub fn is_driver_package(name: &str) -> bool {
    let lower = name.to_lowercase();
    DRIVER_NAME_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Parses `apt list --upgradable` output into driver entries (testable).
/// Non-driver packages are filtered out; a line without an
/// `[upgradable from: ...]` part keeps an empty current version instead of
/// failing the scan. Malformed lines are skipped.
pub fn parse_apt_list_output(s: &str) -> Vec<DriverEntry> {
    let mut entries = Vec::new();

    for (i, line) in s.lines().enumerate() {
        // First line "Listing..." and blank lines
        if i == 0 && line.starts_with("Listing") {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }

        // Sample line:
        // nvidia-driver-535/jammy-updates 535.2 amd64 [upgradable from: 535.1]
        let name = parts[0].split('/').next().unwrap_or("").to_string();
        if name.is_empty() || !is_driver_package(&name) {
            continue;
        }

        let available_version = parts[1].to_string();

        let current_version = if let Some(idx) = parts.iter().position(|p| *p == "from:") {
            parts
                .get(idx + 1)
                .map(|p| p.trim_end_matches(']').to_string())
                .unwrap_or_default()
        } else {
            String::new()
        };

        entries.push(DriverEntry {
            package_name: name,
            current_version,
            available_version,
            is_recommended: false,
        });
    }

    entries
}

/// Parses `apt-cache policy` output into (installed, candidate) versions
/// (testable). `(none)` counts as not installed.
pub fn parse_policy_output(s: &str) -> (Option<String>, Option<String>) {
    let mut installed = None;
    let mut candidate = None;

    for line in s.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Installed:") {
            let value = rest.trim();
            if !value.is_empty() && value != "(none)" {
                installed = Some(value.to_string());
            }
        } else if let Some(rest) = line.strip_prefix("Candidate:") {
            let value = rest.trim();
            if !value.is_empty() && value != "(none)" {
                candidate = Some(value.to_string());
            }
        }
    }

    (installed, candidate)
}

/// Installed and candidate versions for one package.
pub fn policy(package: &str) -> Result<(Option<String>, Option<String>)> {
    let output = Command::new("apt-cache")
        .args(&["policy", package])
        .env("LANG", "C")
        .output()
        .context("`apt-cache policy` failed to run")?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_policy_output(&stdout))
}

pub fn is_installed(package: &str) -> bool {
    policy(package)
        .map(|(installed, _)| installed.is_some())
        .unwrap_or(false)
}

/// Upgradable driver packages on the system, per the name filter.
pub fn upgradable_driver_packages() -> Result<Vec<DriverEntry>> {
    let output = Command::new("apt")
        .args(&["list", "--upgradable"])
        .env("LANG", "C")
        .output()
        .context("`apt list --upgradable` failed to run")?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_apt_list_output(&stdout))
}
