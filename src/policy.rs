// src/policy.rs

use anyhow::{bail, Context, Result};
use std::process::Command;

// pkexec reserves these exit codes for the authentication dialog being
// dismissed and for the user not being authorized.
const PKEXEC_DISMISSED: i32 = 126;
const PKEXEC_NOT_AUTHORIZED: i32 = 127;

/// How a privileged invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivilegedStatus {
    Ok,
    AuthDenied,
    Failed(i32),
}

pub fn classify_exit_code(code: Option<i32>) -> PrivilegedStatus {
    match code {
        Some(0) => PrivilegedStatus::Ok,
        Some(PKEXEC_DISMISSED) | Some(PKEXEC_NOT_AUTHORIZED) => PrivilegedStatus::AuthDenied,
        Some(code) => PrivilegedStatus::Failed(code),
        // killed by signal
        None => PrivilegedStatus::Failed(-1),
    }
}

/// Testable argument builder for one package install. `--only-upgrade`
/// keeps apt from pulling in packages the user never had; it is dropped
/// for fresh installs of recommended drivers.
pub fn build_install_args(package: &str, only_upgrade: bool) -> Vec<String> {
    let mut args = vec!["apt".to_string(), "install".to_string()];
    if only_upgrade {
        args.push("--only-upgrade".to_string());
    }
    args.push("-y".to_string());
    args.push(package.to_string());
    args
}

fn run_privileged(args: &[String]) -> Result<PrivilegedStatus> {
    if args.is_empty() {
        bail!("no command given");
    }
    let status = Command::new("pkexec")
        .args(args)
        .env("LANG", "C")
        .status()
        .context("`pkexec` failed to start")?;
    Ok(classify_exit_code(status.code()))
}

/// Refreshes the package indexes with `pkexec apt update`.
pub fn refresh_package_lists() -> Result<PrivilegedStatus> {
    run_privileged(&["apt".to_string(), "update".to_string()])
}

/// Installs or upgrades a single package with `pkexec apt install`.
pub fn install_package(package: &str, only_upgrade: bool) -> Result<PrivilegedStatus> {
    run_privileged(&build_install_args(package, only_upgrade))
}
