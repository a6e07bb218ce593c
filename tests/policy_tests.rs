// tests/policy_tests.rs
use driverhub::policy::{build_install_args, classify_exit_code, PrivilegedStatus};

#[test]
fn build_args_for_upgrade() {
    let args = build_install_args("nvidia-driver-535", true);
    assert_eq!(
        args,
        vec!["apt", "install", "--only-upgrade", "-y", "nvidia-driver-535"]
    );
}

#[test]
fn build_args_for_fresh_install() {
    let args = build_install_args("nvidia-driver-535", false);
    assert_eq!(args, vec!["apt", "install", "-y", "nvidia-driver-535"]);
}

#[test]
fn classify_success() {
    assert_eq!(classify_exit_code(Some(0)), PrivilegedStatus::Ok);
}

#[test]
fn classify_auth_denied() {
    assert_eq!(classify_exit_code(Some(126)), PrivilegedStatus::AuthDenied);
    assert_eq!(classify_exit_code(Some(127)), PrivilegedStatus::AuthDenied);
}

#[test]
fn classify_failure() {
    assert_eq!(classify_exit_code(Some(100)), PrivilegedStatus::Failed(100));
    assert_eq!(classify_exit_code(None), PrivilegedStatus::Failed(-1));
}
