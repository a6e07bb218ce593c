// tests/installer_tests.rs
use driverhub::installer::{apply_batch, reboot_required_for, InstallStep, REBOOT_PATTERNS};
use driverhub::task_runner::CancelToken;

fn packages(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn batch_continues_after_a_single_failure() {
    let pkgs = packages(&["mesa-vulkan-drivers", "nvidia-driver-535", "linux-firmware"]);
    let cancel = CancelToken::new();

    let outcomes = apply_batch(&pkgs, REBOOT_PATTERNS, &cancel, |pkg| {
        if pkg == "nvidia-driver-535" {
            InstallStep::Failed("`apt install` exited with code 100".into())
        } else {
            InstallStep::Ok
        }
    });

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].succeeded);
    assert!(!outcomes[1].succeeded);
    assert!(outcomes[2].succeeded);
    assert_eq!(
        outcomes[1].error_message.as_deref(),
        Some("`apt install` exited with code 100")
    );
}

#[test]
fn auth_denial_fails_all_pending_packages() {
    let pkgs = packages(&["a-driver", "b-driver", "c-driver"]);
    let cancel = CancelToken::new();
    let mut invocations = 0;

    let outcomes = apply_batch(&pkgs, REBOOT_PATTERNS, &cancel, |_| {
        invocations += 1;
        InstallStep::AuthDenied
    });

    // Only the first install is attempted; the rest are reported failed
    // without another authentication prompt.
    assert_eq!(invocations, 1);
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| !o.succeeded));
}

#[test]
fn cancelled_batch_attempts_nothing_further() {
    let pkgs = packages(&["a-driver", "b-driver"]);
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut invocations = 0;

    let outcomes = apply_batch(&pkgs, REBOOT_PATTERNS, &cancel, |_| {
        invocations += 1;
        InstallStep::Ok
    });

    assert_eq!(invocations, 0);
    assert!(outcomes.is_empty());
}

#[test]
fn kernel_packages_require_reboot() {
    assert!(reboot_required_for("linux-image-6.1.0-18-amd64", REBOOT_PATTERNS));
    assert!(reboot_required_for("linux-modules-extra-6.1.0-18", REBOOT_PATTERNS));
    assert!(reboot_required_for("linux-firmware", REBOOT_PATTERNS));
    assert!(reboot_required_for("intel-microcode", REBOOT_PATTERNS));
    assert!(!reboot_required_for("nvidia-driver-535", REBOOT_PATTERNS));
    assert!(!reboot_required_for("mesa-vulkan-drivers", REBOOT_PATTERNS));
}

#[test]
fn reboot_patterns_are_configurable() {
    let custom = &["nvidia"];
    assert!(reboot_required_for("nvidia-driver-535", custom));
    assert!(!reboot_required_for("linux-image-6.1.0-18-amd64", custom));
}

#[test]
fn kernel_outcome_carries_reboot_flag() {
    let pkgs = packages(&["linux-image-6.1.0-18-amd64", "nvidia-driver-535"]);
    let cancel = CancelToken::new();

    let outcomes = apply_batch(&pkgs, REBOOT_PATTERNS, &cancel, |_| InstallStep::Ok);

    assert!(outcomes[0].reboot_required);
    assert!(!outcomes[1].reboot_required);
}

#[test]
fn update_all_for_single_driver_entry() {
    // Scan found nvidia-driver-535 535.1 -> 535.2; Update All installs it.
    let pkgs = packages(&["nvidia-driver-535"]);
    let cancel = CancelToken::new();

    let outcomes = apply_batch(&pkgs, REBOOT_PATTERNS, &cancel, |_| InstallStep::Ok);

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].succeeded);
    assert!(!outcomes[0].reboot_required);
    assert_eq!(outcomes[0].error_message, None);
}
