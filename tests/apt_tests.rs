// tests/apt_tests.rs
use driverhub::apt::{is_driver_package, parse_apt_list_output, parse_policy_output};
use driverhub::model::DriverEntry;

const SAMPLE: &str = r#"Listing...
nvidia-driver-535/jammy-updates 535.183.01-0ubuntu1 amd64 [upgradable from: 535.161.07-0ubuntu1]
bash/stable 5.1-2+deb11u1 amd64 [upgradable from: 5.1-2]
linux-firmware/jammy-updates 20220329.git681281e4-0ubuntu3.36 all [upgradable from: 20220329.git681281e4-0ubuntu3.29]
"#;

#[test]
fn parse_empty() {
    let v = parse_apt_list_output("");
    assert!(v.is_empty());
}

#[test]
fn parse_keeps_only_driver_packages() {
    let v = parse_apt_list_output(SAMPLE);
    assert_eq!(v.len(), 2);

    assert_eq!(
        v[0],
        DriverEntry {
            package_name: "nvidia-driver-535".into(),
            current_version: "535.161.07-0ubuntu1".into(),
            available_version: "535.183.01-0ubuntu1".into(),
            is_recommended: false,
        }
    );
    assert_eq!(v[1].package_name, "linux-firmware");
}

#[test]
fn parse_missing_current_version_yields_empty_string() {
    let input = "Listing...\nmesa-vulkan-drivers/jammy 23.2.1-1ubuntu3 amd64\n";
    let v = parse_apt_list_output(input);
    assert_eq!(v.len(), 1);
    assert_eq!(v[0].package_name, "mesa-vulkan-drivers");
    assert_eq!(v[0].current_version, "");
    assert_eq!(v[0].available_version, "23.2.1-1ubuntu3");
}

#[test]
fn parse_malformed_lines_are_skipped() {
    let input = "Listing...\n???\nnvidia\n\n";
    let v = parse_apt_list_output(input);
    assert!(v.is_empty());
}

const POLICY_SAMPLE: &str = r#"nvidia-driver-535:
  Installed: 535.161.07-0ubuntu1
  Candidate: 535.183.01-0ubuntu1
  Version table:
     535.183.01-0ubuntu1 500
"#;

const POLICY_NOT_INSTALLED: &str = r#"nvidia-driver-535:
  Installed: (none)
  Candidate: 535.183.01-0ubuntu1
  Version table:
"#;

#[test]
fn parse_policy_versions() {
    let (installed, candidate) = parse_policy_output(POLICY_SAMPLE);
    assert_eq!(installed.as_deref(), Some("535.161.07-0ubuntu1"));
    assert_eq!(candidate.as_deref(), Some("535.183.01-0ubuntu1"));
}

#[test]
fn parse_policy_none_counts_as_not_installed() {
    let (installed, candidate) = parse_policy_output(POLICY_NOT_INSTALLED);
    assert_eq!(installed, None);
    assert_eq!(candidate.as_deref(), Some("535.183.01-0ubuntu1"));
}

#[test]
fn parse_policy_empty() {
    assert_eq!(parse_policy_output(""), (None, None));
}

#[test]
fn driver_package_filter() {
    assert!(is_driver_package("nvidia-driver-535"));
    assert!(is_driver_package("linux-image-6.1.0-18-amd64"));
    assert!(is_driver_package("firmware-realtek"));
    assert!(is_driver_package("intel-microcode"));
    assert!(!is_driver_package("bash"));
    assert!(!is_driver_package("openssl"));
}
