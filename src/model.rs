// src/model.rs

use thiserror::Error;

/// One row of scan results: a driver package and its version pair.
#[derive(Debug, PartialEq, Clone)]
pub struct DriverEntry {
    pub package_name: String,
    pub current_version: String,
    pub available_version: String,
    pub is_recommended: bool,
}

/// Why a scan produced no usable result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("no driver detection tool is available on this system")]
    DetectionUnavailable,
    #[error("scan failed: {0}")]
    CommandFailed(String),
}

/// Outcome of one scan. A new scan produces a wholly new list.
#[derive(Debug, PartialEq, Clone)]
pub struct ScanResult {
    pub entries: Vec<DriverEntry>,
    pub error: Option<ScanError>,
}

impl ScanResult {
    pub fn ok(entries: Vec<DriverEntry>) -> Self {
        Self { entries, error: None }
    }

    pub fn failed(error: ScanError) -> Self {
        Self {
            entries: Vec::new(),
            error: Some(error),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of one install invocation, consumed immediately by the UI.
#[derive(Debug, PartialEq, Clone)]
pub struct UpdateOutcome {
    pub package_name: String,
    pub succeeded: bool,
    pub reboot_required: bool,
    pub error_message: Option<String>,
}

impl UpdateOutcome {
    pub fn ok(package_name: &str, reboot_required: bool) -> Self {
        Self {
            package_name: package_name.to_string(),
            succeeded: true,
            reboot_required,
            error_message: None,
        }
    }

    pub fn failed(package_name: &str, message: impl Into<String>) -> Self {
        Self {
            package_name: package_name.to_string(),
            succeeded: false,
            reboot_required: false,
            error_message: Some(message.into()),
        }
    }
}

/// What a finished background task hands back to the UI.
#[derive(Debug, PartialEq, Clone)]
pub enum TaskOutcome {
    Scan(ScanResult),
    Install(Vec<UpdateOutcome>),
}
