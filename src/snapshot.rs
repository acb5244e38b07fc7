// src/snapshot.rs - Printer state snapshots and the provider seam
//! These types mirror the host's current-data and temperature payloads. Every
//! section is optional; a missing section renders as a blank field.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Job/state/progress read of the printer at one instant.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PrinterStatusSnapshot {
    #[serde(default)]
    pub state: Option<PrinterState>,
    #[serde(default)]
    pub job: Option<JobInfo>,
    #[serde(default)]
    pub progress: Option<JobProgress>,
}

impl PrinterStatusSnapshot {
    /// No section present at all; renders the same as no snapshot.
    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.job.is_none() && self.progress.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PrinterState {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub flags: StateFlags,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct StateFlags {
    #[serde(default)]
    pub printing: bool,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub pausing: bool,
    #[serde(default)]
    pub cancelling: bool,
    #[serde(default)]
    pub finishing: bool,
}

impl StateFlags {
    /// A job is underway in some form.
    pub fn is_active(&self) -> bool {
        self.printing || self.paused || self.pausing || self.cancelling || self.finishing
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct JobInfo {
    #[serde(default)]
    pub file: Option<JobFile>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct JobFile {
    pub name: Option<String>,
}

/// Elapsed and remaining print time, in whole seconds.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobProgress {
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub print_time: Option<u64>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub print_time_left: Option<u64>,
}

// Any non-negative number, truncated to whole seconds. Anything else is unknown.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        _ => None,
    })
}

/// Actual/target pair for one heater.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
pub struct TemperatureReading {
    pub actual: Option<f64>,
    pub target: Option<f64>,
}

impl TemperatureReading {
    pub fn new(actual: f64, target: f64) -> Self {
        Self { actual: Some(actual), target: Some(target) }
    }
}

/// Heater readings keyed by tool id (`tool0`, `bed`, ...).
pub type TemperatureSnapshot = HashMap<String, TemperatureReading>;

/// Source of printer snapshots, polled once per refresh tick.
///
/// `None` means "nothing to report" and is never treated as an error.
pub trait PrinterStateProvider: Send + Sync {
    fn get_current_status(&self) -> Option<PrinterStatusSnapshot>;
    fn get_current_temperatures(&self) -> Option<TemperatureSnapshot>;
}

/// Provider for a host with no printer attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleProvider;

impl PrinterStateProvider for IdleProvider {
    fn get_current_status(&self) -> Option<PrinterStatusSnapshot> {
        None
    }

    fn get_current_temperatures(&self) -> Option<TemperatureSnapshot> {
        None
    }
}

/// Reads snapshots from JSON files kept current by another process.
#[derive(Debug, Clone, Default)]
pub struct JsonFileProvider {
    status_path: Option<PathBuf>,
    temperatures_path: Option<PathBuf>,
}

impl JsonFileProvider {
    pub fn new(status_path: Option<PathBuf>, temperatures_path: Option<PathBuf>) -> Self {
        Self { status_path, temperatures_path }
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!("Snapshot '{}' unavailable: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Snapshot '{}' is not valid JSON: {}", path.display(), e);
                None
            }
        }
    }
}

impl PrinterStateProvider for JsonFileProvider {
    fn get_current_status(&self) -> Option<PrinterStatusSnapshot> {
        self.status_path.as_deref().and_then(Self::read_json)
    }

    fn get_current_temperatures(&self) -> Option<TemperatureSnapshot> {
        self.temperatures_path.as_deref().and_then(Self::read_json)
    }
}
