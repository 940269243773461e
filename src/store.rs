//! Session State Module
//!
//! Persists the last-used location, method, and madhab between runs so
//! the CLI can be invoked bare. The payload is an opaque restore blob:
//! every field is optional, unknown fields are ignored, and a missing or
//! corrupt file is simply treated as absent. Nothing here may fail the
//! run.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::geocode::GeoLocation;

// ===================== TYPES =====================

/// Restorable snapshot of the last successful run.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub madhab: Option<String>,
}

impl SessionState {
    /// Rebuild the location record, if the snapshot has coordinates.
    pub fn location(&self) -> Option<GeoLocation> {
        let (latitude, longitude) = (self.latitude?, self.longitude?);
        Some(GeoLocation {
            latitude,
            longitude,
            timezone: self.timezone.clone(),
            display_name: self.display_name.clone(),
            country: self.country.clone(),
            admin1: self.admin1.clone(),
        })
    }

    pub fn from_run(location: &GeoLocation, method: &str, madhab: &str) -> Self {
        Self {
            latitude: Some(location.latitude),
            longitude: Some(location.longitude),
            timezone: location.timezone.clone(),
            display_name: location.display_name.clone(),
            country: location.country.clone(),
            admin1: location.admin1.clone(),
            method: Some(method.to_string()),
            madhab: Some(madhab.to_string()),
        }
    }
}

// ===================== PERSISTENCE =====================

/// State file path: `$ATHAN_STATE_FILE`, else
/// `$HOME/.config/athan/state.json`.
pub fn state_path() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var("ATHAN_STATE_FILE") {
        return Some(PathBuf::from(explicit));
    }
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config").join("athan").join("state.json"))
}

/// Load the previous session state, or an empty one.
pub fn load() -> SessionState {
    let Some(path) = state_path() else {
        return SessionState::default();
    };
    fs::read_to_string(&path)
        .ok()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

/// Persist the session state. Best-effort: failures get a stderr notice
/// and are otherwise ignored.
pub fn save(state: &SessionState) {
    let Some(path) = state_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            eprintln!("Warning: could not create {}", parent.display());
            return;
        }
    }
    match serde_json::to_string_pretty(state) {
        Ok(raw) => {
            if fs::write(&path, raw).is_err() {
                eprintln!("Warning: could not write {}", path.display());
            }
        }
        Err(e) => eprintln!("Warning: could not serialize session state: {}", e),
    }
}

// ===================== TESTS =====================
