//! Marker records and their presentation rules.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Attribution given to markers that only exist in the local layer.
pub const LOCAL_AUTHOR: &str = "LOCAL";

/// Render colour for hostile markers.
pub const ENEMY_COLOR: &str = "#ef4444";
/// Render colour for friendly markers (`ally`, `unit`).
pub const FRIENDLY_COLOR: &str = "#3b82f6";
/// Render colour for every other marker type.
pub const OTHER_COLOR: &str = "#f59e0b";

/// Where a record's state comes from.
///
/// Backend payloads carry no such field, so anything deserialized from the
/// API defaults to `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Reported by the backend.
    #[default]
    Confirmed,
    /// Fixed placeholder substituted for an unreachable backend.
    Mock,
    /// Created on this client after the backend refused or was unreachable.
    /// Never persisted and never retried.
    LocalOnly,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::Mock => write!(f, "mock"),
            Self::LocalOnly => write!(f, "local-only"),
        }
    }
}

/// Status shown on the detail card of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStatus {
    Hostile,
    Active,
}

impl fmt::Display for MarkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hostile => write!(f, "HOSTILE"),
            Self::Active => write!(f, "ACTIVE"),
        }
    }
}

/// A point of interest on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Backend row id. Mock and local markers have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub lat: f64,
    pub lon: f64,
    /// Open-ended category (`enemy`, `ally`, `unit`, `target`, ...).
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_by: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
    #[serde(default)]
    pub sync_status: SyncStatus,
}

impl Marker {
    /// Render colour, determined by type alone.
    pub fn color(&self) -> &'static str {
        color_for(&self.kind)
    }

    pub fn status(&self) -> MarkerStatus {
        if self.kind == "enemy" {
            MarkerStatus::Hostile
        } else {
            MarkerStatus::Active
        }
    }
}

/// Backend text columns are nullable; `null` reads as an empty string so a
/// single sparse row cannot reject the whole list.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Render colour for a marker type.
pub fn color_for(kind: &str) -> &'static str {
    match kind {
        "enemy" => ENEMY_COLOR,
        "ally" | "unit" => FRIENDLY_COLOR,
        _ => OTHER_COLOR,
    }
}

/// Validated input for creating a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMarker {
    pub lat: f64,
    pub lon: f64,
    pub kind: String,
    pub label: String,
    pub description: Option<String>,
}

impl NewMarker {
    /// Validate marker input. An empty description is treated as absent.
    pub fn new(
        lat: f64,
        lon: f64,
        kind: &str,
        label: &str,
        description: Option<&str>,
    ) -> Result<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(Error::validation(format!(
                "coordinates must be finite (lat={lat}, lon={lon})"
            )));
        }
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(Error::validation("marker type is required"));
        }
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::validation("marker label is required"));
        }
        Ok(Self {
            lat,
            lon,
            kind: kind.to_string(),
            label: label.to_string(),
            description: description
                .filter(|d| !d.is_empty())
                .map(ToString::to_string),
        })
    }

    /// Materialise this input as a marker that exists only in the local layer.
    pub fn into_local(self, now: DateTime<Utc>) -> Marker {
        Marker {
            id: None,
            lat: self.lat,
            lon: self.lon,
            kind: self.kind,
            label: self.label,
            description: self.description,
            created_by: LOCAL_AUTHOR.to_string(),
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            sync_status: SyncStatus::LocalOnly,
        }
    }
}
