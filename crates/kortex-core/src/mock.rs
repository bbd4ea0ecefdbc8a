//! Fixed placeholder data substituted when the backend is unreachable.

use crate::marker::{Marker, SyncStatus};
use crate::pending::{PendingSource, PendingUser};

fn mock_marker(
    lat: f64,
    lon: f64,
    kind: &str,
    label: &str,
    description: &str,
    created_by: &str,
    created_at: &str,
) -> Marker {
    Marker {
        id: None,
        lat,
        lon,
        kind: kind.to_string(),
        label: label.to_string(),
        description: Some(description.to_string()),
        created_by: created_by.to_string(),
        created_at: created_at.to_string(),
        sync_status: SyncStatus::Mock,
    }
}

/// The three markers shown when `/markers` cannot be loaded. Always the same
/// entries in the same order.
pub fn mock_markers() -> Vec<Marker> {
    vec![
        mock_marker(
            50.4501,
            30.5234,
            "unit",
            "UKR-ALPHA-1",
            "Main command unit",
            "ADMIN",
            "2026-02-03 12:00:00",
        ),
        mock_marker(
            50.4580,
            30.5300,
            "enemy",
            "RU-T-90",
            "Identified enemy tank platoon",
            "INTEL",
            "2026-02-03 12:05:00",
        ),
        mock_marker(
            50.4450,
            30.5100,
            "target",
            "OBJ-BRAVO",
            "Primary extraction point",
            "ADMIN",
            "2026-02-03 12:10:00",
        ),
    ]
}

/// Placeholder pending users, shown only when neither the backend nor the
/// local queue has anything.
pub fn mock_pending_users() -> Vec<PendingUser> {
    [(101, "Sgt. Petrov"), (102, "Lt. Ivanova"), (103, "Unit-772")]
        .into_iter()
        .map(|(id, username)| PendingUser {
            id,
            username: username.to_string(),
            unit: None,
            source: PendingSource::Mock,
        })
        .collect()
}
