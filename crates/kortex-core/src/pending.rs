//! Reconciliation of pending users from backend, local queue and placeholders.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mock::mock_pending_users;
use crate::registration::PendingRegistration;

/// Pending user as reported by `GET /admin/pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePendingUser {
    pub id: i64,
    pub username: String,
}

/// Where a pending entry was found. Declared in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingSource {
    Remote,
    Local,
    Mock,
}

impl fmt::Display for PendingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Local => write!(f, "local"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

/// A row in the admin approval list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingUser {
    pub id: i64,
    pub username: String,
    pub unit: Option<String>,
    pub source: PendingSource,
}

impl From<RemotePendingUser> for PendingUser {
    fn from(u: RemotePendingUser) -> Self {
        Self {
            id: u.id,
            username: u.username,
            unit: None,
            source: PendingSource::Remote,
        }
    }
}

impl From<&PendingRegistration> for PendingUser {
    fn from(r: &PendingRegistration) -> Self {
        Self {
            id: r.id,
            username: r.username.clone(),
            unit: (!r.unit.is_empty()).then(|| r.unit.clone()),
            source: PendingSource::Local,
        }
    }
}

/// Merge pending users: remote entries first, then the local queue. The mock
/// list is used only when both are empty.
pub fn reconcile(remote: Vec<RemotePendingUser>, local: &[PendingRegistration]) -> Vec<PendingUser> {
    let merged: Vec<PendingUser> = remote
        .into_iter()
        .map(PendingUser::from)
        .chain(local.iter().map(PendingUser::from))
        .collect();
    if merged.is_empty() {
        mock_pending_users()
    } else {
        merged
    }
}
