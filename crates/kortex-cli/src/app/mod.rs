//! Composition root for the client.
//!
//! [`Kortex`] owns the backend, the durable client storage, the session state
//! and the map layers. Every operation that talks to the backend degrades to
//! a local approximation instead of failing:
//!
//! | operation            | backend failure becomes                    |
//! |----------------------|--------------------------------------------|
//! | `load_markers`       | the fixed mock marker set                  |
//! | `create_marker`      | a `LOCAL` marker appended to the layer     |
//! | `list_pending_users` | empty remote list, merged with local queue |
//! |                      | (unreadable queue counts as empty)         |
//! | `approve_user`       | success reported as offline                |
//!
//! Login and registration are the exceptions: they surface errors.

use std::fmt;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use kortex_core::layers::{MarkerLayer, TrenchLayer};
use kortex_core::marker::{NewMarker, SyncStatus};
use kortex_core::mock::mock_markers;
use kortex_core::pending::{self, PendingUser};
use kortex_core::registration::{self, AdvancedRegistration, PendingRegistration};
use kortex_core::session::{Credentials, Screen, Session, SessionState};
use kortex_core::storage::ClientStorage;

use crate::api::{ApiError, Backend};


/// Errors surfaced by login and registration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad input, or client storage could not be written.
    #[error(transparent)]
    Local(#[from] kortex_core::Error),

    /// The backend refused; carries its `detail` or a generic message.
    #[error("{0}")]
    Rejected(String),

    #[error("Server connection error: {0}")]
    Connectivity(ApiError),

    /// The backend answered with a success status but an unusable body.
    #[error("Unexpected server response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    /// Anything that is not an explicit refusal from the backend.
    fn from_api(e: ApiError) -> Self {
        match e {
            ApiError::Decode(msg) => Self::InvalidResponse(msg),
            other => Self::Connectivity(other),
        }
    }
}

/// How an approval was settled. Every variant is reported as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalProvenance {
    /// Backend acknowledged the approval.
    Confirmed,
    /// Removed from the local registration queue; backend never contacted.
    LocalQueue,
    /// Backend refused or was unreachable.
    Offline,
}

/// Result of [`Kortex::approve_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    pub id: i64,
    pub username: String,
    pub provenance: ApprovalProvenance,
}

impl Approval {
    /// User-facing notification text.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Approval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ACCESS GRANTED: {}", self.username)?;
        match self.provenance {
            ApprovalProvenance::Confirmed => Ok(()),
            ApprovalProvenance::LocalQueue => write!(f, " (LOCAL QUEUE)"),
            ApprovalProvenance::Offline => write!(f, " (OFFLINE MODE)"),
        }
    }
}

/// Client application state.
pub struct Kortex<B> {
    backend: B,
    storage: ClientStorage,
    session: SessionState,
    markers: MarkerLayer,
    trenches: TrenchLayer,
}

impl<B: Backend> Kortex<B> {
    /// Build the client, restoring any persisted session from `storage`.
    pub fn new(backend: B, storage: ClientStorage) -> Self {
        let session = SessionState::restore(&storage);
        debug!(screen = %session.screen(), "Client state restored");
        Self {
            backend,
            storage,
            session,
            markers: MarkerLayer::default(),
            trenches: TrenchLayer::default(),
        }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn storage(&self) -> &ClientStorage {
        &self.storage
    }

    pub const fn screen(&self) -> Screen {
        self.session.screen()
    }

    pub const fn session(&self) -> Option<&Session> {
        self.session.session()
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    pub const fn markers(&self) -> &MarkerLayer {
        &self.markers
    }

    pub const fn markers_mut(&mut self) -> &mut MarkerLayer {
        &mut self.markers
    }

    pub const fn trenches(&self) -> &TrenchLayer {
        &self.trenches
    }

    pub const fn trenches_mut(&mut self) -> &mut TrenchLayer {
        &mut self.trenches
    }

    fn token(&self) -> &str {
        self.session.token().unwrap_or_default()
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Log in. The super-admin pair is accepted locally without contacting
    /// the backend. A 403 from the backend moves to `Pending` rather than
    /// failing.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Screen, AuthError> {
        let creds = Credentials::normalize(username, password)?;

        if creds.is_super_admin() {
            info!("Super-admin authorization accepted locally");
            self.session
                .sign_in(Session::super_admin(), Some(&mut self.storage))?;
            return Ok(self.screen());
        }

        match self.backend.login(&creds.username, &creds.password).await {
            Ok(resp) => {
                info!(username = %creds.username, is_admin = resp.is_admin, "Logged in");
                self.session.sign_in(
                    Session::new(resp.access_token, resp.is_admin),
                    Some(&mut self.storage),
                )?;
                Ok(self.screen())
            }
            Err(ApiError::Api { status: 403, .. }) => {
                info!(username = %creds.username, "Account awaiting approval");
                self.session.mark_pending();
                Ok(self.screen())
            }
            Err(ApiError::Api { detail, .. }) => {
                Err(AuthError::Rejected(detail.unwrap_or_else(|| "Login failed".into())))
            }
            Err(e) => Err(AuthError::from_api(e)),
        }
    }

    /// Plain registration against the backend. Success means the account
    /// awaits approval.
    pub async fn register(&mut self, username: &str, password: &str) -> Result<Screen, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(kortex_core::Error::validation("username and password are required").into());
        }
        match self.backend.register(username, password).await {
            Ok(()) => {
                info!(username, "Registration submitted");
                self.session.mark_pending();
                Ok(self.screen())
            }
            Err(ApiError::Api { detail, .. }) => Err(AuthError::Rejected(
                detail.unwrap_or_else(|| "Registration failed".into()),
            )),
            Err(e) => Err(AuthError::from_api(e)),
        }
    }

    /// Switch to an admin demo session without persisting anything.
    pub fn enter_demo_mode(&mut self) -> kortex_core::Result<()> {
        info!("Entering demo mode");
        self.session.sign_in(Session::demo(), None)
    }

    /// Clear every persisted key and the rendered layers, returning to the
    /// unauthenticated screen.
    pub fn logout(&mut self) -> kortex_core::Result<()> {
        self.session.sign_out(&mut self.storage)?;
        self.markers.clear();
        if self.trenches.is_visible() {
            self.trenches.toggle();
        }
        info!("Logged out");
        Ok(())
    }

    // =========================================================================
    // Markers
    // =========================================================================

    /// Replace the marker layer with the backend's markers, or with the fixed
    /// mock set on any failure. The failure is logged, never returned.
    pub async fn load_markers(&mut self) -> SyncStatus {
        match self.backend.list_markers(self.token()).await {
            Ok(markers) => {
                debug!(count = markers.len(), "Markers loaded");
                self.markers.replace(markers);
                SyncStatus::Confirmed
            }
            Err(e) => {
                info!(error = %e, "Marker load failed, showing mock markers");
                self.markers.replace(mock_markers());
                SyncStatus::Mock
            }
        }
    }

    /// Create a marker. Nothing is added locally until the backend answers:
    /// success reloads the whole layer, failure appends a `LOCAL` marker that
    /// is never persisted or retried.
    pub async fn create_marker(
        &mut self,
        lat: f64,
        lon: f64,
        kind: &str,
        label: &str,
        description: Option<&str>,
    ) -> kortex_core::Result<SyncStatus> {
        let marker = NewMarker::new(lat, lon, kind, label, description)?;
        match self.backend.create_marker(self.token(), &marker).await {
            Ok(()) => {
                self.load_markers().await;
                Ok(SyncStatus::Confirmed)
            }
            Err(e) => {
                info!(error = %e, label = %marker.label, "Marker not saved, rendering locally");
                self.markers.push(marker.into_local(Utc::now()));
                Ok(SyncStatus::LocalOnly)
            }
        }
    }

    // =========================================================================
    // Registration queue and approvals
    // =========================================================================

    /// Queue an advanced registration locally. No backend call is made.
    pub fn submit_advanced_registration(
        &mut self,
        form: AdvancedRegistration,
    ) -> kortex_core::Result<PendingRegistration> {
        let entry = registration::enqueue(&mut self.storage, form, Utc::now())?;
        info!(id = entry.id, username = %entry.username, "Registration queued locally");
        self.session.mark_pending();
        Ok(entry)
    }

    /// Pending users: backend-reported first, then the local queue, then the
    /// mock list if both are empty. An unreadable local queue counts as empty.
    pub async fn list_pending_users(&self) -> Vec<PendingUser> {
        let remote = match self.backend.list_pending(self.token()).await {
            Ok(users) => users,
            Err(e) => {
                info!(error = %e, "Pending list unavailable, using local queue only");
                Vec::new()
            }
        };
        let local = registration::load_queue(&self.storage).unwrap_or_else(|e| {
            warn!(error = %e, "Local registration queue unreadable, ignoring it");
            Vec::new()
        });
        pending::reconcile(remote, &local)
    }

    /// Approve a pending user. Locally queued registrations are settled
    /// without the backend; otherwise the backend is asked, and its answer
    /// only changes the provenance, never the outcome.
    pub async fn approve_user(&mut self, id: i64, username: &str) -> Approval {
        let approval = |provenance| Approval {
            id,
            username: username.to_string(),
            provenance,
        };

        match registration::dequeue(&mut self.storage, id) {
            Ok(Some(_)) => {
                info!(id, username, "Approved locally queued registration");
                return approval(ApprovalProvenance::LocalQueue);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Local registration queue unreadable"),
        }

        match self.backend.approve(self.token(), id).await {
            Ok(()) => {
                info!(id, username, "Approval confirmed by backend");
                approval(ApprovalProvenance::Confirmed)
            }
            Err(e) => {
                info!(id, username, error = %e, "Approval not confirmed, reporting offline");
                approval(ApprovalProvenance::Offline)
            }
        }
    }
}
