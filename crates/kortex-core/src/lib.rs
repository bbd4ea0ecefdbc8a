//! KORTEX Core Library
//!
//! Client-side state for the KORTEX tactical map portal:
//! - Marker records, their presentation rules and the map layers
//! - Session identity and the auth screen state machine
//! - Durable client storage and the local pending-registration queue
//! - Pending-user reconciliation and fixed mock data
//! - Configuration and common error types

pub mod config;
pub mod error;
pub mod layers;
pub mod marker;
pub mod mock;
pub mod pending;
pub mod registration;
pub mod session;
pub mod storage;
pub mod tracing_init;

pub use config::KortexConfig;
pub use error::{Error, Result};
pub use layers::{MarkerLayer, TrenchLayer};
pub use marker::{Marker, NewMarker, SyncStatus};
pub use pending::{PendingSource, PendingUser, RemotePendingUser};
pub use registration::{AdvancedRegistration, Document, PendingRegistration};
pub use session::{Credentials, Screen, Session, SessionState};
pub use storage::ClientStorage;
