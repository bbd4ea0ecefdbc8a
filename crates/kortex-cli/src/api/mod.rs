//! Backend API integration.
//!
//! [`Backend`] is the seam between the client state and the network: the
//! reqwest-based [`ApiClient`] implements it for real deployments.

mod client;
pub mod types;

use std::future::Future;

use kortex_core::marker::{Marker, NewMarker};
use kortex_core::pending::RemotePendingUser;

pub use client::{ApiClient, ApiConfig, ApiError};
pub use types::TokenResponse;

/// Calls the client makes against the KORTEX backend.
///
/// Each call is independent: no retries, no de-duplication, no cancellation.
pub trait Backend {
    /// `POST /token` with form credentials.
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<TokenResponse, ApiError>> + Send;

    /// `POST /register` with query credentials.
    fn register(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `GET /markers`.
    fn list_markers(&self, token: &str)
    -> impl Future<Output = Result<Vec<Marker>, ApiError>> + Send;

    /// `POST /markers` with the marker as query parameters.
    fn create_marker(
        &self,
        token: &str,
        marker: &NewMarker,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `GET /admin/pending`.
    fn list_pending(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Vec<RemotePendingUser>, ApiError>> + Send;

    /// `POST /admin/approve/{id}`.
    fn approve(&self, token: &str, user_id: i64)
    -> impl Future<Output = Result<(), ApiError>> + Send;
}
