//! KORTEX CLI Library
//!
//! Terminal client for the KORTEX tactical map portal. Talks to the KORTEX
//! REST backend and falls back to local state whenever it is unreachable.

pub mod admin_cmd;
pub mod api;
pub mod app;
pub mod auth_cmd;
pub mod config_cmd;
pub mod marker_cmd;
