//! Session identity and the auth screen state machine.
//!
//! ```text
//! Unauthenticated ──login ok──────────────▶ Authenticated
//!        │                                       │
//!        └──403 / registration──▶ Pending        └──logout──▶ Unauthenticated
//! ```

use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::storage::{ClientStorage, IS_ADMIN_KEY, TOKEN_KEY};

/// Literal username of the built-in super-admin shortcut.
pub const SUPER_ADMIN_USERNAME: &str = "admin";
/// Literal password of the built-in super-admin shortcut.
pub const SUPER_ADMIN_PASSWORD: &str = "admin123";
/// Token issued by the super-admin shortcut.
pub const SUPER_ADMIN_TOKEN: &str = "super_admin_demo";
/// Token used by demo mode.
pub const DEMO_TOKEN: &str = "demo_token";

/// The logged-in identity. No expiry is modelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub is_admin: bool,
}

impl Session {
    pub fn new(token: impl Into<String>, is_admin: bool) -> Self {
        Self {
            token: token.into(),
            is_admin,
        }
    }

    pub fn super_admin() -> Self {
        Self::new(SUPER_ADMIN_TOKEN, true)
    }

    pub fn demo() -> Self {
        Self::new(DEMO_TOKEN, true)
    }

    /// Read a previously persisted session. An absent or empty token means
    /// there is none.
    pub fn restore(storage: &ClientStorage) -> Option<Self> {
        let token = storage.get(TOKEN_KEY).filter(|t| !t.is_empty())?;
        Some(Self::new(token, storage.get(IS_ADMIN_KEY) == Some("true")))
    }

    pub fn persist(&self, storage: &mut ClientStorage) -> Result<()> {
        storage.set(TOKEN_KEY, self.token.as_str())?;
        storage.set(IS_ADMIN_KEY, self.is_admin.to_string())
    }
}

/// Normalised login input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Trim both fields and lower-case the username. Either one empty is a
    /// validation error.
    pub fn normalize(username: &str, password: &str) -> Result<Self> {
        let username = username.trim().to_lowercase();
        let password = password.trim().to_string();
        if username.is_empty() || password.is_empty() {
            return Err(Error::validation("username and password are required"));
        }
        Ok(Self { username, password })
    }

    /// Exact match against the super-admin shortcut pair.
    pub fn is_super_admin(&self) -> bool {
        self.username == SUPER_ADMIN_USERNAME && self.password == SUPER_ADMIN_PASSWORD
    }
}

/// Which auth screen the client is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Unauthenticated,
    /// Registered or rejected as not-yet-approved.
    Pending,
    Authenticated,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Pending => write!(f, "pending approval"),
            Self::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Current session plus the screen it implies.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    session: Option<Session>,
    screen: Screen,
}

impl SessionState {
    /// Startup: `Authenticated` iff a non-empty token was persisted.
    pub fn restore(storage: &ClientStorage) -> Self {
        match Session::restore(storage) {
            Some(session) => Self {
                session: Some(session),
                screen: Screen::Authenticated,
            },
            None => Self::default(),
        }
    }

    pub const fn screen(&self) -> Screen {
        self.screen
    }

    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Token to send as bearer credential, if logged in.
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_admin)
    }

    /// Enter `Authenticated`, persisting the session when `storage` is given.
    pub fn sign_in(&mut self, session: Session, storage: Option<&mut ClientStorage>) -> Result<()> {
        if let Some(storage) = storage {
            session.persist(storage)?;
        }
        debug!(is_admin = session.is_admin, "Session established");
        self.session = Some(session);
        self.screen = Screen::Authenticated;
        Ok(())
    }

    /// Enter `Pending`. Only meaningful from `Unauthenticated`.
    pub fn mark_pending(&mut self) {
        if self.screen == Screen::Unauthenticated {
            self.screen = Screen::Pending;
        }
    }

    /// Wipe all persisted client state and return to `Unauthenticated`.
    pub fn sign_out(&mut self, storage: &mut ClientStorage) -> Result<()> {
        storage.clear()?;
        self.session = None;
        self.screen = Screen::Unauthenticated;
        Ok(())
    }
}
