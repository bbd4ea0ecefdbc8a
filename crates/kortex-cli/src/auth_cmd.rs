//! Auth subcommands: login, logout, register, enroll, status, demo.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};
use std::path::PathBuf;

use kortex_core::KortexConfig;
use kortex_core::registration::{AdvancedRegistration, Document};
use kortex_core::session::Screen;

use crate::api::Backend;
use crate::app::Kortex;
use crate::{admin_cmd, marker_cmd};

const PENDING_NOTICE: &str = "Account pending approval. Contact administrator.";

/// Auth subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Log in (the backend is skipped for the built-in super-admin).
    Login {
        /// Username.
        #[arg(short, long)]
        username: String,
        /// Password.
        #[arg(short, long)]
        password: String,
    },
    /// Log out and wipe all stored client state.
    Logout,
    /// Request an account from the backend.
    Register {
        /// Username.
        #[arg(short, long)]
        username: String,
        /// Password.
        #[arg(short, long)]
        password: String,
    },
    /// Submit a document-backed registration to the local approval queue.
    Enroll(EnrollArgs),
    /// Show current auth status.
    Status,
    /// Explore as an admin without logging in. Nothing is stored.
    Demo,
}

/// Fields of an advanced registration.
#[derive(clap::Args, Debug)]
pub struct EnrollArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub unit: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    /// Supporting document to attach (repeatable).
    #[arg(long = "document")]
    pub documents: Vec<PathBuf>,
}

impl EnrollArgs {
    fn into_form(self) -> anyhow::Result<AdvancedRegistration> {
        let documents = self
            .documents
            .iter()
            .map(|p| Document::read(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AdvancedRegistration {
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            unit: self.unit,
            phone: self.phone,
            documents,
        })
    }
}

/// Execute an auth subcommand.
pub async fn run<B: Backend>(
    action: AuthAction,
    app: &mut Kortex<B>,
    config: &KortexConfig,
) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        AuthAction::Login { username, password } => {
            match app.login(&username, &password).await? {
                Screen::Authenticated if app.is_admin() => {
                    writeln!(out, "Logged in as {} (admin)", username.trim().to_lowercase())?;
                }
                Screen::Authenticated => {
                    writeln!(out, "Logged in as {}", username.trim().to_lowercase())?;
                }
                _ => writeln!(out, "{PENDING_NOTICE}")?,
            }
        }
        AuthAction::Logout => {
            app.logout()?;
            writeln!(out, "Logged out")?;
        }
        AuthAction::Register { username, password } => {
            app.register(&username, &password).await?;
            writeln!(out, "Registration successful. Wait for administrator approval.")?;
        }
        AuthAction::Enroll(args) => {
            let entry = app.submit_advanced_registration(args.into_form()?)?;
            writeln!(
                out,
                "Registration #{} for {} queued ({} document(s)). {PENDING_NOTICE}",
                entry.id,
                entry.username,
                entry.documents.len()
            )?;
        }
        AuthAction::Status => status(app, config)?,
        AuthAction::Demo => {
            app.enter_demo_mode()?;
            writeln!(out, "Demo mode: admin session for this run only")?;
            app.load_markers().await;
            marker_cmd::print_layer(app)?;
            admin_cmd::print_pending(&app.list_pending_users().await)?;
        }
    }
    Ok(())
}

fn status<B: Backend>(app: &Kortex<B>, config: &KortexConfig) -> io::Result<()> {
    let mut out = io::stdout();
    writeln!(out, "Screen: {}", app.screen())?;
    if app.screen() == Screen::Authenticated {
        writeln!(out, "Admin: {}", if app.is_admin() { "yes" } else { "no" })?;
    }
    writeln!(out, "API: {}", config.api_url)?;
    if let Some(path) = app.storage().path() {
        writeln!(out, "Storage: {}", path.display())?;
    }
    Ok(())
}
