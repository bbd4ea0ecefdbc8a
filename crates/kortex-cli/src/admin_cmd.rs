//! Admin subcommands: pending, approve.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use kortex_core::pending::PendingUser;
use kortex_core::session::Screen;

use crate::api::Backend;
use crate::app::Kortex;

/// Admin subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AdminAction {
    /// List accounts awaiting approval.
    Pending,
    /// Approve an account.
    Approve {
        /// Pending user ID.
        #[arg(allow_negative_numbers = true)]
        id: i64,
        /// Username shown in the confirmation.
        username: String,
    },
}

/// Execute an admin subcommand.
pub async fn run<B: Backend>(action: AdminAction, app: &mut Kortex<B>) -> anyhow::Result<()> {
    let mut out = io::stdout();
    if app.screen() != Screen::Authenticated {
        writeln!(out, "Not logged in")?;
        return Ok(());
    }
    if !app.is_admin() {
        writeln!(out, "Admin access required")?;
        return Ok(());
    }

    match action {
        AdminAction::Pending => print_pending(&app.list_pending_users().await)?,
        AdminAction::Approve { id, username } => {
            let approval = app.approve_user(id, &username).await;
            writeln!(out, "{}", approval.message())?;
        }
    }
    Ok(())
}

/// Print the approval list.
pub fn print_pending(users: &[PendingUser]) -> io::Result<()> {
    let mut out = io::stdout();
    if users.is_empty() {
        writeln!(out, "No pending requests")?;
        return Ok(());
    }
    writeln!(out, "Pending requests: {}", users.len())?;
    for u in users {
        writeln!(out, "  {}", format_pending(u))?;
    }
    Ok(())
}

fn format_pending(u: &PendingUser) -> String {
    format!(
        "#{:<14} {:<20} {:<12} [{}]",
        u.id,
        u.username,
        u.unit.as_deref().unwrap_or("-"),
        u.source
    )
}
