//! Marker subcommands: list, add.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use kortex_core::marker::{Marker, SyncStatus};
use kortex_core::session::Screen;

use crate::api::Backend;
use crate::app::Kortex;

/// Marker subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum MarkerAction {
    /// Load and show the marker layer.
    List {
        /// Hide markers of this type (repeatable).
        #[arg(long)]
        hide: Vec<String>,
        /// Also show the trench overlay.
        #[arg(long)]
        trenches: bool,
    },
    /// Place a new marker.
    Add {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Marker type: enemy, ally, unit, target, ...
        #[arg(long = "type", default_value = "enemy")]
        kind: String,
        #[arg(long)]
        label: String,
        #[arg(long)]
        description: Option<String>,
    },
}

/// Execute a markers subcommand.
pub async fn run<B: Backend>(action: MarkerAction, app: &mut Kortex<B>) -> anyhow::Result<()> {
    let mut out = io::stdout();
    if app.screen() != Screen::Authenticated {
        writeln!(out, "Not logged in")?;
        return Ok(());
    }

    match action {
        MarkerAction::List { hide, trenches } => {
            for kind in &hide {
                if app.markers().is_type_visible(kind) {
                    app.markers_mut().toggle_type(kind);
                }
            }
            if trenches && !app.trenches().is_visible() {
                app.trenches_mut().toggle();
            }
            app.load_markers().await;
            print_layer(app)?;
        }
        MarkerAction::Add {
            lat,
            lon,
            kind,
            label,
            description,
        } => {
            // Show the current layer first so a local-only marker lands on top of it.
            app.load_markers().await;
            let status = app
                .create_marker(lat, lon, &kind, &label, description.as_deref())
                .await?;
            match status {
                SyncStatus::LocalOnly => {
                    writeln!(out, "Marker {label} placed locally (not saved)")?;
                }
                _ => writeln!(out, "Marker {label} saved")?,
            }
            print_layer(app)?;
        }
    }
    Ok(())
}

fn format_marker(m: &Marker) -> String {
    format!(
        "{:<14} {:<8} {:<7} {:>8.4}, {:>8.4}  {}  by {} at {} [{}]",
        m.label,
        m.kind,
        m.status(),
        m.lat,
        m.lon,
        m.color(),
        m.created_by,
        m.created_at,
        m.sync_status
    )
}

/// Print the visible markers and, if shown, the trench overlay.
pub fn print_layer<B: Backend>(app: &Kortex<B>) -> io::Result<()> {
    let mut out = io::stdout();
    let layer = app.markers();
    let visible: Vec<&Marker> = layer.visible_markers().collect();
    writeln!(out, "Markers: {} ({} visible)", layer.len(), visible.len())?;
    for m in visible {
        writeln!(out, "  {}", format_marker(m))?;
        if let Some(desc) = m.description.as_deref().filter(|d| !d.is_empty()) {
            writeln!(out, "      {desc}")?;
        }
    }
    if app.trenches().is_visible() {
        writeln!(out, "Trenches: {} lines", app.trenches().lines().len())?;
        for line in app.trenches().lines() {
            let points: Vec<String> = line
                .iter()
                .map(|[lat, lon]| format!("({lat:.2}, {lon:.2})"))
                .collect();
            writeln!(out, "  {}", points.join(" -> "))?;
        }
    }
    Ok(())
}
