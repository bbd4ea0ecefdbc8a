//! Config subcommands: show, set-api-url.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use kortex_core::KortexConfig;

/// Config subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Persist a new backend base URL.
    SetApiUrl {
        /// Base URL, e.g. <https://kortex.example.org>.
        url: String,
    },
}

/// Execute a config subcommand. `config` is the stored configuration, before
/// command-line overrides.
pub fn run(action: ConfigAction, config: &mut KortexConfig) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        ConfigAction::Show => {
            writeln!(out, "{}", serde_json::to_string_pretty(config)?)?;
            if let Some(path) = KortexConfig::config_path() {
                writeln!(out, "(from {})", path.display())?;
            }
        }
        ConfigAction::SetApiUrl { url } => {
            config.set_api_url(&url)?;
            config.save()?;
            writeln!(out, "API URL set to {}", config.api_url)?;
        }
    }
    Ok(())
}
