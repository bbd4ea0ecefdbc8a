//! Logging setup for the `kortex` binary.
//!
//! Logs go to stderr so command output on stdout stays clean. Offline
//! fallbacks are logged at `info`, so they only show up when `RUST_LOG`
//! asks for them.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when it is set to something parseable; a blank or
/// malformed value falls back to `default_filter` (e.g. `"kortex=warn"`).
/// With `log_json`, each event is one JSON line.
pub fn init_tracing(default_filter: &str, log_json: bool) {
    let filter = build_filter(default_filter, std::env::var("RUST_LOG").ok().as_deref());
    let output = if log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .init();
}

fn build_filter(default_filter: &str, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_or_blank_env_uses_default() {
        assert_eq!(build_filter("kortex=warn", None).to_string(), "kortex=warn");
        assert_eq!(
            build_filter("kortex=warn", Some("   ")).to_string(),
            "kortex=warn"
        );
    }

    #[test]
    fn env_directives_override_default() {
        assert_eq!(
            build_filter("kortex=warn", Some("kortex=info")).to_string(),
            "kortex=info"
        );
    }

    #[test]
    fn malformed_env_falls_back_to_default() {
        assert_eq!(
            build_filter("kortex=warn", Some("kortex=loudest")).to_string(),
            "kortex=warn"
        );
    }
}
