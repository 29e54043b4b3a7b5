use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the global tracing subscriber. Filter precedence: `LOADAPI_LOG`,
/// then `RUST_LOG`, then the `--verbose` flag. A second call is a no-op.
pub fn init_logging(verbose: bool) {
    let filter = std::env::var("LOADAPI_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| fallback_filter(verbose));

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Logging already initialized; keeping the existing subscriber.");
    }
}

fn fallback_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    EnvFilter::new(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(false);
        init_logging(false);
    }

    #[test]
    fn verbose_flag_controls_the_fallback_filter() {
        assert_eq!(fallback_filter(true).to_string(), "debug");
        assert_eq!(fallback_filter(false).to_string(), "info");
    }
}
