use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

/// Per-request spans from the HTTP trace layer are emitted at debug.
const HTTP_TRACE_DIRECTIVE: &str = "tower_http=debug";

/// Build the filter for a configured level or directive list.
///
/// An unparsable value falls back to `info`.
pub fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("{level},{HTTP_TRACE_DIRECTIVE}"))
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{HTTP_TRACE_DIRECTIVE}")))
}

/// Install the global subscriber.
///
/// `level` comes from configuration, which already reads `RUST_LOG`.
pub fn init_tracing(level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(default_filter(level))
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .try_init()
}

#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("preapproval=debug")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_http_spans() {
        let filter = default_filter("warn").to_string();

        assert!(filter.contains("warn"));
        assert!(filter.contains(HTTP_TRACE_DIRECTIVE));
    }

    #[test]
    fn test_filter_accepts_directive_lists() {
        let filter = default_filter("preapproval=trace,sqlx=warn").to_string();

        assert!(filter.contains("preapproval=trace"));
        assert!(filter.contains("sqlx=warn"));
    }

    #[test]
    fn test_bad_level_falls_back_to_info() {
        let filter = default_filter("preapproval=loud").to_string();

        assert!(!filter.contains("loud"));
        assert!(filter.contains("info"));
    }
}
