//! Logging service

use crate::models::LogLevel;

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "pressloop=error,pressloop_core=error",
        LogLevel::Warn => "pressloop=warn,pressloop_core=warn",
        LogLevel::Info => "pressloop=info,pressloop_core=info",
        LogLevel::Debug => "pressloop=debug,pressloop_core=debug",
        LogLevel::Trace => "pressloop=trace,pressloop_core=trace",
    }
}

/// Initialize logging with the specified level. `RUST_LOG` takes precedence when set.
pub fn init_logging(level: LogLevel) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive(level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}

/// Log a unit lifecycle event (notify, poll, report)
pub fn log_unit_event(unit: &str, event_type: &str, details: Option<&str>) {
    tracing::info!(
        unit = unit,
        event_type = event_type,
        details = details.unwrap_or(""),
        "Unit event"
    );
}

/// Log a unit failure before it propagates to the scheduler
pub fn log_error(unit: &str, error: &str) {
    tracing::error!(unit = unit, error = error, "Unit failed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;

    static INIT: Once = Once::new();

    fn init_test_logging() {
        INIT.call_once(|| {
            let _ = init_logging(LogLevel::Debug);
        });
    }

    #[test]
    fn test_directive_covers_both_crates() {
        assert_eq!(
            directive(LogLevel::Warn),
            "pressloop=warn,pressloop_core=warn"
        );
        assert!(directive(LogLevel::Trace).contains("pressloop_core=trace"));
    }

    #[test]
    fn test_second_initialization_does_not_panic() {
        init_test_logging();
        assert!(init_logging(LogLevel::Info).is_err());
    }

    #[test]
    fn test_log_functions() {
        init_test_logging();

        // These should not panic
        log_unit_event("poller", "tick", Some("update_id=7"));
        log_error("reporter", "table unreachable");
    }
}
