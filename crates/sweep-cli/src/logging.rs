use clap::ValueEnum;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Logs go to stderr so that stdout stays reserved for reports.
pub fn init_logging(level: LogLevel, json: bool) {
    let filter = EnvFilter::from_default_env().add_directive(level.as_tracing_level().into());
    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn log_level_warn_filters_info_messages() {
        let warn_level = LogLevel::Warn.as_tracing_level();
        let info_level = LogLevel::Info.as_tracing_level();
        assert_eq!(warn_level, Level::WARN);
        assert!(warn_level < info_level);
    }

    #[test]
    fn log_level_debug_includes_debug_messages() {
        assert_eq!(LogLevel::Debug.as_tracing_level(), Level::DEBUG);
    }

    #[test]
    fn log_level_error_filters_warn_messages() {
        let error_level = LogLevel::Error.as_tracing_level();
        let warn_level = LogLevel::Warn.as_tracing_level();
        assert_eq!(error_level, Level::ERROR);
        assert!(error_level < warn_level);
    }

    #[test]
    fn log_level_parses_from_cli_value() {
        assert_eq!(LogLevel::from_str("trace", true), Ok(LogLevel::Trace));
        assert!(LogLevel::from_str("verbose", true).is_err());
    }
}
