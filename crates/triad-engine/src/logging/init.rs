use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "triad_engine=debug,glutin_winit=warn"). When unset, `RUST_LOG` is read,
/// then `default_level` applies with the windowing crates held at `warn`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Config with an explicit filter that overrides `RUST_LOG`.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }

    fn builder(&self) -> env_logger::Builder {
        self.builder_with_env(std::env::var("RUST_LOG").ok())
    }

    fn builder_with_env(&self, rust_log: Option<String>) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();

        match (&self.env_filter, rust_log) {
            (Some(filter), _) => {
                builder.parse_filters(filter);
            }
            (None, Some(filter)) => {
                builder.parse_filters(&filter);
            }
            (None, None) => {
                builder
                    .filter_level(self.default_level)
                    .filter_module("winit", LevelFilter::Warn)
                    .filter_module("glutin", LevelFilter::Warn)
                    .filter_module("glutin_winit", LevelFilter::Warn);
            }
        }

        builder.write_style(self.write_style);
        builder
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Idempotent; subsequent calls are ignored, as is a logger installed
/// elsewhere first.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        if config.builder().try_init().is_err() {
            return;
        }
        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Metadata};

    fn enabled(logger: &env_logger::Logger, target: &str, level: Level) -> bool {
        logger.enabled(&Metadata::builder().target(target).level(level).build())
    }

    #[test]
    fn explicit_filter_wins_over_rust_log() {
        let logger = LoggingConfig::with_filter("triad_engine=trace")
            .builder_with_env(Some("error".into()))
            .build();

        assert!(enabled(&logger, "triad_engine::render", Level::Trace));
        assert!(!enabled(&logger, "triad_demo", Level::Error));
    }

    #[test]
    fn rust_log_applies_without_explicit_filter() {
        let logger = LoggingConfig::default()
            .builder_with_env(Some("warn".into()))
            .build();

        assert_eq!(logger.filter(), LevelFilter::Warn);
        assert!(!enabled(&logger, "triad_engine", Level::Info));
    }

    #[test]
    fn default_level_holds_windowing_crates_at_warn() {
        let logger = LoggingConfig::default().builder_with_env(None).build();

        assert!(enabled(&logger, "triad_engine", Level::Info));
        assert!(!enabled(&logger, "triad_engine", Level::Debug));
        assert!(!enabled(&logger, "winit::platform_impl", Level::Info));
        assert!(enabled(&logger, "glutin_winit", Level::Warn));
    }

    #[test]
    fn first_init_wins() {
        init_logging(LoggingConfig::with_filter("warn"));
        init_logging(LoggingConfig::with_filter("trace"));
        assert_eq!(log::max_level(), LevelFilter::Warn);
    }
}
