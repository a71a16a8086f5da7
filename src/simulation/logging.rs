//! Logging and tracing configuration
//!
//! Logs always go to stderr (and optionally a daily rolling file) so that the
//! observation table written to stdout stays machine-readable.

use std::io;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the application
    pub level: Level,
    /// Whether to enable JSON formatting
    pub json_format: bool,
    /// Whether to log to file
    pub log_to_file: bool,
    /// Log file directory (if logging to file)
    pub log_directory: Option<String>,
    /// Log file prefix (if logging to file)
    pub log_file_prefix: String,
    /// Whether to enable span events
    pub enable_span_events: bool,
    /// Whether to enable ansi colors in console output
    pub enable_ansi: bool,
    /// Custom environment filter
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            json_format: false,
            log_to_file: false,
            log_directory: None,
            log_file_prefix: "transit-loop-simulator".to_string(),
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON formatting
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Enable file logging
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_to_file = true;
        self.log_directory = Some(directory.into());
        self
    }

    /// Set log file prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_file_prefix = prefix.into();
        self
    }

    /// Enable span events
    pub fn with_span_events(mut self) -> Self {
        self.enable_span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn span_events(&self) -> FmtSpan {
        if self.enable_span_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn build_filter(&self) -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
        if let Some(filter) = &self.env_filter {
            return Ok(EnvFilter::try_new(filter)?);
        }
        Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                self.level
            ))
        }))
    }

    /// Initialize the global tracing subscriber
    pub fn init(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let registry = Registry::default().with(self.build_filter()?);
        let span_events = self.span_events();

        // Console layer is always present; the file layer, if any, is JSON.
        let console_json = self.json_format.then(|| {
            fmt::layer().json().with_writer(io::stderr).with_span_events(span_events.clone())
        });
        let console_pretty = (!self.json_format).then(|| {
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(self.enable_ansi)
                .with_span_events(span_events.clone())
        });

        let file_layer = if self.log_to_file {
            let log_dir = self.log_directory.as_deref().unwrap_or("logs");
            let file_appender = rolling::daily(log_dir, &self.log_file_prefix);
            let (file_writer, guard) = non_blocking(file_appender);
            // The guard flushes on drop; the subscriber lives for the whole process.
            std::mem::forget(guard);
            Some(fmt::layer().json().with_writer(file_writer).with_span_events(span_events))
        } else {
            None
        };

        registry.with(console_json).with(console_pretty).with(file_layer).try_init()?;

        info!(level = %self.level, json = self.json_format, "Logging initialized");
        Ok(())
    }

    /// Initialize logging for testing (minimal output)
    pub fn init_test() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Self::new().with_level(Level::WARN).without_ansi().init()
    }

    /// Initialize verbose logging (INFO level with span events)
    pub fn init_verbose() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Self::new().with_level(Level::INFO).with_span_events().init()
    }

    /// Initialize debug logging (DEBUG level with span events)
    pub fn init_debug() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Self::new().with_level(Level::DEBUG).with_span_events().init()
    }
}

/// Macro for creating structured log events with simulation context
#[macro_export]
macro_rules! sim_event {
    ($level:ident, $message:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::$level!(
            message = $message,
            component = "simulation",
            $($key = $value,)*
        );
    };
    ($level:ident, $message:expr) => {
        tracing::$level!(
            message = $message,
            component = "simulation",
        );
    };
}

/// Macro for creating performance measurement spans
#[macro_export]
macro_rules! perf_span {
    ($name:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::info_span!(
            $name,
            component = "performance",
            $($key = $value,)*
        )
    };
    ($name:expr) => {
        tracing::info_span!(
            $name,
            component = "performance",
        )
    };
}
