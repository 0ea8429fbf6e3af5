//! Logging infrastructure - structured tracing for the bridge
//!
//! Design: Uses `tracing` for structured, contextual logging with:
//! - Configurable log level via environment
//! - Zero-cost when disabled
//! - One span per primitive invocation
//! - Console or file output, human-readable or JSON

use crate::signature::{ParamKind, SignatureTag};
use once_cell::sync::OnceCell;
use std::io;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub use tracing::{debug, error, info, trace, warn};

/// Global logging state
static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Log file path; logs go to stderr when unset
    pub log_path: Option<String>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // PRIMBRIDGE_LOG_LEVEL: trace, debug, info, warn, error
        if let Ok(level_str) = std::env::var("PRIMBRIDGE_LOG_LEVEL") {
            config.level = parse_level(&level_str);
        }

        if let Ok(path) = std::env::var("PRIMBRIDGE_LOG_FILE") {
            config.log_path = Some(path);
        }

        config.json_format = std::env::var("PRIMBRIDGE_LOG_JSON").is_ok();
        config.show_spans = std::env::var("PRIMBRIDGE_LOG_SPANS").is_ok();

        config
    }

    /// Verbose config for debugging host integrations
    pub fn debug() -> Self {
        Self {
            level: Level::TRACE,
            log_path: None,
            json_format: false,
            show_spans: true,
        }
    }
}

fn parse_level(s: &str) -> Level {
    match s.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn make_writer(config: &LogConfig) -> BoxMakeWriter {
    let Some(path) = config.log_path.as_deref().map(Path::new) else {
        return BoxMakeWriter::new(io::stderr);
    };
    match path.file_name() {
        Some(file) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            BoxMakeWriter::new(tracing_appender::rolling::never(dir, file))
        }
        None => BoxMakeWriter::new(io::stderr),
    }
}

/// Initialize logging with default configuration
pub fn init() {
    init_with_config(LogConfig::from_env());
}

/// Initialize logging with custom configuration
pub fn init_with_config(config: LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("primbridge={}", config.level.as_str().to_lowercase()))
        });

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let layer = fmt::layer()
            .with_writer(make_writer(&config))
            .with_span_events(span_events)
            .with_target(true);

        let registry = tracing_subscriber::registry().with(env_filter);
        // Another subscriber may already be installed by the host
        let _ = if config.json_format {
            registry.with(layer.json()).try_init()
        } else {
            registry.with(layer.compact()).try_init()
        };
    });
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

// ============================================================================
// Bridge-specific logging functions
// ============================================================================

pub fn log_registry_init() {
    debug!(event = "registry_init", "Primitive registry initialized");
}

pub fn log_register(module: &str, name: &str, signature: SignatureTag) {
    debug!(
        event = "register",
        module = module,
        primitive = name,
        signature = %signature,
        arity = signature.arity(),
        "Primitive registered"
    );
}

pub fn log_collision(module: &str, name: &str, replaced: bool) {
    warn!(
        event = "name_collision",
        module = module,
        primitive = name,
        replaced = replaced,
        "Primitive name already registered"
    );
}

#[inline]
pub fn log_invoke(name: &str, arg_count: usize) {
    trace!(
        event = "invoke",
        primitive = name,
        args = arg_count,
        "Primitive invoked"
    );
}

pub fn log_arity_mismatch(name: &str, expected: usize, got: usize) {
    debug!(
        event = "arity_mismatch",
        primitive = name,
        expected = expected,
        got = got,
        "Wrong number of arguments"
    );
}

pub fn log_decode_error(name: &str, position: usize, expected: ParamKind, found: &str) {
    debug!(
        event = "decode_error",
        primitive = name,
        position = position,
        expected = %expected,
        found = found,
        "Argument failed to decode"
    );
}

pub fn log_native_error(name: &str, error: &str) {
    debug!(
        event = "native_error",
        primitive = name,
        error = error,
        "Native method failed"
    );
}
