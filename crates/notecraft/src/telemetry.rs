//! Logging setup for the `notecraft` binary.

use notecraft_error::{ConfigError, NotecraftResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither a level nor `RUST_LOG` is given.
const DEFAULT_FILTER: &str = "info";

/// Filter used with `--verbose`.
const VERBOSE_FILTER: &str = "info,notecraft=debug,notecraft_generators=debug,notecraft_models=debug";

/// Where and how much to log.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Explicit filter directive, e.g. `debug` or `warn,notecraft_models=trace`
    pub level: Option<String>,
    /// Raise notecraft's own crates to debug
    pub verbose: bool,
    /// Write logs to this file, never rotated
    pub file: Option<PathBuf>,
    /// Otherwise write daily-rotated `notecraft.*.log` files here
    pub dir: Option<PathBuf>,
}

/// Picks the filter directive: an explicit level wins, then `--verbose`,
/// then `RUST_LOG`, then the default.
///
/// ```
/// use notecraft::filter_directive;
///
/// assert_eq!(filter_directive(Some("warn"), true, Some("trace")), "warn");
/// assert_eq!(filter_directive(None, false, Some("trace")), "trace");
/// assert_eq!(filter_directive(None, false, None), "info");
/// ```
pub fn filter_directive(level: Option<&str>, verbose: bool, env: Option<&str>) -> String {
    let level = level.map(str::trim).filter(|l| !l.is_empty());
    let env = env.map(str::trim).filter(|e| !e.is_empty());
    match (level, verbose, env) {
        (Some(level), _, _) => level.to_lowercase(),
        (None, true, _) => VERBOSE_FILTER.to_string(),
        (None, false, Some(env)) => env.to_string(),
        (None, false, None) => DEFAULT_FILTER.to_string(),
    }
}

fn file_appender(options: &LogOptions) -> NotecraftResult<Option<RollingFileAppender>> {
    let (dir, builder) = match (&options.file, &options.dir) {
        (Some(file), _) => {
            let dir = file
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."))
                .to_path_buf();
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| ConfigError::new(format!("Invalid log file: {}", file.display())))?;
            let builder = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(name);
            (dir, builder)
        }
        (None, Some(dir)) => {
            let builder = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("notecraft")
                .filename_suffix("log");
            (dir.clone(), builder)
        }
        (None, None) => return Ok(None),
    };

    std::fs::create_dir_all(&dir).map_err(|e| {
        StorageError::new(StorageErrorKind::DirectoryCreation(format!(
            "{}: {}",
            dir.display(),
            e
        )))
    })?;
    let appender = builder.build(&dir).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "log file in {}: {}",
            dir.display(),
            e
        )))
    })?;
    Ok(Some(appender))
}

/// Installs the global subscriber: human-readable logs on stderr, plus a
/// non-blocking file layer when a log file or directory is configured.
///
/// Keep the returned guard alive until exit; dropping it flushes the file.
pub fn init_logging(options: &LogOptions) -> NotecraftResult<Option<WorkerGuard>> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(options.level.as_deref(), options.verbose, env.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| ConfigError::new(format!("Invalid log filter '{}': {}", directive, e)))?;

    let (file_layer, guard) = match file_appender(options)? {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install logger: {}", e)))?;

    Ok(guard)
}
