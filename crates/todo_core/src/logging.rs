//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Start rolling file logs once per process.
//! - Flush buffered records before a short-lived process exits.
//! - Install a panic hook that records a sanitised panic summary.
//!
//! # Invariants
//! - `init_logging` is idempotent for the same level and directory.
//! - A second call with a different level or directory is rejected.
//! - Initialisation never panics.
//! - Log lines are `key=value` metadata; task titles and descriptions are
//!   never written.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "todo";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_SUMMARY_MAX_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    level: &'static str,
    dir: PathBuf,
    handle: LoggerHandle,
}

impl ActiveLogger {
    fn check_same(&self, level: &'static str, dir: &Path) -> Result<(), String> {
        if self.dir != dir {
            return Err(format!(
                "logging already initialized at `{}`; refusing to switch to `{}`",
                self.dir.display(),
                dir.display()
            ));
        }
        if self.level != level {
            return Err(format!(
                "logging already initialized with level `{}`; refusing to switch to `{level}`",
                self.level
            ));
        }
        Ok(())
    }
}

/// Starts file logging under `log_dir` at `level`.
///
/// Errors are also duplicated to stderr. Records are buffered; call
/// [`flush_logging`] before the process exits.
///
/// # Errors
/// - Unsupported `level`.
/// - Empty or relative `log_dir`, or a directory that cannot be created.
/// - Conflicting re-initialisation.
/// - Logger backend start-up failure.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = parse_level(level)?;
    let dir = parse_log_dir(log_dir)?;

    if let Some(active) = ACTIVE.get() {
        return active.check_same(level, &dir);
    }

    let active = ACTIVE.get_or_try_init(|| start_logger(level, &dir))?;
    active.check_same(level, &dir)
}

/// Returns `(level, log_dir)` once logging is active.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE.get().map(|active| (active.level, active.dir.clone()))
}

/// Writes buffered log records to disk. No-op before `init_logging`.
pub fn flush_logging() {
    if let Some(active) = ACTIVE.get() {
        active.handle.flush();
    }
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: &'static str, dir: &Path) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(dir)
        .map_err(|err| format!("failed to create log directory `{}`: {err}", dir.display()))?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_BASENAME))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .duplicate_to_stderr(Duplicate::Error)
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook();

    info!(
        "event=logging_init module=core status=ok version={} level={level} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        dir.display()
    );

    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        handle,
    })
}

fn parse_level(level: &str) -> Result<&'static str, String> {
    let normalized = level.trim().to_ascii_lowercase();
    let level = match normalized.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => {
            return Err(format!(
                "unsupported log level `{normalized}`; expected trace|debug|info|warn|error"
            ))
        }
    };
    Ok(level)
}

fn parse_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = PathBuf::from(trimmed);
    if !path.is_absolute() {
        return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path)
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic_captured module=core status=error location={location} payload={}",
            one_line(&payload, PANIC_SUMMARY_MAX_CHARS)
        );
        flush_logging();
        previous(info);
    }));
}

fn one_line(value: &str, max_chars: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut truncated: String = flat.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::{
        flush_logging, init_logging, logging_status, one_line, parse_level, parse_log_dir,
    };

    #[test]
    fn parse_level_accepts_aliases() {
        assert_eq!(parse_level(" WARNING ").unwrap(), "warn");
        assert_eq!(parse_level("Info").unwrap(), "info");
        assert!(parse_level("verbose").unwrap_err().contains("unsupported"));
    }

    #[test]
    fn parse_log_dir_requires_absolute_path() {
        assert!(parse_log_dir("").is_err());
        assert!(parse_log_dir("logs").unwrap_err().contains("absolute"));
    }

    #[test]
    fn one_line_flattens_and_truncates() {
        assert_eq!(one_line("a\nb", 10), "a b");
        assert_eq!(one_line("abcdefgh", 3), "abc...");
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();
        let other_str = other.path().to_str().unwrap();

        init_logging("info", dir_str).unwrap();
        init_logging("INFO", dir_str).unwrap();

        let level_err = init_logging("debug", dir_str).unwrap_err();
        assert!(level_err.contains("refusing to switch"));
        let dir_err = init_logging("info", other_str).unwrap_err();
        assert!(dir_err.contains("refusing to switch"));

        let (level, active_dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(active_dir, dir.path().to_path_buf());

        log::info!("event=flush_check module=test status=ok");
        flush_logging();
        let written: String = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| std::fs::read_to_string(entry.unwrap().path()).unwrap())
            .collect();
        assert!(written.contains("event=logging_init"), "log file: {written}");
        assert!(written.contains("event=flush_check"), "log file: {written}");
    }
}
