//! Tracing subscriber setup for applications embedding the client.
//!
//! Logs go to stderr or to a log file. File logs are rotated on every
//! initialization (`sealion.log` → `sealion.log.1` → …) and flushed at
//! the end of each line.

use std::fs::{self, File, OpenOptions};
use std::io::{self, LineWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "sealion_client=info,warn";

/// Rotated log files kept next to the active one.
const KEEP_ROTATED: u32 = 3;

/// Line format of emitted logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Where logs are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogTarget {
    #[default]
    Stderr,
    File(PathBuf),
}

/// Default log file location: `<data_dir>/sealion-client/sealion.log`.
pub fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sealion-client")
        .join("sealion.log")
}

/// Install the global tracing subscriber.
///
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init_tracing(format: LogFormat, target: LogTarget) -> io::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = fmt::fmt().with_env_filter(filter).with_target(true);

    let result = match (&target, format) {
        (LogTarget::Stderr, LogFormat::Text) => builder.with_writer(io::stderr).try_init(),
        (LogTarget::Stderr, LogFormat::Json) => builder.json().with_writer(io::stderr).try_init(),
        (LogTarget::File(path), format) => {
            let writer = open_log_file(path, KEEP_ROTATED)?;
            let builder = builder.with_ansi(false).with_writer(writer);
            match format {
                LogFormat::Text => builder.try_init(),
                LogFormat::Json => builder.json().try_init(),
            }
        }
    };
    result.map_err(|e| io::Error::other(format!("tracing already initialized: {e}")))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_target = ?target,
        pid = std::process::id(),
        "=== sealion-client logging started ==="
    );
    Ok(())
}

/// Line-buffered log file; the subscriber locks it once per event.
type LogFile = Mutex<LineWriter<File>>;

/// Shift older generations up by one, then open a fresh `path` for appending.
///
/// `path.{keep}` is dropped. Gaps in the chain are fine.
fn open_log_file(path: &Path, keep: u32) -> io::Result<LogFile> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    if keep > 0 {
        ignore_missing(fs::remove_file(generation(path, keep)))?;
        for n in (1..keep).rev() {
            ignore_missing(fs::rename(generation(path, n), generation(path, n + 1)))?;
        }
        ignore_missing(fs::rename(path, generation(path, 1)))?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Mutex::new(LineWriter::new(file)))
}

/// `sealion.log` → `sealion.log.{n}`.
fn generation(path: &Path, n: u32) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{n}"));
    PathBuf::from(name)
}

fn ignore_missing(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn read(dir: &Path, name: &str) -> String {
        fs::read_to_string(dir.join(name)).unwrap()
    }

    #[test]
    fn test_open_log_file_shifts_generations() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("sealion.log");
        fs::write(&base, "current").unwrap();
        fs::write(dir.path().join("sealion.log.1"), "one").unwrap();
        fs::write(dir.path().join("sealion.log.3"), "oldest").unwrap();

        let _writer = open_log_file(&base, 3).unwrap();

        assert_eq!(read(dir.path(), "sealion.log"), "");
        assert_eq!(read(dir.path(), "sealion.log.1"), "current");
        assert_eq!(read(dir.path(), "sealion.log.2"), "one");
        assert!(!dir.path().join("sealion.log.3").exists());
    }

    #[test]
    fn test_open_log_file_keep_zero_appends_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("sealion.log");
        fs::write(&base, "old\n").unwrap();

        let writer = open_log_file(&base, 0).unwrap();
        writer.lock().unwrap().write_all(b"new\n").unwrap();

        assert_eq!(read(dir.path(), "sealion.log"), "old\nnew\n");
        assert!(!dir.path().join("sealion.log.1").exists());
    }

    #[test]
    fn test_log_file_flushes_complete_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sealion.log");
        let writer = open_log_file(&path, KEEP_ROTATED).unwrap();

        writer.lock().unwrap().write_all(b"line\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "line\n");
    }

    #[test]
    fn test_default_log_path_file_name() {
        assert!(default_log_path().ends_with("sealion-client/sealion.log"));
    }
}
