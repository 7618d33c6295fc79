//! Tracing setup. Runs log to a file under the XDG state dir so daemon
//! polling noise stays out of the terminal; stderr is the fallback when
//! that directory cannot be used.

use anyhow::Result;
use std::fs;
use std::io;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,bvmirror=debug";

/// Per-event writer handle: a clone of the log file, or stderr when the
/// clone fails mid-run.
enum LogTarget {
    File(fs::File),
    Stderr,
}

impl io::Write for LogTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogTarget::File(f) => f.write(buf),
            LogTarget::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogTarget::File(f) => f.flush(),
            LogTarget::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct LogFileWriter(fs::File);

impl<'a> MakeWriter<'a> for LogFileWriter {
    type Writer = LogTarget;

    fn make_writer(&'a self) -> Self::Writer {
        match self.0.try_clone() {
            Ok(f) => LogTarget::File(f),
            Err(_) => LogTarget::Stderr,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to `~/.local/state/bvmirror/bvmirror.log`, appending across runs.
/// Errors (unwritable state dir, open failure) are returned so the caller
/// can pick [`init_logging_stderr`] instead.
pub fn init_logging() -> Result<()> {
    let log_dir = xdg::BaseDirectories::with_prefix("bvmirror")?
        .get_state_home()
        .join("bvmirror");
    fs::create_dir_all(&log_dir)?;
    let path = log_dir.join("bvmirror.log");

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(BoxMakeWriter::new(LogFileWriter(file)))
        .with_ansi(false)
        .init();

    tracing::info!("logging to {}", path.display());
    Ok(())
}

/// Stderr-only logging, for when the log file cannot be opened.
pub fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}
