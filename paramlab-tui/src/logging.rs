//! File logging. The terminal belongs to the UI, so nothing is written to
//! stdout or stderr once the alternate screen is up.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE: &str = "paramlab.log";

/// Maximum log file size before trimming (5 MB).
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Tail kept after trimming (1 MB).
const KEEP_SIZE: u64 = 1024 * 1024;

/// Trim the log to its most recent `KEEP_SIZE` bytes once it passes
/// `MAX_LOG_SIZE`, starting on a line boundary.
fn trim_log_if_needed(log_path: &Path) -> std::io::Result<()> {
    let Ok(metadata) = fs::metadata(log_path) else {
        return Ok(());
    };
    if metadata.len() <= MAX_LOG_SIZE {
        return Ok(());
    }

    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::Start(metadata.len().saturating_sub(KEEP_SIZE)))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    drop(file);

    let skip = buffer
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut file = File::create(log_path)?;
    file.write_all(b"--- log trimmed ---\n")?;
    file.write_all(&buffer[skip..])?;
    Ok(())
}

/// Start logging to `{dir}/paramlab.log`.
///
/// `RUST_LOG` overrides the default filter. Keep the returned guard alive for
/// the life of the program; dropping it flushes pending lines.
pub fn init_logging(dir: &Path) -> anyhow::Result<WorkerGuard> {
    fs::create_dir_all(dir)?;
    let log_path = dir.join(LOG_FILE);
    if let Err(e) = trim_log_if_needed(&log_path) {
        eprintln!("warning: could not trim {}: {e}", log_path.display());
    }

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("paramlab_tui=info,paramlab_runner=info,paramlab_core=warn")
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    tracing::info!(log_path = %log_path.display(), "logging initialized");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_log_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        fs::write(&path, "line one\nline two\n").unwrap();
        trim_log_if_needed(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "line one\nline two\n");
    }

    #[test]
    fn oversized_log_keeps_whole_lines_from_the_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        let line = "x".repeat(99) + "\n";
        let body = line.repeat((MAX_LOG_SIZE / 100 + 10) as usize);
        fs::write(&path, &body).unwrap();

        trim_log_if_needed(&path).unwrap();
        let trimmed = fs::read_to_string(&path).unwrap();
        assert!(trimmed.starts_with("--- log trimmed ---\n"));
        assert!(trimmed.len() as u64 <= KEEP_SIZE + 32);
        assert!(trimmed.lines().skip(1).all(|l| l.len() == 99));
    }

    #[test]
    fn missing_log_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        trim_log_if_needed(&dir.path().join(LOG_FILE)).unwrap();
    }
}
