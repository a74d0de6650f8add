use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::eyre::WrapErr;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the log file inside the log directory
pub const LOG_FILE_NAME: &str = "sweepgen.log";
/// Maximum log file size before rotation (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Size to keep after rotation (1 MB of most recent logs)
const KEEP_SIZE: u64 = 1024 * 1024;

/// Truncate the log to its most recent `keep_size` bytes once it grows past
/// `max_size`. The kept tail starts at a line boundary.
///
/// Returns the number of bytes dropped, zero when nothing was rotated.
fn rotate_log_if_needed(log_path: &Path, max_size: u64, keep_size: u64) -> io::Result<u64> {
    let len = match fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };
    if len <= max_size {
        return Ok(0);
    }

    let start = len.saturating_sub(keep_size);
    let mut tail = Vec::with_capacity(keep_size as usize);
    {
        let mut file = File::open(log_path)?;
        file.seek(SeekFrom::Start(start))?;
        file.read_to_end(&mut tail)?;
    }

    let skip = match tail.iter().position(|&b| b == b'\n') {
        Some(i) => i + 1,
        None => 0,
    };

    let mut file = File::create(log_path)?;
    writeln!(file, "--- {LOG_FILE_NAME} rotated, {} bytes dropped ---", start + skip as u64)?;
    file.write_all(&tail[skip..])?;

    Ok(start + skip as u64)
}

/// Open `{log_dir}/sweepgen.log` for appending, trimming it first when it has
/// grown past `MAX_LOG_SIZE`. Also returns the path and the bytes dropped.
fn open_log_file(log_dir: &Path) -> io::Result<(File, PathBuf, u64)> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(LOG_FILE_NAME);

    let dropped = rotate_log_if_needed(&path, MAX_LOG_SIZE, KEEP_SIZE).unwrap_or_else(|e| {
        eprintln!("warning: failed to rotate {}: {e}", path.display());
        0
    });

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path, dropped))
}

/// Send `sweepgen` and `sweepgen_core` events to `{log_dir}/sweepgen.log`.
///
/// `RUST_LOG` takes precedence over `level`. Stdout stays free for the run
/// summary.
pub fn init_logging(log_dir: &Path, level: &str) -> color_eyre::Result<()> {
    let (file, log_path, rotated) = open_log_file(log_dir)
        .wrap_err_with(|| format!("failed to open log file in {}", log_dir.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sweepgen={level},sweepgen_core={level}")));

    // Batch files may be written from rayon workers; they share one handle
    let file_layer = fmt::layer().with_writer(Mutex::new(file)).with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    tracing::info!(log_path = %log_path.display(), level, "logging initialized");
    if rotated > 0 {
        tracing::debug!(dropped_bytes = rotated, "rotated log file");
    }
    Ok(())
}
