//! Size-triggered rotating file sink
//!
//! Writes into sequence-numbered files; once a write would push the current
//! file past the size threshold, the file is closed and a new one opened.
//! Closed files can optionally be gzip-compressed.

use crate::core::{error::LoggerError, error::Result, log_level::LogLevel};
use crate::sinks::file::open_append;
use crate::sinks::Sink;
use chrono::Utc;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Sink rotating its file once a byte-size threshold is reached.
///
/// File names embed a UTC timestamp and a monotonically increasing sequence:
/// `app.log` becomes `app-20250108103045-1.log`, `app-...-2.log`, and so on.
/// The rotation check and the file switch happen inside a single `write`
/// call; the sink owns its handle exclusively, so no interleaved writer can
/// observe a half-rotated state.
pub struct RotatingFileSink {
    base_path: PathBuf,
    max_bytes: u64,
    compress: bool,
    seq: u64,
    current_size: u64,
    current_path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl RotatingFileSink {
    /// Create a rotating sink.
    ///
    /// # Errors
    ///
    /// Fails if `max_bytes` is zero or the first file cannot be opened.
    pub fn create<P: AsRef<Path>>(base_path: P, max_bytes: u64) -> Result<Self> {
        if max_bytes == 0 {
            return Err(LoggerError::config(
                "RotatingFileSink",
                "max_bytes must be positive",
            ));
        }

        let mut sink = Self {
            base_path: base_path.as_ref().to_path_buf(),
            max_bytes,
            compress: false,
            seq: 0,
            current_size: 0,
            current_path: PathBuf::new(),
            writer: None,
        };
        sink.open_next_file()?;
        Ok(sink)
    }

    /// Gzip files as they are rotated out.
    #[must_use]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    fn next_path(&mut self) -> PathBuf {
        self.seq += 1;
        let stem = self
            .base_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("app");
        let ext = self
            .base_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("log");
        let stamp = Utc::now().format("%Y%m%d%H%M%S");
        self.base_path
            .with_file_name(format!("{}-{}-{}.{}", stem, stamp, self.seq, ext))
    }

    fn open_next_file(&mut self) -> Result<()> {
        let path = self.next_path();
        let file = open_append(&path)?;
        self.writer = Some(BufWriter::new(file));
        self.current_path = path;
        self.current_size = 0;
        Ok(())
    }

    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::rotation(
                    self.current_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        if self.compress {
            // Best effort; an uncompressed rotated file is still a valid log
            if let Err(e) = compress_file(&self.current_path) {
                eprintln!(
                    "[logkit] failed to compress rotated file {}: {}",
                    self.current_path.display(),
                    e
                );
            }
        }

        self.open_next_file()
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Number of files opened so far.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.seq
    }
}

impl Sink for RotatingFileSink {
    fn write(&mut self, _level: LogLevel, line: &str) -> Result<()> {
        let bytes = line.len() as u64;

        if self.current_size > 0 && self.current_size + bytes > self.max_bytes {
            if let Err(e) = self.rotate() {
                eprintln!("[logkit] rotation failed: {}. Continuing with current file.", e);
                if self.writer.is_none() {
                    let file = open_append(&self.current_path)?;
                    self.writer = Some(BufWriter::new(file));
                }
                // Allow the file to grow past the limit rather than retry
                // rotation on every write
                self.current_size = 0;
            }
        }

        let writer = self.writer.as_mut().ok_or_else(|| {
            LoggerError::sink(self.current_path.display().to_string(), "Writer closed")
        })?;
        writer.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::sink(
                self.current_path.display().to_string(),
                format!("Failed to write log line: {}", e),
            )
        })?;
        self.current_size += bytes;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::sink(
                    self.current_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rotating_file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

/// Gzip `path` into `path.gz` via a temp file, then remove the original.
///
/// The original is only deleted once compression fully succeeded, so a
/// failure mid-way never loses log data.
fn compress_file(path: &Path) -> Result<()> {
    // Append to the full name so "app-...-1.txt" becomes "app-...-1.txt.gz"
    let mut gz_name = path.as_os_str().to_os_string();
    gz_name.push(".gz");
    let gz_path = PathBuf::from(&gz_name);
    gz_name.push(".tmp");
    let tmp_path = PathBuf::from(gz_name);

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress rotated file",
            format!("Failed to open '{}'", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&tmp_path).map_err(|e| {
        LoggerError::io_operation(
            "compress rotated file",
            format!("Failed to create '{}'", tmp_path.display()),
            e,
        )
    })?;
    let mut encoder =
        flate2::write::GzEncoder::new(BufWriter::new(output), flate2::Compression::default());

    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buffer).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            LoggerError::io_operation(
                "compress rotated file",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        if n == 0 {
            break;
        }
        encoder.write_all(&buffer[..n]).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            LoggerError::io_operation("compress rotated file", "Failed to compress chunk", e)
        })?;
    }
    encoder.finish().map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        LoggerError::io_operation("compress rotated file", "Failed to finish compression", e)
    })?;

    fs::rename(&tmp_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        LoggerError::io_operation(
            "compress rotated file",
            format!("Failed to rename to '{}'", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[logkit] compression succeeded but original {} could not be removed: {}",
            path.display(),
            e
        );
    }
    Ok(())
}
