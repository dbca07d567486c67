//! Plain file sink implementation

use crate::core::{error::LoggerError, error::Result, log_level::LogLevel};
use crate::sinks::Sink;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Sink appending to a single file.
///
/// The destination is opened at construction; an unreachable path fails
/// `create` rather than the first write.
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = open_append(&path)?;
        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Open a file for appending, creating parent directories as needed.
pub(crate) fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LoggerError::sink(
                path.display().to_string(),
                format!("Failed to open: {}", e),
            )
        })
}

impl Sink for FileSink {
    fn write(&mut self, _level: LogLevel, line: &str) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::sink(self.path.display().to_string(), "Writer closed"))?;
        writer.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::sink(
                self.path.display().to_string(),
                format!("Failed to write log line: {}", e),
            )
        })?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::sink(
                    self.path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure buffered data reaches disk
        let _ = self.flush();
    }
}
