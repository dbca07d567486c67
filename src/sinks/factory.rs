//! Named construction of configured sinks

use crate::core::error::Result;
use crate::sinks::{FileSink, RotatingFileSink, Sink, StdoutSink};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_true() -> bool {
    true
}

/// Declarative description of a sink, usable from configuration files.
///
/// ```
/// use logkit::sinks::SinkSpec;
///
/// let spec: SinkSpec =
///     serde_json::from_str(r#"{"type":"rotating_file","path":"app.log","max_bytes":1048576}"#)
///         .unwrap();
/// assert!(matches!(spec, SinkSpec::RotatingFile { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkSpec {
    Stdout {
        #[serde(default = "default_true")]
        colors: bool,
    },
    File {
        path: PathBuf,
    },
    RotatingFile {
        path: PathBuf,
        max_bytes: u64,
        #[serde(default)]
        compress: bool,
    },
}

impl SinkSpec {
    pub fn stdout() -> Self {
        SinkSpec::Stdout { colors: true }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        SinkSpec::File { path: path.into() }
    }

    pub fn rotating_file(path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        SinkSpec::RotatingFile {
            path: path.into(),
            max_bytes,
            compress: false,
        }
    }
}

/// Builds configured sink instances from a [`SinkSpec`].
pub struct SinkFactory;

impl SinkFactory {
    /// Materialize a spec into a sink.
    ///
    /// Destination accessibility and thresholds are validated here, so a bad
    /// destination fails construction rather than the first write.
    pub fn create(spec: &SinkSpec) -> Result<Box<dyn Sink>> {
        Ok(match spec {
            SinkSpec::Stdout { colors } => Box::new(StdoutSink::with_colors(*colors)),
            SinkSpec::File { path } => Box::new(FileSink::create(path)?),
            SinkSpec::RotatingFile {
                path,
                max_bytes,
                compress,
            } => Box::new(RotatingFileSink::create(path, *max_bytes)?.with_compression(*compress)),
        })
    }
}
