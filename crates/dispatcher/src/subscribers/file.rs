//! FileSubscriber - appends stream events to a text file

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{SecondsFormat, Utc};
use contracts::{Subscriber, SubscriberError};
use tracing::debug;

/// Configuration for FileSubscriber
#[derive(Debug, Clone)]
pub struct FileSubscriberConfig {
    /// Output file
    pub path: PathBuf,
    /// Truncate instead of appending when opening
    pub truncate: bool,
}

impl FileSubscriberConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> std::io::Result<Self> {
        let path = params
            .get("path")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "missing 'path' param")
            })?;
        let truncate = params
            .get("truncate")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));

        Ok(Self { path, truncate })
    }
}

/// Subscriber that writes one line per event
///
/// Stream starts are written as `# begin <rfc3339 timestamp>`, messages verbatim.
pub struct FileSubscriber {
    name: String,
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileSubscriber {
    /// Create a new FileSubscriber, creating parent directories as needed
    pub fn new(name: impl Into<String>, config: FileSubscriberConfig) -> std::io::Result<Self> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(!config.truncate)
            .truncate(config.truncate)
            .open(&config.path)?;

        let name = name.into();
        debug!(subscriber = %name, path = %config.path.display(), "FileSubscriber opened");

        Ok(Self {
            name,
            path: config.path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let config = FileSubscriberConfig::from_params(params)?;
        Self::new(name, config)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, line: &str) -> Result<(), SubscriberError> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

impl Subscriber for FileSubscriber {
    fn on_begin(&self) -> Result<(), SubscriberError> {
        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.write_line(&format!("# begin {ts}"))
    }

    fn on_message(&self, text: &str) -> Result<(), SubscriberError> {
        self.write_line(text)
    }
}
