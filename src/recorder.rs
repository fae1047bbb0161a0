//! Order Recorder
//!
//! Completed orders are appended to a JSON log holding a single array of
//! records. Each append reads the whole log, adds the new record and rewrites
//! the file. A log that cannot be read as a list of orders is replaced by a
//! new one; nothing locks the file, so two kiosks sharing a log can lose
//! each other's orders.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;
use tracing::{debug, warn};

use crate::orders::OrderRecord;

/// Default order log location, relative to the working directory.
pub const DEFAULT_ORDERS_FILE: &str = "pizza_orders.json";

/// Errors raised while persisting orders.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The log exists but could not be read.
    #[error("failed to read order log {path}: {source}")]
    Read {
        /// Log path
        path: PathBuf,
        /// Underlying IO error
        source: io::Error,
    },

    /// The log could not be written.
    #[error("failed to write order log {path}: {source}")]
    Write {
        /// Log path
        path: PathBuf,
        /// Underlying IO error
        source: io::Error,
    },

    /// The records could not be serialised.
    #[error("failed to serialise order log: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Somewhere completed orders are kept.
pub trait OrderRecorder {
    /// Persist a completed order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order could not be stored.
    fn record(&mut self, record: OrderRecord) -> Result<(), RecorderError>;
}

impl OrderRecorder for Vec<OrderRecord> {
    fn record(&mut self, record: OrderRecord) -> Result<(), RecorderError> {
        self.push(record);

        Ok(())
    }
}

/// Order log kept as an indented JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileRecorder {
    path: PathBuf,
}

impl Default for JsonFileRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_ORDERS_FILE)
    }
}

impl JsonFileRecorder {
    /// Create a recorder for the log at `path`. The file is created on the
    /// first order if it does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every order in the log.
    ///
    /// A missing log is empty. So is a log whose contents are not a list of
    /// orders; that content is dropped on the next append.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Read`] if the log exists but cannot be read.
    pub fn load(&self) -> Result<Vec<OrderRecord>, RecorderError> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "order log not found; starting a new log");

                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(RecorderError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match serde_json::from_slice(&contents) {
            Ok(records) => Ok(records),
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    %error,
                    "order log is not a list of orders; discarding its contents"
                );

                Ok(Vec::new())
            }
        }
    }

    fn write(&self, records: &[OrderRecord]) -> Result<(), RecorderError> {
        let mut contents = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut contents, formatter);

        records.serialize(&mut serializer)?;

        fs::write(&self.path, contents).map_err(|source| RecorderError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl OrderRecorder for JsonFileRecorder {
    fn record(&mut self, record: OrderRecord) -> Result<(), RecorderError> {
        let mut records = self.load()?;

        records.push(record);
        self.write(&records)?;

        debug!(path = %self.path.display(), orders = records.len(), "order log written");

        Ok(())
    }
}
