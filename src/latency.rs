//! Simulated tape hardware latency.
//!
//! Every single-element access pays a read/write delay followed by a shift
//! delay; opening a run for merge reading pays one rewind delay. The delays
//! are real blocking sleeps.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::{Result, TapeSortError};
use crate::stats::{TapeStats, TapeStatsTracker};

/// Delay amounts, read from a JSON object of integer seconds.
///
/// ```
/// use tape_sort::LatencyConfig;
/// use std::time::Duration;
///
/// let config = LatencyConfig::from_json_str(r#"{"rewind_latency": 2}"#).unwrap();
/// assert_eq!(config.rewind, Duration::from_secs(2));
/// assert_eq!(config.read_write, Duration::ZERO);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    #[serde(rename = "read_write_latency", deserialize_with = "seconds")]
    pub read_write: Duration,
    #[serde(rename = "rewind_latency", deserialize_with = "seconds")]
    pub rewind: Duration,
    #[serde(rename = "shift_latency", deserialize_with = "seconds")]
    pub shift: Duration,
}

fn seconds<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

impl LatencyConfig {
    pub fn new(read_write: Duration, rewind: Duration, shift: Duration) -> Self {
        Self {
            read_write,
            rewind,
            shift,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(TapeSortError::resource(format!(
            "config file {}",
            path.display()
        )))?;
        Self::parse(BufReader::new(file), &path.display().to_string())
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Self::parse(reader, "<reader>")
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::parse(json.as_bytes(), "<string>")
    }

    fn parse(reader: impl Read, origin: &str) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| TapeSortError::InvalidConfig {
            path: origin.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Which way an element moved across the tape head.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// A frozen [`LatencyConfig`] plus counters for every delay applied.
///
/// There is no way to change the config after construction; a sort
/// invocation builds one of these up front and shares it by reference.
#[derive(Debug, Default)]
pub struct LatencyModel {
    config: LatencyConfig,
    tracker: TapeStatsTracker,
}

impl LatencyModel {
    pub fn new(config: LatencyConfig) -> Self {
        Self {
            config,
            tracker: TapeStatsTracker::new(),
        }
    }

    pub fn config(&self) -> &LatencyConfig {
        &self.config
    }

    pub fn stats(&self) -> TapeStats {
        self.tracker.snapshot()
    }

    pub fn apply_read_write_delay(&self, access: Access) {
        match access {
            Access::Read => self.tracker.record_read(),
            Access::Write => self.tracker.record_write(),
        }
        self.pause(self.config.read_write);
    }

    pub fn apply_shift_delay(&self) {
        self.tracker.record_shift();
        self.pause(self.config.shift);
    }

    pub fn apply_rewind_delay(&self) {
        self.tracker.record_rewind();
        self.pause(self.config.rewind);
    }

    fn pause(&self, delay: Duration) {
        if delay.is_zero() {
            return;
        }
        self.tracker.record_delay(delay);
        thread::sleep(delay);
    }
}
