//! Identifier types for the transit loop simulator
//!
//! Stops and buses are addressed by their zero-based index into the engine's
//! fixed collections. Runs carry a UUID so that logs and persisted summaries
//! from independent replications can be told apart.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Zero-based index of a stop on the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(pub usize);

impl StopId {
    /// Index into per-stop collections
    pub fn index(self) -> usize {
        self.0
    }

    /// One-based number used in table headers and file names
    pub fn number(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stop {}", self.number())
    }
}

/// Zero-based index of a bus in circulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusId(pub usize);

impl BusId {
    /// Index into per-bus collections
    pub fn index(self) -> usize {
        self.0
    }

    /// One-based number used in table headers
    pub fn number(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bus {}", self.number())
    }
}

/// Unique identifier for a single simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new random run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RUN_{}", self.0.simple())
    }
}

impl Serialize for RunId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("RUN_{}", self.0.simple()))
    }
}

impl<'de> Deserialize<'de> for RunId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let raw = s.strip_prefix("RUN_").unwrap_or(&s);
        let uuid = Uuid::parse_str(raw).map_err(serde::de::Error::custom)?;
        Ok(RunId(uuid))
    }
}
