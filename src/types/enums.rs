//! Enumeration types for the transit loop simulator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How per-minute observations are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated progress table, one row per minute
    #[default]
    Table,
    /// One JSON object per minute (JSON Lines)
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" | "tsv" => Ok(OutputFormat::Table),
            "json" | "jsonl" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_display() {
        assert_eq!(format!("{}", OutputFormat::Table), "table");
        assert_eq!(format!("{}", OutputFormat::Json), "json");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("TSV".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("JSONL".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_serde_lowercase() {
        assert_eq!(serde_json::to_string(&OutputFormat::Json).unwrap(), "\"json\"");
        let parsed: OutputFormat = serde_json::from_str("\"table\"").unwrap();
        assert_eq!(parsed, OutputFormat::Table);
    }
}
