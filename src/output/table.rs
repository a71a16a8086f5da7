//! Observation table rendering
//!
//! The table format is tab-separated with a trailing tab after every column,
//! one row per simulated minute. The header keeps a space between `Time` and
//! its tab. The JSON format writes one observation object
//! per line and has no header.

use std::io::Write;

use crate::simulation::{Observation, SimulationResult};
use crate::types::{BusId, OutputFormat, SimulationConfig, StopId};

/// Writes observations in the configured format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationTable {
    format: OutputFormat,
    num_stops: usize,
    num_buses: usize,
}

impl ObservationTable {
    /// Create a table for a loop of `num_stops` stops and `num_buses` buses
    pub fn new(format: OutputFormat, num_stops: usize, num_buses: usize) -> Self {
        Self { format, num_stops, num_buses }
    }

    /// Create a table matching a simulation configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.output_format, config.num_stops(), config.num_buses)
    }

    /// Output format in use
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Header line, without the newline
    pub fn header(&self) -> String {
        let mut line = String::from("Time \t");
        for index in 0..self.num_stops {
            line.push_str(&format!("{}\t", StopId(index)));
        }
        for index in 0..self.num_buses {
            line.push_str(&format!("{}\t", BusId(index)));
        }
        line
    }

    /// One table row, without the newline
    pub fn format_row(&self, observation: &Observation) -> String {
        let mut line = format!("{}\t", observation.time);
        for value in observation.waiting.iter().chain(&observation.occupancy) {
            line.push_str(&format!("{}\t", value));
        }
        line
    }

    /// Write the header, if the format has one
    pub fn write_header<W: Write>(&self, writer: &mut W) -> SimulationResult<()> {
        if self.format == OutputFormat::Table {
            writeln!(writer, "{}", self.header())?;
        }
        Ok(())
    }

    /// Write one observation
    pub fn write_row<W: Write>(&self, writer: &mut W, observation: &Observation) -> SimulationResult<()> {
        match self.format {
            OutputFormat::Table => writeln!(writer, "{}", self.format_row(observation))?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *writer, observation)?;
                writeln!(writer)?;
            }
        }
        Ok(())
    }

    /// Write the header followed by every observation
    pub fn write_all<W: Write>(&self, writer: &mut W, observations: &[Observation]) -> SimulationResult<()> {
        self.write_header(writer)?;
        for observation in observations {
            self.write_row(writer, observation)?;
        }
        writer.flush()?;
        Ok(())
    }
}
