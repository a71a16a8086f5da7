//! Wait-sample persistence
//!
//! A run directory holds `all-data.csv` with every wait sample, one
//! `data{N}.csv` per stop (N is the 1-based stop number), and `summary.json`
//! with the run's metadata and per-stop results. Sample files contain one
//! integer per line in recording order, with no header.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::simulation::{BatchSummary, SimulationReport, SimulationResult};
use crate::types::StopId;

/// Pooled samples across all stops
pub const ALL_SAMPLES_FILE: &str = "all-data.csv";

/// Run metadata and per-stop results
pub const SUMMARY_FILE: &str = "summary.json";

/// Aggregate results of a batch
pub const BATCH_SUMMARY_FILE: &str = "batch-summary.json";

/// File name holding one stop's samples
pub fn stop_samples_file_name(stop: StopId) -> String {
    format!("data{}.csv", stop.number())
}

/// Subdirectory for run `index` of a batch
pub fn run_directory_name(index: usize) -> String {
    format!("run-{:03}", index + 1)
}

/// Read a sample file back into memory
pub fn read_samples<P: AsRef<Path>>(path: P) -> SimulationResult<Vec<u32>> {
    let reader = BufReader::new(File::open(path)?);
    let mut samples = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = trimmed
            .parse::<u32>()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        samples.push(value);
    }
    Ok(samples)
}

/// Writes run results into a directory
#[derive(Debug, Clone)]
pub struct SampleWriter {
    directory: PathBuf,
}

impl SampleWriter {
    /// Create a writer targeting `directory`; nothing is created until a write
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self { directory: directory.as_ref().to_path_buf() }
    }

    /// Target directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Writer for run `index` of a batch, nested under this directory
    pub fn for_run(&self, index: usize) -> Self {
        Self::new(self.directory.join(run_directory_name(index)))
    }

    /// Write every sample file and the summary for `report`
    ///
    /// Returns the paths written, pooled samples first.
    pub fn write_report(&self, report: &SimulationReport) -> SimulationResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.directory)?;
        let mut written = Vec::with_capacity(report.wait_samples_by_stop().len() + 2);

        let path = self.directory.join(ALL_SAMPLES_FILE);
        write_samples(&path, report.all_wait_samples())?;
        written.push(path);

        for (index, samples) in report.wait_samples_by_stop().iter().enumerate() {
            let path = self.directory.join(stop_samples_file_name(StopId(index)));
            write_samples(&path, samples)?;
            written.push(path);
        }

        let path = self.directory.join(SUMMARY_FILE);
        write_json(&path, &report.summary())?;
        written.push(path);

        info!("Wrote {} output files to {}", written.len(), self.directory.display());
        Ok(written)
    }

    /// Write the aggregate summary of a batch
    pub fn write_batch_summary(&self, summary: &BatchSummary) -> SimulationResult<PathBuf> {
        fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(BATCH_SUMMARY_FILE);
        write_json(&path, summary)?;
        Ok(path)
    }
}

fn write_samples(path: &Path, samples: &[u32]) -> SimulationResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for sample in samples {
        writeln!(writer, "{}", sample)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), samples = samples.len(), "Wrote sample file");
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> SimulationResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
