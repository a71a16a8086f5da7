//! Batch runner for repeated simulations
//!
//! This module contains the BatchRunner that executes the same configuration
//! several times with consecutive seeds and aggregates the per-stop mean waits
//! across runs.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::simulation::{SimulationEngine, SimulationError, SimulationReport, SimulationResult, WaitStatistics};
use crate::types::{SimulationConfig, StopId};

/// Aggregate of one stop's mean wait across runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStopSummary {
    /// Stop identifier
    pub stop: StopId,
    /// Stop display name
    pub name: String,
    /// Runs in which at least one passenger boarded here
    pub runs_with_data: usize,
    /// Passengers served here across all runs
    pub total_served: u64,
    /// Mean of the per-run means, over runs with data
    pub mean_of_means: Option<f64>,
    /// Smallest per-run mean
    pub min_mean: Option<f64>,
    /// Largest per-run mean
    pub max_mean: Option<f64>,
}

impl BatchStopSummary {
    fn new(stop: StopId, name: String) -> Self {
        Self {
            stop,
            name,
            runs_with_data: 0,
            total_served: 0,
            mean_of_means: None,
            min_mean: None,
            max_mean: None,
        }
    }

    fn add_run(&mut self, served: u64, mean: Option<f64>) {
        self.total_served += served;
        let Some(mean) = mean else {
            return;
        };

        let previous = self.mean_of_means.unwrap_or(0.0) * self.runs_with_data as f64;
        self.runs_with_data += 1;
        self.mean_of_means = Some((previous + mean) / self.runs_with_data as f64);
        self.min_mean = Some(self.min_mean.map_or(mean, |m| m.min(mean)));
        self.max_mean = Some(self.max_mean.map_or(mean, |m| m.max(mean)));
    }
}

impl fmt::Display for BatchStopSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.mean_of_means, self.min_mean, self.max_mean) {
            (Some(mean), Some(min), Some(max)) => write!(
                f,
                "The average time waited at {} is {:.2} minutes (per-run range {:.2} to {:.2}, {} runs with data).",
                self.name, mean, min, max, self.runs_with_data
            ),
            _ => write!(
                f,
                "The average time waited at {} is undefined (no data: no passengers were served in any run).",
                self.name
            ),
        }
    }
}

/// Aggregate results of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Runs completed
    pub runs: usize,
    /// Seed of the first run, if seeded
    pub base_seed: Option<u64>,
    /// Passengers served across every run and stop
    pub total_served: u64,
    /// Per-stop aggregates in route order
    pub stops: Vec<BatchStopSummary>,
}

impl BatchSummary {
    /// Create an empty summary for the configured stops
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            runs: 0,
            base_seed: config.seed,
            total_served: 0,
            stops: config
                .stops
                .iter()
                .enumerate()
                .map(|(index, stop)| BatchStopSummary::new(StopId(index), stop.name.clone()))
                .collect(),
        }
    }

    /// Fold one run's statistics into the summary
    pub fn add_run(&mut self, statistics: &WaitStatistics) {
        self.runs += 1;
        self.total_served += statistics.total_served();
        for summary in &mut self.stops {
            summary.add_run(statistics.count_served(summary.stop), statistics.mean_wait(summary.stop));
        }
    }

    /// Human-readable report, one line per stop
    pub fn generate_report(&self) -> String {
        let mut output = format!("Results across {} runs:\n", self.runs);
        for stop in &self.stops {
            output.push_str(&stop.to_string());
            output.push('\n');
        }
        output
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generate_report())
    }
}

/// Executes a configuration `runs` times
#[derive(Debug, Clone)]
pub struct BatchRunner {
    config: SimulationConfig,
}

impl BatchRunner {
    /// Create a batch runner
    ///
    /// # Arguments
    /// * `config` - Simulation configuration; `config.runs` sets the batch size
    ///
    /// # Returns
    /// A runner, or a configuration error if `config` is invalid
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate().map_err(SimulationError::configuration_error)?;
        Ok(Self { config })
    }

    /// Configuration shared by every run
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Seed for run `index`, counting from zero
    ///
    /// Consecutive runs use consecutive seeds. Without a base seed each run
    /// draws its own from entropy.
    pub fn seed_for_run(&self, index: usize) -> Option<u64> {
        self.config.seed.map(|seed| seed.wrapping_add(index as u64))
    }

    /// Run every simulation, handing each report to `on_run` as it finishes
    ///
    /// Reports are not retained, so memory stays flat for large batches.
    #[instrument(skip(self, on_run), fields(runs = self.config.runs))]
    pub fn run_with<F>(&self, mut on_run: F) -> SimulationResult<BatchSummary>
    where
        F: FnMut(usize, &SimulationReport) -> SimulationResult<()>,
    {
        let mut summary = BatchSummary::new(&self.config);

        for index in 0..self.config.runs {
            let config = SimulationConfig { seed: self.seed_for_run(index), ..self.config.clone() };
            let report = SimulationEngine::from_config(config)?.run()?;

            if report.statistics.total_served() == 0 {
                warn!("Run {} served no passengers", index + 1);
            }
            summary.add_run(&report.statistics);
            on_run(index, &report)?;
        }

        info!(
            "Batch completed: {} runs, {} passengers served",
            summary.runs, summary.total_served
        );
        Ok(summary)
    }

    /// Run every simulation and keep all reports
    pub fn run(&self) -> SimulationResult<(Vec<SimulationReport>, BatchSummary)> {
        let mut reports = Vec::with_capacity(self.config.runs);
        let summary = self.run_with(|_, report| {
            reports.push(report.clone());
            Ok(())
        })?;
        Ok((reports, summary))
    }
}
