//! Minute-by-minute simulation engine
//!
//! The engine exclusively owns the stops, the buses and the clock. Each tick it
//! polls every stop's arrival process, then every bus's schedule, resolving
//! any due visit through the exchange policy before emitting an
//! [`Observation`]. Ticks run from minute 1 through `simulation_length`
//! inclusive; after the last tick the engine is finished and all statistics
//! are pure reductions over recorded samples.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::simulation::{SimulationError, SimulationResult, StopWaitSummary, WaitStatistics};
use crate::transit::{Bus, BusScheduleClock, ExchangePolicy, RandomArrivalProcess, Stop};
use crate::types::{BusId, RunId, SimulationConfig, StopId};
use crate::{perf_span, sim_event};

/// State of the loop at the end of one minute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Minute the observation was taken
    pub time: u32,
    /// Passengers waiting at each stop, in route order
    pub waiting: Vec<u32>,
    /// Riders aboard each bus
    pub occupancy: Vec<u32>,
}

/// Everything a finished run hands to its collaborators
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Identifier of the run
    pub run_id: RunId,
    /// Seed the generator was created from, if known
    pub seed: Option<u64>,
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Wall-clock end of the run
    pub finished_at: DateTime<Utc>,
    /// Configuration the run used
    pub config: SimulationConfig,
    /// One observation per simulated minute
    pub observations: Vec<Observation>,
    /// Bus visits resolved during the run
    pub total_visits: u64,
    /// Wait samples and their reductions
    pub statistics: WaitStatistics,
}

impl SimulationReport {
    /// Wait samples for each stop, chronological
    pub fn wait_samples_by_stop(&self) -> &[Vec<u32>] {
        self.statistics.samples_by_stop()
    }

    /// Every wait sample, chronological
    pub fn all_wait_samples(&self) -> &[u32] {
        self.statistics.all_samples()
    }

    /// Serializable digest of the run
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.run_id,
            seed: self.seed,
            started_at: self.started_at,
            finished_at: self.finished_at,
            config: self.config.clone(),
            total_visits: self.total_visits,
            total_served: self.statistics.total_served(),
            overall_mean_wait: self.statistics.overall_mean_wait(),
            max_wait: self.statistics.max_wait(),
            stops: self.statistics.stop_summaries(),
        }
    }
}

/// Persistable digest of a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Identifier of the run
    pub run_id: RunId,
    /// Seed the generator was created from, if known
    pub seed: Option<u64>,
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Wall-clock end of the run
    pub finished_at: DateTime<Utc>,
    /// Configuration the run used
    pub config: SimulationConfig,
    /// Bus visits resolved
    pub total_visits: u64,
    /// Passengers served across all stops
    pub total_served: u64,
    /// Mean wait across every served passenger
    pub overall_mean_wait: Option<f64>,
    /// Longest single wait
    pub max_wait: Option<u32>,
    /// Per-stop results
    pub stops: Vec<StopWaitSummary>,
}

/// Discrete-time engine for one run of the loop
#[derive(Debug)]
pub struct SimulationEngine<R = StdRng> {
    run_id: RunId,
    seed: Option<u64>,
    config: SimulationConfig,
    stops: Vec<Stop>,
    buses: Vec<Bus>,
    arrivals: RandomArrivalProcess,
    schedule: BusScheduleClock,
    policy: ExchangePolicy,
    statistics: WaitStatistics,
    time: u32,
    total_visits: u64,
    started_at: DateTime<Utc>,
    rng: R,
}

impl SimulationEngine<StdRng> {
    /// Create an engine seeded from the configuration
    ///
    /// Without a configured seed one is drawn from entropy and recorded, so
    /// every run can be replayed.
    pub fn from_config(config: SimulationConfig) -> SimulationResult<Self> {
        let seed = match config.seed {
            Some(seed) => {
                info!("Using deterministic seed: {}", seed);
                seed
            }
            None => {
                let seed = rand::thread_rng().gen();
                info!("Using entropy-derived seed: {}", seed);
                seed
            }
        };
        Self::with_seed(config, seed)
    }

    /// Create an engine with an explicit seed, ignoring `config.seed`
    pub fn with_seed(config: SimulationConfig, seed: u64) -> SimulationResult<Self> {
        let mut engine = Self::new(config, StdRng::seed_from_u64(seed))?;
        engine.seed = Some(seed);
        Ok(engine)
    }
}

impl<R: Rng> SimulationEngine<R> {
    /// Create an engine drawing from `rng`
    ///
    /// Fails if the configuration is invalid. Initial arrival marks are drawn
    /// here, in stop order.
    #[instrument(skip(config, rng), fields(stops = config.num_stops(), buses = config.num_buses))]
    pub fn new(config: SimulationConfig, mut rng: R) -> SimulationResult<Self> {
        config.validate().map_err(SimulationError::configuration_error)?;

        let stops = config
            .stops
            .iter()
            .enumerate()
            .map(|(index, stop)| Stop::new(StopId(index), stop.name.clone()))
            .collect();
        let buses = (0..config.num_buses).map(|index| Bus::new(BusId(index), config.capacity)).collect();
        let arrivals = RandomArrivalProcess::from_stops(&config.stops, &mut rng)?;
        let schedule = BusScheduleClock::from_config(&config);
        let policy = ExchangePolicy::from_config(&config);
        let statistics =
            WaitStatistics::new(config.stops.iter().map(|stop| stop.name.clone()).collect());

        let run_id = RunId::new();
        debug!(%run_id, "Simulation engine initialized");

        Ok(Self {
            run_id,
            seed: None,
            config,
            stops,
            buses,
            arrivals,
            schedule,
            policy,
            statistics,
            time: 1,
            total_visits: 0,
            started_at: Utc::now(),
            rng,
        })
    }

    /// Identifier of this run
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Configuration in use
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Minute the next tick will simulate
    pub fn current_time(&self) -> u32 {
        self.time
    }

    /// Whether every minute has been simulated
    pub fn is_finished(&self) -> bool {
        self.time > self.config.simulation_length
    }

    /// Stops in route order
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Buses in index order
    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    /// Statistics collected so far
    pub fn statistics(&self) -> &WaitStatistics {
        &self.statistics
    }

    /// Schedule clock driving the buses
    pub fn schedule(&self) -> &BusScheduleClock {
        &self.schedule
    }

    /// Current state of the loop
    pub fn observe(&self) -> Observation {
        Observation {
            time: self.time,
            waiting: self.stops.iter().map(Stop::waiting).collect(),
            occupancy: self.buses.iter().map(Bus::occupancy).collect(),
        }
    }

    /// Simulate one minute
    ///
    /// Returns `None` once the run is finished.
    pub fn step(&mut self) -> SimulationResult<Option<Observation>> {
        if self.is_finished() {
            return Ok(None);
        }
        let time = self.time;

        for stop in &mut self.stops {
            if self.arrivals.next(stop.id(), time, &mut self.rng) {
                stop.arrive(time);
            }
        }

        for bus in &mut self.buses {
            let Some(visit) = self.schedule.poll(bus, time) else {
                continue;
            };
            let stop = &mut self.stops[visit.stop.index()];
            let outcome = self.policy.resolve(bus, stop, visit, &mut self.rng)?;

            sim_event!(
                debug,
                "bus visit",
                time = time,
                bus = visit.bus.index(),
                stop = visit.stop.index(),
                alighting = outcome.alighting,
                boarded = outcome.boarded,
                occupancy = bus.occupancy(),
                left_waiting = stop.waiting(),
            );

            self.statistics.record_all(&outcome.wait_samples);
            self.total_visits += 1;
        }

        let observation = Observation {
            time,
            waiting: self.stops.iter().map(Stop::waiting).collect(),
            occupancy: self.buses.iter().map(Bus::occupancy).collect(),
        };
        self.time += 1;
        Ok(Some(observation))
    }

    /// Simulate every remaining minute and hand back the results
    #[instrument(skip(self), fields(run_id = %self.run_id, minutes = self.config.simulation_length))]
    pub fn run(mut self) -> SimulationResult<SimulationReport> {
        let span = perf_span!("simulation_run", minutes = self.config.simulation_length);
        let _guard = span.enter();

        let remaining = self.config.simulation_length.saturating_add(1).saturating_sub(self.time);
        let mut observations = Vec::with_capacity(remaining as usize);
        while let Some(observation) = self.step()? {
            observations.push(observation);
        }

        info!(
            "Simulation completed: {} minutes, {} visits, {} passengers served",
            observations.len(),
            self.total_visits,
            self.statistics.total_served()
        );

        Ok(SimulationReport {
            run_id: self.run_id,
            seed: self.seed,
            started_at: self.started_at,
            finished_at: Utc::now(),
            config: self.config,
            observations,
            total_visits: self.total_visits,
            statistics: self.statistics,
        })
    }
}

/// Run one simulation of `config` to completion
pub fn run_simulation(config: SimulationConfig) -> SimulationResult<SimulationReport> {
    SimulationEngine::from_config(config)?.run()
}
