//! Deterministic scenario tests
//!
//! Each scenario fixes the arrival range to a single value so the only random
//! draw left is alighting, and checks the run minute by minute.

use transit_loop_simulator::output::ObservationTable;
use transit_loop_simulator::simulation::SimulationEngine;
use transit_loop_simulator::types::{OutputFormat, SimulationConfig, StopConfig, StopId};

fn single_stop(capacity: u32) -> SimulationConfig {
    SimulationConfig {
        capacity,
        simulation_length: 30,
        num_buses: 1,
        leg_duration: 5,
        stops: vec![StopConfig::new("Depot", 3, 3, 1)],
        ..Default::default()
    }
}

/// Test the one-stop, one-bus loop with arrivals every three minutes
#[test]
fn test_single_stop_single_bus() {
    let report = SimulationEngine::with_seed(single_stop(10), 8).unwrap().run().unwrap();
    let waiting: Vec<u32> = report.observations.iter().map(|o| o.waiting[0]).collect();

    // Arrivals at minutes 3, 6, ..., 30
    let arrivals = (1..=30u32).filter(|t| t % 3 == 0).count();
    assert_eq!(arrivals, 10);

    // Queue only grows between bus visits at minutes 5, 10, ..., 30
    for minute in 2..=30usize {
        let index = minute - 1;
        if minute % 5 != 0 {
            assert!(waiting[index] >= waiting[index - 1], "queue shrank at minute {}", minute);
        } else {
            assert_eq!(waiting[index], 0, "bus should drain the stop at minute {}", minute);
        }
    }

    assert_eq!(report.total_visits, 6);
    assert_eq!(report.statistics.count_served(StopId(0)), 10);
    assert_eq!(report.statistics.total_wait(StopId(0)), 20);
    assert_eq!(report.statistics.mean_wait(StopId(0)), Some(2.0));
}

/// Test that the table rendering of the scenario matches the observations
#[test]
fn test_single_stop_table_rows() {
    let config = single_stop(10);
    let table = ObservationTable::from_config(&config);
    let report = SimulationEngine::with_seed(config, 8).unwrap().run().unwrap();

    let mut buffer = Vec::new();
    table.write_all(&mut buffer, &report.observations).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 31);
    assert_eq!(lines[0], "Time \tStop 1\tBus 1\t");
    assert_eq!(lines[3], "3\t1\t0\t");
    // Everyone alights at minute 5, then the one passenger boards
    assert_eq!(lines[5], "5\t0\t1\t");
    assert_eq!(lines[30], "30\t0\t2\t");
}

/// Test that a unit-capacity bus behaves identically for every seed
#[test]
fn test_unit_capacity_is_deterministic() {
    let baseline = SimulationEngine::with_seed(single_stop(1), 0).unwrap().run().unwrap();

    // One passenger per visit: the backlog grows by one or two each leg
    assert_eq!(baseline.all_wait_samples(), &[2, 4, 6, 8, 10, 12]);
    assert_eq!(baseline.observations.last().unwrap().waiting, vec![5]);
    assert!(baseline.observations.iter().all(|o| o.occupancy[0] <= 1));

    for seed in 1..25 {
        let report = SimulationEngine::with_seed(single_stop(1), seed).unwrap().run().unwrap();
        assert_eq!(report.observations, baseline.observations, "seed {} diverged", seed);
        assert_eq!(report.all_wait_samples(), baseline.all_wait_samples());
    }
}

/// Test that a stop no bus reaches reports an undefined mean
#[test]
fn test_unserved_stop_reports_undefined_mean() {
    // One bus takes 20 minutes per leg; the second stop is first reached at 40
    let config = SimulationConfig {
        simulation_length: 30,
        num_buses: 1,
        leg_duration: 20,
        stops: vec![StopConfig::new("Depot", 3, 3, 1), StopConfig::new("Terminus", 2, 4, 1)],
        ..Default::default()
    };
    let report = SimulationEngine::with_seed(config, 4).unwrap().run().unwrap();
    let stats = &report.statistics;

    assert_eq!(stats.count_served(StopId(0)), 6);
    assert_eq!(stats.mean_wait(StopId(0)), Some(9.5));
    assert_eq!(stats.count_served(StopId(1)), 0);
    assert!(stats.mean_wait(StopId(1)).is_none());
    assert!(report.wait_samples_by_stop()[1].is_empty());

    let text = stats.generate_average_wait_report();
    assert!(text.contains("The average time waited at Depot is 9.50 minutes."));
    assert!(text.contains("The average time waited at Terminus is undefined (no data"));
    assert!(!text.contains("NaN"));
}

/// Test the staggered schedule of the default loop
#[test]
fn test_default_loop_first_visits() {
    let config = SimulationConfig { simulation_length: 100, ..Default::default() };
    let mut engine = SimulationEngine::with_seed(config, 1).unwrap();

    let mut first_visit = vec![None; 4];
    while !engine.is_finished() {
        let time = engine.current_time();
        for (index, bus) in engine.buses().iter().enumerate() {
            if first_visit[index].is_none() && engine.schedule().is_due(bus, time) {
                first_visit[index] = Some(time);
            }
        }
        engine.step().unwrap();
    }

    // 20-minute legs, buses 25 minutes apart
    assert_eq!(first_visit, vec![Some(20), Some(45), Some(70), Some(95)]);
}

/// Test that JSON output carries the same observations
#[test]
fn test_json_rendering_of_scenario() {
    let config = SimulationConfig { output_format: OutputFormat::Json, ..single_stop(10) };
    let table = ObservationTable::from_config(&config);
    let report = SimulationEngine::with_seed(config, 8).unwrap().run().unwrap();

    let mut buffer = Vec::new();
    table.write_all(&mut buffer, &report.observations).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    assert_eq!(text.lines().count(), 30);
    let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
    assert_eq!(first["time"], 1);
    assert_eq!(first["waiting"], serde_json::json!([0]));
    assert_eq!(first["occupancy"], serde_json::json!([0]));
}
