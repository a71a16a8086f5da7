//! The transit loop: stops, buses, and the rules that connect them
//!
//! These are the leaves the [`SimulationEngine`](crate::simulation::SimulationEngine)
//! drives each minute:
//!
//! - **RandomArrivalProcess**: per-stop passenger arrival marks
//! - **StopQueue / Stop**: FIFO of waiting passengers' arrival minutes
//! - **Bus**: occupancy and route counters
//! - **BusScheduleClock**: which bus reaches which stop, and when
//! - **ExchangePolicy**: alighting and boarding under the capacity limit
//!
//! All randomness is drawn from a caller-supplied generator, so a seeded
//! generator reproduces a run exactly.

pub mod arrival;
pub mod bus;
pub mod exchange;
pub mod schedule;
pub mod stop;

pub use arrival::*;
pub use bus::*;
pub use exchange::*;
pub use schedule::*;
pub use stop::*;
