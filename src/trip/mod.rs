//! Trip planning and execution.

mod executor;
mod task;

pub use executor::{TripEvent, TripExecutor};
pub use task::{TaskOutcome, TripReport, TripTask};
