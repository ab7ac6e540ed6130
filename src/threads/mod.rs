//! Worker threads.
//!
//! One long-lived trip worker owns the trip executor and is the only
//! caller of the navigation backend.

mod trip;

pub use trip::TripWorker;
