//! Day-by-day inventory simulation of a small store under an (s,Q)
//! reorder policy: Poisson demand, spoilage of perishables, purchase
//! orders with random lead times, and resumable checkpoints.

pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod simulation;
pub mod strategy;

pub use error::{Result, SimError};
pub use simulation::config::Config;
pub use simulation::engine::{DayTotals, StoreSimulation};
pub use simulation::state::RunState;
