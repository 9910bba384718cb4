//! Planar two-body orbit rendezvous: a Keplerian element propagator with
//! impulsive maneuvers and a proximity test between a pursuer and a target.

pub mod body;
pub mod config;
pub mod error;
pub mod io;
pub mod orbital;
pub mod sim;

pub use body::{Collider, GravitationalPrimary, OrbitingBody, Role};
pub use config::SimConfig;
pub use error::{ConfigError, OrbitError, OrbitResult};
pub use sim::Simulation;
