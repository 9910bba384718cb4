pub mod event;
pub mod runner;
pub mod simulation;

pub use event::{EventKind, SimEvent};
pub use runner::{run_session, Burn, IdlePilot, Outcome, Pilot, ScheduledPilot, SessionLog};
pub use simulation::{detect_collision, Simulation, Snapshot};
