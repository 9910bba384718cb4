use serde::Serialize;
use tracing::{info, warn};

use super::event::{ApsisDetector, ContactDetector, EventDetector, EventKind, SimEvent};
use super::simulation::{Simulation, Snapshot};
use crate::config::SimConfig;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Pilots: who presses the maneuver keys in a headless session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Burn {
    Prograde,
    Retrograde,
}

/// Trait for session pilots.
///
/// Implement this to script maneuvers for a headless run.
pub trait Pilot {
    /// Decide whether to burn before the next tick.
    fn command(&mut self, snapshot: &Snapshot) -> Option<Burn>;

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Never burns.
pub struct IdlePilot;

impl Pilot for IdlePilot {
    fn command(&mut self, _snapshot: &Snapshot) -> Option<Burn> {
        None
    }

    fn name(&self) -> &str {
        "idle"
    }
}

/// Burns at fixed tick numbers.
pub struct ScheduledPilot {
    burns: Vec<(u64, Burn)>,
}

impl ScheduledPilot {
    pub fn new(mut burns: Vec<(u64, Burn)>) -> Self {
        burns.sort_by_key(|(tick, _)| *tick);
        Self { burns }
    }
}

impl Pilot for ScheduledPilot {
    fn command(&mut self, snapshot: &Snapshot) -> Option<Burn> {
        let idx = self.burns.iter().position(|(tick, _)| *tick == snapshot.tick)?;
        Some(self.burns.remove(idx).1)
    }

    fn name(&self) -> &str {
        "scheduled"
    }
}

// ---------------------------------------------------------------------------
// Session loop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    CaughtTarget,
    CollidedWithPrimary,
    TimeExpired,
    Aborted,
}

/// Everything recorded during a headless session.
#[derive(Debug, Clone)]
pub struct SessionLog {
    pub snapshots: Vec<Snapshot>,
    pub events: Vec<SimEvent>,
    pub outcome: Outcome,
    pub maneuvers: u32,
}

impl SessionLog {
    pub fn last(&self) -> &Snapshot {
        // run_session always records the initial snapshot
        &self.snapshots[self.snapshots.len() - 1]
    }
}

/// Run a session until contact, `max_ticks`, or a propagation failure.
///
/// Rejected maneuvers are logged as events and play continues on the
/// previous orbit.
pub fn run_session(config: &SimConfig, pilot: &mut dyn Pilot) -> Result<SessionLog, ConfigError> {
    let mut sim = Simulation::new(config)?;
    let mut detectors: Vec<Box<dyn EventDetector>> = vec![
        Box::new(ContactDetector::primary()),
        Box::new(ContactDetector::target()),
        Box::new(ApsisDetector),
    ];

    let mut snapshots = Vec::with_capacity((config.max_ticks as usize + 1).min(100_000));
    let mut events = Vec::new();
    snapshots.push(sim.snapshot());

    let mut outcome = Outcome::TimeExpired;

    // Already touching at setup
    if sim.is_over() {
        outcome = contact_outcome(&sim);
    }

    while outcome == Outcome::TimeExpired && sim.tick() < config.max_ticks {
        let current = &snapshots[snapshots.len() - 1];

        if let Some(burn) = pilot.command(current) {
            let increase = burn == Burn::Prograde;
            let dv = if increase { sim.delta_v } else { -sim.delta_v };
            let kind = match sim.change_orbit(increase) {
                Ok(()) => EventKind::Maneuver { delta_v: dv },
                Err(e) => EventKind::ManeuverRejected { delta_v: dv, reason: e.to_string() },
            };
            events.push(SimEvent { time: sim.time(), tick: sim.tick(), kind });
        }

        if let Err(e) = sim.step() {
            warn!(error = %e, tick = sim.tick(), "propagation failed, aborting session");
            snapshots.push(sim.snapshot());
            outcome = Outcome::Aborted;
            break;
        }

        let snap = sim.snapshot();
        let prev = &snapshots[snapshots.len() - 1];
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(prev, &snap) {
                events.push(SimEvent { time: snap.time, tick: snap.tick, kind });
            }
        }
        snapshots.push(snap);

        if sim.is_over() {
            outcome = contact_outcome(&sim);
        }
    }

    info!(
        pilot = pilot.name(),
        ?outcome,
        ticks = sim.tick(),
        maneuvers = sim.maneuvers(),
        "session finished"
    );

    Ok(SessionLog { snapshots, events, outcome, maneuvers: sim.maneuvers() })
}

fn contact_outcome(sim: &Simulation) -> Outcome {
    // Hitting the primary takes precedence over a simultaneous catch
    if sim.collided_with_primary {
        Outcome::CollidedWithPrimary
    } else {
        Outcome::CaughtTarget
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BodyConfig;

    fn short_game(max_ticks: u64) -> SimConfig {
        SimConfig { max_ticks, ..SimConfig::default() }
    }

    #[test]
    fn idle_session_runs_to_limit() {
        let log = run_session(&short_game(50), &mut IdlePilot).unwrap();
        assert_eq!(log.outcome, Outcome::TimeExpired);
        assert_eq!(log.snapshots.len(), 51);
        assert_eq!(log.last().tick, 50);
        assert_eq!(log.maneuvers, 0);
    }

    #[test]
    fn scheduled_burns_are_logged() {
        let mut pilot = ScheduledPilot::new(vec![(10, Burn::Retrograde), (3, Burn::Prograde)]);
        let log = run_session(&short_game(20), &mut pilot).unwrap();
        let burns: Vec<_> = log
            .events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::Maneuver { .. }))
            .map(|e| e.tick)
            .collect();
        assert_eq!(burns, vec![3, 10]);
        assert_eq!(log.maneuvers, 2);
    }

    #[test]
    fn escape_burn_is_rejected_but_session_continues() {
        let config = SimConfig { delta_v: 1.0, max_ticks: 5, ..SimConfig::default() };
        let mut pilot = ScheduledPilot::new(vec![(1, Burn::Prograde)]);
        let log = run_session(&config, &mut pilot).unwrap();
        assert!(log
            .events
            .iter()
            .any(|e| matches!(e.kind, EventKind::ManeuverRejected { .. })));
        assert_eq!(log.outcome, Outcome::TimeExpired);
        assert_eq!(log.maneuvers, 0);
        assert_eq!(log.snapshots[0].pursuer.sma, log.last().pursuer.sma);
        assert_eq!(log.snapshots[0].pursuer.ecc, log.last().pursuer.ecc);
    }

    #[test]
    fn dropping_into_primary_ends_session() {
        // Repeated retrograde burns shrink periapsis until the ship hits the star
        // Short ticks so the fast periapsis pass cannot be stepped over
        let config = SimConfig { delta_v: 0.02, dt: 0.05, max_ticks: 1000, ..SimConfig::default() };
        let mut pilot = ScheduledPilot::new(vec![(0, Burn::Retrograde), (1, Burn::Retrograde), (2, Burn::Retrograde)]);
        let log = run_session(&config, &mut pilot).unwrap();
        assert_eq!(log.outcome, Outcome::CollidedWithPrimary);
        assert!(log.events.iter().any(|e| e.kind == EventKind::CollidedWithPrimary));
    }

    #[test]
    fn oversized_tick_limit_is_rejected() {
        let config = short_game(crate::config::MAX_SESSION_TICKS + 1);
        let err = run_session(&config, &mut IdlePilot).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn touching_at_start_ends_immediately() {
        let mut config = SimConfig::default();
        config.target = BodyConfig::circular("Debris", 0.6, 0.5, 0.02, config.primary.mu);
        let log = run_session(&config, &mut IdlePilot).unwrap();
        assert_eq!(log.outcome, Outcome::CaughtTarget);
        assert_eq!(log.snapshots.len(), 1);
    }
}
