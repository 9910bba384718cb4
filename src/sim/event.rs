use serde::Serialize;

use super::simulation::Snapshot;
use crate::body::Role;

// ---------------------------------------------------------------------------
// Session events
// ---------------------------------------------------------------------------

/// Kinds of session events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    Maneuver { delta_v: f64 },
    ManeuverRejected { delta_v: f64, reason: String },
    Periapsis,
    Apoapsis,
    CollidedWithPrimary,
    CaughtTarget,
}

/// A discrete event that occurred during a session.
#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    pub time: f64,
    pub tick: u64,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive snapshots and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &Snapshot, current: &Snapshot) -> Option<EventKind>;
}

/// Detects the pursuer passing periapsis or apoapsis.
///
/// Mean anomaly wraps through 0 at periapsis and crosses π at apoapsis.
/// Ticks that include a maneuver are skipped since the anomaly jumps.
pub struct ApsisDetector;

impl EventDetector for ApsisDetector {
    fn check(&mut self, prev: &Snapshot, current: &Snapshot) -> Option<EventKind> {
        let (p, c) = (&prev.pursuer, &current.pursuer);
        if p.sma != c.sma || p.ecc != c.ecc {
            return None;
        }
        // Near-circular orbits have no meaningful apsides
        if c.ecc < 1e-6 {
            return None;
        }
        let (m0, m1) = (p.mean_anom, c.mean_anom);
        if m1 < m0 {
            Some(EventKind::Periapsis)
        } else if m0 < std::f64::consts::PI && m1 >= std::f64::consts::PI {
            Some(EventKind::Apoapsis)
        } else {
            None
        }
    }
}

/// Reports the rising edge of one contact flag.
///
/// Each flag gets its own detector so a tick that both hits the primary and
/// reaches the target records both events.
pub struct ContactDetector {
    with: Role,
}

impl ContactDetector {
    /// Watches `collided_with_primary`.
    pub fn primary() -> Self {
        Self { with: Role::Primary }
    }

    /// Watches `caught_target`.
    pub fn target() -> Self {
        Self { with: Role::Target }
    }

    fn flag(&self, snapshot: &Snapshot) -> bool {
        match self.with {
            Role::Target => snapshot.caught_target,
            _ => snapshot.collided_with_primary,
        }
    }
}

impl EventDetector for ContactDetector {
    fn check(&mut self, prev: &Snapshot, current: &Snapshot) -> Option<EventKind> {
        if !self.flag(current) || self.flag(prev) {
            return None;
        }
        Some(match self.with {
            Role::Target => EventKind::CaughtTarget,
            _ => EventKind::CollidedWithPrimary,
        })
    }
}
