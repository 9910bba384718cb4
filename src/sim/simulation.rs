use nalgebra::Vector2;
use tracing::{debug, warn};

use crate::body::{Collider, GravitationalPrimary, OrbitingBody, Role};
use crate::config::SimConfig;
use crate::error::{ConfigError, OrbitError, OrbitResult};
use crate::orbital::OrbitalElements;

// ---------------------------------------------------------------------------
// Proximity test
// ---------------------------------------------------------------------------

/// True if two bodies overlap, measured in units of `world_radius`.
///
/// Positions and radii are both divided by `world_radius` before comparing
/// the squared centre distance with the squared sum of radii. Touching
/// counts as contact.
pub fn detect_collision(a: &dyn Collider, b: &dyn Collider, world_radius: f64) -> bool {
    let d = (a.position() - b.position()) / world_radius;
    let reach = (a.radius() + b.radius()) / world_radius;
    d.norm_squared() <= reach * reach
}

// ---------------------------------------------------------------------------
// Snapshot of the session for rendering, logging and export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub time: f64,
    pub tick: u64,
    pub pursuer_pos: Vector2<f64>,
    pub target_pos: Vector2<f64>,
    pub pursuer: OrbitalElements,
    pub target: OrbitalElements,
    pub collided_with_primary: bool,
    pub caught_target: bool,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// One rendezvous session: a fixed primary, a maneuverable pursuer and a
/// passive target.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub primary: GravitationalPrimary,
    pub pursuer: OrbitingBody,
    pub target: OrbitingBody,
    pub dt: f64,
    pub delta_v: f64,
    pub world_radius: f64,
    pub collided_with_primary: bool,
    pub caught_target: bool,
    time: f64,
    tick: u64,
    maneuvers: u32,
    config: SimConfig,
}

impl Simulation {
    /// Build a session from configuration, deriving both orbits from their
    /// initial state vectors.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mu = config.primary.mu;
        let primary = GravitationalPrimary::new(config.primary.name.clone(), mu, config.primary.radius);
        let pursuer = build_body(config, Role::Pursuer)?;
        let target = build_body(config, Role::Target)?;

        let mut sim = Simulation {
            primary,
            pursuer,
            target,
            dt: config.dt,
            delta_v: config.delta_v,
            world_radius: config.world_radius,
            collided_with_primary: false,
            caught_target: false,
            time: 0.0,
            tick: 0,
            maneuvers: 0,
            config: config.clone(),
        };
        sim.refresh_contacts();
        Ok(sim)
    }

    /// Advance both orbiting bodies by `dt` and re-evaluate contacts.
    ///
    /// A body whose propagation fails keeps its previous elements for this
    /// tick; the other body still advances and the contact flags are still
    /// recomputed. The first failure is returned.
    pub fn update(&mut self, dt: f64) -> OrbitResult<()> {
        let pursuer = self.pursuer.propagate(dt).map_err(|e| e.for_body(Role::Pursuer));
        let target = self.target.propagate(dt).map_err(|e| e.for_body(Role::Target));

        if dt.is_finite() {
            self.time += dt;
        }
        self.tick += 1;
        self.refresh_contacts();

        pursuer.and(target)
    }

    /// Advance by the configured tick duration.
    pub fn step(&mut self) -> OrbitResult<()> {
        self.update(self.dt)
    }

    /// Fire the pursuer's engine: prograde if `increase`, retrograde otherwise.
    pub fn change_orbit(&mut self, increase: bool) -> OrbitResult<()> {
        let dv = if increase { self.delta_v } else { -self.delta_v };
        match self.pursuer.apply_delta_v(dv) {
            Ok(()) => {
                self.maneuvers += 1;
                debug!(dv, maneuvers = self.maneuvers, "pursuer orbit changed");
                self.refresh_contacts();
                Ok(())
            }
            Err(e) => {
                warn!(dv, error = %e, "maneuver rejected");
                Err(e.for_body(Role::Pursuer))
            }
        }
    }

    /// Proximity test using this session's world radius.
    pub fn detect_collision(&self, a: &dyn Collider, b: &dyn Collider) -> bool {
        detect_collision(a, b, self.world_radius)
    }

    /// Session ends when the pursuer hits the primary or reaches the target.
    pub fn is_over(&self) -> bool {
        self.collided_with_primary || self.caught_target
    }

    /// Replace every body with a fresh copy built from the stored config.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        *self = Simulation::new(&self.config)?;
        Ok(())
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn maneuvers(&self) -> u32 {
        self.maneuvers
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.time,
            tick: self.tick,
            pursuer_pos: self.pursuer.position(),
            target_pos: self.target.position(),
            pursuer: *self.pursuer.elements(),
            target: *self.target.elements(),
            collided_with_primary: self.collided_with_primary,
            caught_target: self.caught_target,
        }
    }

    fn refresh_contacts(&mut self) {
        self.collided_with_primary = self.detect_collision(&self.pursuer, &self.primary);
        self.caught_target = self.detect_collision(&self.pursuer, &self.target);
    }
}

fn build_body(config: &SimConfig, role: Role) -> Result<OrbitingBody, ConfigError> {
    let body = match role {
        Role::Target => &config.target,
        _ => &config.pursuer,
    };
    let name = if body.name.is_empty() { role.to_string() } else { body.name.clone() };
    let built = OrbitingBody::from_state(name, role, body.radius, body.pos(), body.vel(), config.primary.mu)
        .map_err(|e: OrbitError| e.for_body(role))?;
    Ok(built)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
