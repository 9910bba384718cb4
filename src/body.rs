//! Bodies taking part in the rendezvous: the fixed primary and the two
//! orbiting craft.

use std::fmt;

use nalgebra::Vector2;
use tracing::debug;

use crate::error::{OrbitError, OrbitResult};
use crate::orbital::{elements_to_state, state_to_elements, tangential_burn, wrap_angle, OrbitalElements};

/// What a body is in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Primary,
    Pursuer,
    Target,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Primary => "primary",
            Role::Pursuer => "pursuer",
            Role::Target => "target",
        })
    }
}

/// Anything that can take part in a proximity test.
pub trait Collider {
    /// World-frame position.
    fn position(&self) -> Vector2<f64>;

    /// Physical collision radius.
    fn radius(&self) -> f64;
}

/// Point mass pinned at the coordinate origin.
#[derive(Debug, Clone, PartialEq)]
pub struct GravitationalPrimary {
    pub name: String,
    pub mu: f64,     // gravitational parameter, length^3 / time^2
    pub radius: f64, // collision radius
}

impl GravitationalPrimary {
    pub fn new(name: impl Into<String>, mu: f64, radius: f64) -> Self {
        Self { name: name.into(), mu, radius }
    }

    pub fn role(&self) -> Role {
        Role::Primary
    }
}

impl Collider for GravitationalPrimary {
    fn position(&self) -> Vector2<f64> {
        Vector2::zeros()
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

/// A body on a bound Keplerian orbit around a primary.
///
/// Holds its own copy of μ; nothing about the primary is shared at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitingBody {
    pub name: String,
    pub role: Role,
    pub radius: f64,
    elements: OrbitalElements,
    mu: f64,
}

impl OrbitingBody {
    /// Derive the body's orbit from an initial Cartesian state.
    pub fn from_state(
        name: impl Into<String>,
        role: Role,
        radius: f64,
        pos: Vector2<f64>,
        vel: Vector2<f64>,
        mu: f64,
    ) -> OrbitResult<Self> {
        let elements = state_to_elements(&pos, &vel, mu)?;
        Ok(Self { name: name.into(), role, radius, elements, mu })
    }

    /// Build directly from an element set (validated against `mu`).
    pub fn from_elements(
        name: impl Into<String>,
        role: Role,
        radius: f64,
        elements: OrbitalElements,
        mu: f64,
    ) -> OrbitResult<Self> {
        let checked = OrbitalElements::new(elements.sma, elements.ecc, elements.argp, elements.mean_anom, mu)?;
        let checked = if elements.retrograde { checked.into_retrograde() } else { checked };
        Ok(Self { name: name.into(), role, radius, elements: checked, mu })
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Advance the mean anomaly by `n * dt`. Exact; no other element changes.
    pub fn propagate(&mut self, dt: f64) -> OrbitResult<()> {
        if !dt.is_finite() {
            return Err(OrbitError::degenerate(format!("time step {dt} is not finite")));
        }
        self.elements.mean_anom = wrap_angle(self.elements.mean_anom + self.elements.mean_motion * dt);
        Ok(())
    }

    /// Apply an impulsive burn along the current velocity and re-derive the orbit.
    ///
    /// On failure (escape trajectory, degenerate state) the previous elements
    /// are kept.
    pub fn apply_delta_v(&mut self, dv: f64) -> OrbitResult<()> {
        let (pos, vel) = self.state();
        let new_vel = tangential_burn(&vel, dv)?;
        let elements = state_to_elements(&pos, &new_vel, self.mu)?;
        debug!(
            body = %self.name,
            dv,
            sma_before = self.elements.sma,
            sma_after = elements.sma,
            ecc_after = elements.ecc,
            "maneuver applied"
        );
        self.elements = elements;
        Ok(())
    }

    /// Position and velocity in the world frame.
    pub fn state(&self) -> (Vector2<f64>, Vector2<f64>) {
        elements_to_state(&self.elements, self.mu)
    }

    pub fn velocity(&self) -> Vector2<f64> {
        self.state().1
    }

    pub fn periapsis(&self) -> (f64, f64) {
        self.elements.periapsis()
    }

    pub fn apoapsis(&self) -> (f64, f64) {
        self.elements.apoapsis()
    }

    pub fn period(&self) -> f64 {
        self.elements.period()
    }
}

impl Collider for OrbitingBody {
    fn position(&self) -> Vector2<f64> {
        self.state().0
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MU: f64 = 3.986e14;

    fn leo_body() -> OrbitingBody {
        OrbitingBody::from_state(
            "Chaser",
            Role::Pursuer,
            10.0,
            Vector2::new(7.0e6, 0.0),
            Vector2::new(0.0, 7546.0),
            MU,
        )
        .unwrap()
    }

    fn angle_diff(a: f64, b: f64) -> f64 {
        let d = a - b;
        d.sin().atan2(d.cos()).abs()
    }

    #[test]
    fn zero_step_is_identity() {
        let mut body = leo_body();
        let before = *body.elements();
        body.propagate(0.0).unwrap();
        assert_eq!(*body.elements(), before);
    }

    #[test]
    fn full_period_returns_mean_anomaly() {
        let mut body = leo_body();
        let m0 = body.elements().mean_anom;
        let period = body.period();
        assert!((period - 5828.0).abs() < 5.0, "Period {period:.1} s");
        body.propagate(period).unwrap();
        assert!(angle_diff(body.elements().mean_anom, m0) < 1e-8);
    }

    #[test]
    fn eccentric_orbit_repeats_after_each_period() {
        let el = OrbitalElements::new(1.0e7, 0.6, 0.4, 1.3, MU).unwrap();
        let mut body = OrbitingBody::from_elements("Probe", Role::Target, 1.0, el, MU).unwrap();
        let start = body.position();
        let period = body.period();
        for rev in 1..=3 {
            body.propagate(period).unwrap();
            assert!(angle_diff(body.elements().mean_anom, 1.3) < 1e-9, "rev {rev}: M = {}", body.elements().mean_anom);
            let dp = (body.position() - start).norm();
            assert!(dp < 1e-3, "rev {rev}: position drift {dp:.3e} m");
        }
        // half a period later the body is on the other side of its orbit
        body.propagate(period / 2.0).unwrap();
        assert!((body.position() - start).norm() > 1.0e6);
    }

    #[test]
    fn propagate_keeps_mean_anomaly_wrapped() {
        let mut body = leo_body();
        body.propagate(-0.25 * body.period()).unwrap();
        let m = body.elements().mean_anom;
        assert!((0.0..std::f64::consts::TAU).contains(&m), "M = {m}");
    }

    #[test]
    fn many_small_steps_match_one_big_step() {
        let mut stepped = leo_body();
        let mut single = leo_body();
        for _ in 0..1000 {
            stepped.propagate(1.5).unwrap();
        }
        single.propagate(1500.0).unwrap();
        assert!(angle_diff(stepped.elements().mean_anom, single.elements().mean_anom) < 1e-9);
        let dp = (stepped.position() - single.position()).norm();
        assert!(dp < 1e-2, "Position drift {dp:.3e} m");
    }

    #[test]
    fn quarter_period_moves_a_quarter_turn() {
        let mut body = leo_body();
        let start = body.position();
        body.propagate(body.period() / 4.0).unwrap();
        let end = body.position();
        let turned = end.y.atan2(end.x) - start.y.atan2(start.x);
        assert!(angle_diff(turned, std::f64::consts::FRAC_PI_2) < 1e-3);
    }

    #[test]
    fn propagate_rejects_nan_and_keeps_state() {
        let mut body = leo_body();
        let before = *body.elements();
        assert!(body.propagate(f64::NAN).is_err());
        assert_eq!(*body.elements(), before);
    }

    #[test]
    fn prograde_burn_raises_orbit() {
        let mut body = leo_body();
        let sma0 = body.elements().sma;
        body.apply_delta_v(100.0).unwrap();
        let el = body.elements();
        assert!(el.sma > sma0, "SMA should grow: {} -> {}", sma0, el.sma);
        // Burn along a horizontal velocity: the burn point becomes periapsis
        let expected_ecc = 7646.0_f64.powi(2) * 7.0e6 / MU - 1.0;
        assert!((el.ecc - expected_ecc).abs() < 1e-4, "ecc {} vs {}", el.ecc, expected_ecc);
        assert!(el.ecc > 0.0);
    }

    #[test]
    fn retrograde_burn_lowers_orbit() {
        let mut body = leo_body();
        let sma0 = body.elements().sma;
        body.apply_delta_v(-100.0).unwrap();
        assert!(body.elements().sma < sma0);
    }

    #[test]
    fn burn_keeps_position() {
        let mut body = leo_body();
        body.propagate(1234.0).unwrap();
        let before = body.position();
        body.apply_delta_v(50.0).unwrap();
        assert!((body.position() - before).norm() < 1e-3);
    }

    #[test]
    fn escape_burn_is_rejected_and_state_kept() {
        let mut body = leo_body();
        let before = *body.elements();
        // escape speed at 7000 km is ~10.67 km/s
        let err = body.apply_delta_v(4000.0).unwrap_err();
        assert!(err.is_escape(), "got {err:?}");
        assert_eq!(*body.elements(), before);
    }

    #[test]
    fn primary_sits_at_origin() {
        let star = GravitationalPrimary::new("Star", MU, 6.371e6);
        assert_eq!(star.position(), Vector2::zeros());
        assert_eq!(star.role(), Role::Primary);
        assert_eq!(Collider::radius(&star), 6.371e6);
    }

    #[test]
    fn from_elements_revalidates() {
        let good = OrbitalElements::new(7.0e6, 0.1, 0.0, 0.0, MU).unwrap();
        assert!(OrbitingBody::from_elements("t", Role::Target, 1.0, good, MU).is_ok());
        let mut bad = good;
        bad.ecc = 1.2;
        assert!(OrbitingBody::from_elements("t", Role::Target, 1.0, bad, MU).is_err());
    }

    #[test]
    fn apsides_bracket_radius() {
        let mut body = leo_body();
        body.apply_delta_v(300.0).unwrap();
        let (rp, _) = body.periapsis();
        let (ra, _) = body.apoapsis();
        for _ in 0..50 {
            body.propagate(137.0).unwrap();
            let r = body.position().norm();
            assert!(r >= rp - 1e-3 && r <= ra + 1e-3, "r = {r} outside [{rp}, {ra}]");
        }
    }
}
