use std::f64::consts::{PI, TAU};

use nalgebra::{Rotation2, Vector2};
use tracing::warn;

use super::kepler::{ecc_to_mean, ecc_to_true, solve_kepler_detailed, true_to_ecc, wrap_angle};
use crate::error::{OrbitError, OrbitResult};

/// Planar Keplerian elements of a bound orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    pub sma: f64,         // semi-major axis, length
    pub ecc: f64,         // eccentricity, 0 <= e < 1
    pub argp: f64,        // argument of periapsis, rad
    pub mean_anom: f64,   // mean anomaly, rad in [0, 2π)
    pub mean_motion: f64, // rad per unit time, sqrt(μ / a³)
    pub retrograde: bool, // clockwise motion (negative angular momentum)
}

impl OrbitalElements {
    /// Build a validated element set; mean motion is derived from `mu`.
    pub fn new(sma: f64, ecc: f64, argp: f64, mean_anom: f64, mu: f64) -> OrbitResult<Self> {
        check_mu(mu)?;
        if !(sma.is_finite() && ecc.is_finite() && argp.is_finite() && mean_anom.is_finite()) {
            return Err(OrbitError::InvalidElements("non-finite element".into()));
        }
        if sma <= 0.0 {
            return Err(OrbitError::InvalidElements(format!("semi-major axis {sma} <= 0")));
        }
        if !(0.0..1.0).contains(&ecc) {
            return Err(OrbitError::InvalidElements(format!("eccentricity {ecc} outside [0, 1)")));
        }
        Ok(OrbitalElements {
            sma,
            ecc,
            argp: wrap_angle(argp),
            mean_anom: wrap_angle(mean_anom),
            mean_motion: mean_motion(sma, mu)?,
            retrograde: false,
        })
    }

    /// Same orbit traversed clockwise.
    pub fn into_retrograde(mut self) -> Self {
        self.retrograde = true;
        self
    }

    fn sense(&self) -> f64 {
        if self.retrograde { -1.0 } else { 1.0 }
    }

    /// Orbital period 2π / n.
    pub fn period(&self) -> f64 {
        TAU / self.mean_motion
    }

    /// Periapsis radius and direction angle.
    pub fn periapsis(&self) -> (f64, f64) {
        (self.sma * (1.0 - self.ecc), self.argp)
    }

    /// Apoapsis radius and direction angle.
    pub fn apoapsis(&self) -> (f64, f64) {
        (self.sma * (1.0 + self.ecc), wrap_angle(self.argp + PI))
    }

    /// Current eccentric anomaly, solved from the mean anomaly.
    pub fn ecc_anomaly(&self) -> f64 {
        solve_kepler_detailed(self.mean_anom, self.ecc).ecc_anom
    }

    /// Current true anomaly, wrapped into [0, 2π).
    pub fn true_anomaly(&self) -> f64 {
        wrap_angle(ecc_to_true(self.ecc_anomaly(), self.ecc))
    }

    /// Current distance from the primary.
    pub fn radius(&self) -> f64 {
        self.sma * (1.0 - self.ecc * self.ecc_anomaly().cos())
    }

    /// Specific orbital energy -μ / 2a.
    pub fn specific_energy(&self, mu: f64) -> f64 {
        -mu / (2.0 * self.sma)
    }

    /// Closed polyline of the orbit ellipse in the world frame.
    pub fn orbit_path(&self, samples: usize) -> Vec<Vector2<f64>> {
        let samples = samples.max(3);
        let rot = Rotation2::new(self.argp);
        let b = self.sma * (1.0 - self.ecc * self.ecc).sqrt();
        (0..=samples)
            .map(|i| {
                let ea = TAU * i as f64 / samples as f64;
                // focus at origin: x measured from the focus along periapsis
                rot * Vector2::new(self.sma * (ea.cos() - self.ecc), b * ea.sin())
            })
            .collect()
    }
}

/// Mean motion sqrt(μ / a³), rejecting a non-positive a³.
pub fn mean_motion(sma: f64, mu: f64) -> OrbitResult<f64> {
    let a3 = sma.powi(3);
    if !(a3 > 0.0) || !a3.is_finite() {
        return Err(OrbitError::degenerate(format!("a^3 = {a3} in mean motion")));
    }
    Ok((mu / a3).sqrt())
}

fn check_mu(mu: f64) -> OrbitResult<()> {
    if mu.is_finite() && mu > 0.0 {
        Ok(())
    } else {
        Err(OrbitError::degenerate(format!("gravitational parameter {mu} must be > 0")))
    }
}

/// Derive orbital elements from a planar state vector.
///
/// Only bound orbits are representable: a non-negative specific energy is
/// reported as [`OrbitError::EscapeTrajectory`].
pub fn state_to_elements(pos: &Vector2<f64>, vel: &Vector2<f64>, mu: f64) -> OrbitResult<OrbitalElements> {
    check_mu(mu)?;
    if !(pos.iter().all(|c| c.is_finite()) && vel.iter().all(|c| c.is_finite())) {
        return Err(OrbitError::degenerate("non-finite state vector"));
    }
    let r = pos.norm();
    if r == 0.0 {
        return Err(OrbitError::degenerate("position at the primary (r = 0)"));
    }
    let v2 = vel.norm_squared();
    let h = pos.perp(vel);
    if h == 0.0 {
        return Err(OrbitError::degenerate("radial trajectory (zero angular momentum)"));
    }

    // Vis-viva energy sets the semi-major axis
    let energy = 0.5 * v2 - mu / r;
    if energy >= 0.0 {
        return Err(OrbitError::EscapeTrajectory { energy });
    }
    let sma = -mu / (2.0 * energy);

    // Eccentricity vector points at periapsis
    let e_vec = ((v2 - mu / r) * pos - pos.dot(vel) * vel) / mu;
    let ecc = e_vec.norm();
    if ecc >= 1.0 {
        return Err(OrbitError::EscapeTrajectory { energy });
    }
    let argp = e_vec.y.atan2(e_vec.x);

    // Anomalies are measured in the direction of motion
    let sense = h.signum();
    let true_anom = sense * (pos.y.atan2(pos.x) - argp);
    let ecc_anom = true_to_ecc(true_anom, ecc);

    let el = OrbitalElements::new(sma, ecc, argp, ecc_to_mean(ecc_anom, ecc), mu)?;
    Ok(if sense < 0.0 { el.into_retrograde() } else { el })
}

/// Position and velocity in the world frame for an element set.
pub fn elements_to_state(el: &OrbitalElements, mu: f64) -> (Vector2<f64>, Vector2<f64>) {
    let sol = solve_kepler_detailed(el.mean_anom, el.ecc);
    if !sol.converged {
        warn!(
            mean_anom = el.mean_anom,
            ecc = el.ecc,
            iterations = sol.iterations,
            "Kepler solver did not converge, using best estimate"
        );
    }
    let ea = sol.ecc_anom;
    let f = ecc_to_true(ea, el.ecc);
    let r_mag = el.sma * (1.0 - el.ecc * ea.cos());

    // Perifocal frame: x toward periapsis, y mirrored for clockwise orbits
    let s = el.sense();
    let r_pf = Vector2::new(r_mag * f.cos(), s * r_mag * f.sin());
    let v_pf = (mu * el.sma).sqrt() / r_mag
        * Vector2::new(-ea.sin(), s * (1.0 - el.ecc * el.ecc).sqrt() * ea.cos());

    let rot = Rotation2::new(el.argp);
    (rot * r_pf, rot * v_pf)
}
