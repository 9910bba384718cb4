use nalgebra::Vector2;

use crate::error::{OrbitError, OrbitResult};

/// Calculate circular orbit velocity at a given radius.
pub fn circular_velocity(r: f64, mu: f64) -> f64 {
    (mu / r).sqrt()
}

/// Counter-clockwise circular orbit state at `radius`, placed at polar `angle` (rad).
pub fn circular_state(radius: f64, angle: f64, mu: f64) -> (Vector2<f64>, Vector2<f64>) {
    let (sin, cos) = angle.sin_cos();
    let v = circular_velocity(radius, mu);
    (
        Vector2::new(radius * cos, radius * sin),
        Vector2::new(-v * sin, v * cos),
    )
}

/// Impulsive burn along the current velocity direction.
///
/// Positive `dv` is prograde, negative is retrograde. A body at rest has no
/// direction to burn along.
pub fn tangential_burn(vel: &Vector2<f64>, dv: f64) -> OrbitResult<Vector2<f64>> {
    if !dv.is_finite() {
        return Err(OrbitError::degenerate(format!("delta-v {dv} is not finite")));
    }
    let speed = vel.norm();
    if speed == 0.0 || !speed.is_finite() {
        return Err(OrbitError::degenerate("burn direction undefined at zero speed"));
    }
    Ok(vel + vel * (dv / speed))
}
