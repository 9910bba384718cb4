use std::f64::consts::{PI, TAU};

pub const KEPLER_TOLERANCE: f64 = 1e-10;
pub const KEPLER_MAX_ITER: usize = 50;
const BISECTION_MAX_ITER: usize = 200;

/// Output of the Kepler root finder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    pub ecc_anom: f64,     // rad, eccentric anomaly
    pub iterations: usize, // Newton + bisection steps taken
    pub converged: bool,   // |dE| fell below KEPLER_TOLERANCE
}

/// Wrap an angle into [0, 2π).
pub fn wrap_angle(angle: f64) -> f64 {
    let w = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if w >= TAU { 0.0 } else { w }
}

/// Solve Kepler's equation `E - e sin E = M` for the eccentric anomaly.
pub fn solve_kepler(mean_anom: f64, ecc: f64) -> f64 {
    solve_kepler_detailed(mean_anom, ecc).ecc_anom
}

/// Solve Kepler's equation and report how the iteration went.
///
/// Newton-Raphson from `E0 = M` (or `π` for `e >= 0.8`). If Newton does not
/// settle within [`KEPLER_MAX_ITER`] steps, bisection on `[M - e, M + e]`
/// finishes the root, since `E - e sin E` is monotonic for `e < 1`.
pub fn solve_kepler_detailed(mean_anom: f64, ecc: f64) -> KeplerSolution {
    solve_with_caps(mean_anom, ecc, KEPLER_MAX_ITER, BISECTION_MAX_ITER)
}

fn solve_with_caps(mean_anom: f64, ecc: f64, newton_cap: usize, bisection_cap: usize) -> KeplerSolution {
    let m = wrap_angle(mean_anom);
    let kepler = |x: f64| x - ecc * x.sin() - m;

    let mut ea = if ecc < 0.8 { m } else { PI };
    for i in 0..newton_cap {
        let delta = kepler(ea) / (1.0 - ecc * ea.cos());
        ea -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            return KeplerSolution { ecc_anom: ea, iterations: i + 1, converged: true };
        }
    }

    // Newton stalled: fall back to a guaranteed bracket
    let (mut lo, mut hi) = (m - ecc, m + ecc);
    let mut iterations = newton_cap;
    let mut converged = false;
    for _ in 0..bisection_cap {
        iterations += 1;
        let mid = 0.5 * (lo + hi);
        if kepler(mid) > 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
        if hi - lo < KEPLER_TOLERANCE {
            converged = true;
            break;
        }
    }

    KeplerSolution { ecc_anom: 0.5 * (lo + hi), iterations, converged }
}

/// Mean anomaly from eccentric anomaly.
pub fn ecc_to_mean(ecc_anom: f64, ecc: f64) -> f64 {
    ecc_anom - ecc * ecc_anom.sin()
}

/// True anomaly from eccentric anomaly.
/// tan(f/2) = sqrt((1+e)/(1-e)) tan(E/2), written with atan2 so E = π is safe.
pub fn ecc_to_true(ecc_anom: f64, ecc: f64) -> f64 {
    let half = 0.5 * ecc_anom;
    2.0 * ((1.0 + ecc).sqrt() * half.sin()).atan2((1.0 - ecc).sqrt() * half.cos())
}

/// Eccentric anomaly from true anomaly, wrapped into [0, 2π).
pub fn true_to_ecc(true_anom: f64, ecc: f64) -> f64 {
    let half = 0.5 * true_anom;
    wrap_angle(2.0 * ((1.0 - ecc).sqrt() * half.sin()).atan2((1.0 + ecc).sqrt() * half.cos()))
}
