use nalgebra::Vector2;

use orbit_rendezvous::config::MU_EARTH;
use orbit_rendezvous::{OrbitingBody, Role};

fn main() {
    println!("=== Prograde burn in low Earth orbit ===\n");

    let mut body = OrbitingBody::from_state(
        "Chaser",
        Role::Pursuer,
        10.0,
        Vector2::new(7.0e6, 0.0),
        Vector2::new(0.0, 7546.0),
        MU_EARTH,
    )
    .expect("initial orbit is bound");

    let el = *body.elements();
    println!("Initial: a = {:.1} km, e = {:.6}, period = {:.1} s", el.sma / 1000.0, el.ecc, el.period());

    // One full revolution returns the mean anomaly to where it started
    body.propagate(el.period()).expect("finite step");
    println!("After one period: M = {:.9} rad (was {:.9})", body.elements().mean_anom, el.mean_anom);

    for dv in [100.0, -200.0] {
        body.apply_delta_v(dv).expect("burn stays bound");
        let el = body.elements();
        let (rp, _) = body.periapsis();
        let (ra, _) = body.apoapsis();
        println!(
            "Burn {:+6.1} m/s: a = {:.1} km, e = {:.5}, periapsis = {:.1} km, apoapsis = {:.1} km",
            dv,
            el.sma / 1000.0,
            el.ecc,
            rp / 1000.0,
            ra / 1000.0,
        );
    }

    match body.apply_delta_v(5000.0) {
        Ok(()) => println!("Unexpected: 5 km/s burn stayed bound"),
        Err(e) => println!("5 km/s burn rejected: {e}"),
    }
}
