use orbit_rendezvous::io::json::{self, SessionSummary};
use orbit_rendezvous::sim::{self, Burn, ScheduledPilot};
use orbit_rendezvous::SimConfig;

fn main() {
    let config = SimConfig::default();

    // Drop towards the inner target orbit, then circularize half an orbit later
    let mut pilot = ScheduledPilot::new(vec![
        (0, Burn::Retrograde),
        (1, Burn::Retrograde),
        (42, Burn::Retrograde),
        (43, Burn::Retrograde),
    ]);

    println!("Simulating scripted rendezvous ...");
    let log = sim::run_session(&config, &mut pilot).expect("valid configuration");
    let summary = SessionSummary::from_log(&config, &log);

    println!("Outcome: {:?} after {} ticks", summary.outcome, summary.ticks);
    println!("Closest approach: {:.4} at t = {:.1}", summary.closest_approach, summary.closest_approach_time);

    let mut out = std::io::stdout();
    json::write_summary(&mut out, &summary).expect("stdout");
}
