use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use orbit_rendezvous::io::{csv, json};
use orbit_rendezvous::io::json::SessionSummary;
use orbit_rendezvous::sim::{run_session, Burn, IdlePilot, Outcome, Pilot, ScheduledPilot};
use orbit_rendezvous::{SimConfig, Simulation};

/// Headless orbit rendezvous session.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML configuration file (overrides --preset)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in configuration: "game" or "leo"
    #[arg(short, long, default_value = "game")]
    preset: String,

    /// Override the tick limit
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Scheduled burn as TICK:+ (prograde) or TICK:- (retrograde); repeatable
    #[arg(short, long = "burn", value_parser = parse_burn)]
    burns: Vec<(u64, Burn)>,

    /// Export per-tick snapshots to CSV
    #[arg(long)]
    csv: Option<String>,

    /// Export session summary to JSON
    #[arg(long)]
    json: Option<String>,
}

fn parse_burn(s: &str) -> Result<(u64, Burn), String> {
    let (tick, dir) = s.split_once(':').ok_or_else(|| format!("expected TICK:+ or TICK:-, got {s:?}"))?;
    let tick = tick.trim().parse::<u64>().map_err(|e| format!("bad tick {tick:?}: {e}"))?;
    let burn = match dir.trim() {
        "+" | "pro" | "prograde" => Burn::Prograde,
        "-" | "retro" | "retrograde" => Burn::Retrograde,
        other => return Err(format!("unknown burn direction {other:?}")),
    };
    Ok((tick, burn))
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => SimConfig::preset(&args.preset).ok_or_else(|| anyhow!("unknown preset {:?}", args.preset))?,
    };
    if let Some(ticks) = args.ticks {
        config.max_ticks = ticks;
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    // -----------------------------------------------------------------------
    // Initial orbits
    // -----------------------------------------------------------------------
    let sim = Simulation::new(&config)?;
    println!("=== Orbit Rendezvous ===\n");
    println!("Primary: {} (mu = {:.6e}, radius = {:.4e})", sim.primary.name, sim.primary.mu, sim.primary.radius);
    for body in [&sim.pursuer, &sim.target] {
        let el = body.elements();
        println!(
            "  {:<8} {:<10} a = {:.6e}  e = {:.6}  argp = {:7.2} deg  period = {:.2}",
            body.role.to_string(),
            body.name,
            el.sma,
            el.ecc,
            el.argp.to_degrees(),
            el.period(),
        );
    }
    println!();

    // -----------------------------------------------------------------------
    // Run session
    // -----------------------------------------------------------------------
    let mut pilot: Box<dyn Pilot> = if args.burns.is_empty() {
        Box::new(IdlePilot)
    } else {
        Box::new(ScheduledPilot::new(args.burns.clone()))
    };
    let log = run_session(&config, pilot.as_mut())?;
    let summary = SessionSummary::from_log(&config, &log);

    // -----------------------------------------------------------------------
    // Report
    // -----------------------------------------------------------------------
    let verdict = match summary.outcome {
        Outcome::CaughtTarget => "Target caught",
        Outcome::CollidedWithPrimary => "Crashed into the primary",
        Outcome::TimeExpired => "Time expired",
        Outcome::Aborted => "Aborted (propagation failure)",
    };
    println!("Outcome: {verdict}");
    println!("Ticks: {}  Elapsed: {:.2}  Maneuvers: {}", summary.ticks, summary.elapsed, summary.maneuvers);
    println!(
        "Closest approach: {:.4e} at t = {:.2}",
        summary.closest_approach, summary.closest_approach_time
    );
    println!(
        "Pursuer orbit: a {:.4e} -> {:.4e}, e {:.4} -> {:.4}",
        summary.initial_orbit.sma, summary.final_orbit.sma, summary.initial_orbit.ecc, summary.final_orbit.ecc,
    );
    for ev in &summary.events {
        println!("  t = {:9.2}  tick {:6}  {:?}", ev.time, ev.tick, ev.kind);
    }

    if let Some(path) = &args.csv {
        csv::write_trajectory_file(path, &log.snapshots).with_context(|| format!("writing {path}"))?;
        println!("Exported: {path}");
    }
    if let Some(path) = &args.json {
        json::write_summary_file(path, &summary).with_context(|| format!("writing {path}"))?;
        println!("Exported: {path}");
    }

    if summary.outcome == Outcome::Aborted {
        bail!("session aborted after {} ticks", summary.ticks);
    }
    Ok(())
}
