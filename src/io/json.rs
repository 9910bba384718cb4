use std::io::{self, Write};

use serde::Serialize;

use crate::config::SimConfig;
use crate::sim::{Outcome, SessionLog, SimEvent};

/// Orbit shape at one instant, in the units of the session.
#[derive(Debug, Clone, Serialize)]
pub struct OrbitSummary {
    pub sma: f64,
    pub ecc: f64,
    pub periapsis: f64,
    pub apoapsis: f64,
    pub period: f64,
}

impl OrbitSummary {
    fn from_elements(el: &crate::orbital::OrbitalElements) -> Self {
        OrbitSummary {
            sma: el.sma,
            ecc: el.ecc,
            periapsis: el.periapsis().0,
            apoapsis: el.apoapsis().0,
            period: el.period(),
        }
    }
}

/// Summary of a headless session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub pursuer: String,
    pub target: String,
    pub outcome: Outcome,
    pub ticks: u64,
    pub elapsed: f64,
    pub maneuvers: u32,
    pub closest_approach: f64,
    pub closest_approach_time: f64,
    pub initial_orbit: OrbitSummary,
    pub final_orbit: OrbitSummary,
    pub target_orbit: OrbitSummary,
    pub events: Vec<SimEvent>,
}

impl SessionSummary {
    /// Compute summary from a session log.
    pub fn from_log(config: &SimConfig, log: &SessionLog) -> Self {
        let first = &log.snapshots[0];
        let last = log.last();

        let (closest_approach, closest_approach_time) = log
            .snapshots
            .iter()
            .map(|s| ((s.pursuer_pos - s.target_pos).norm(), s.time))
            .fold((f64::INFINITY, 0.0), |best, cur| if cur.0 < best.0 { cur } else { best });

        SessionSummary {
            pursuer: config.pursuer.name.clone(),
            target: config.target.name.clone(),
            outcome: log.outcome,
            ticks: last.tick,
            elapsed: last.time,
            maneuvers: log.maneuvers,
            closest_approach,
            closest_approach_time,
            initial_orbit: OrbitSummary::from_elements(&first.pursuer),
            final_orbit: OrbitSummary::from_elements(&last.pursuer),
            target_orbit: OrbitSummary::from_elements(&last.target),
            events: log.events.clone(),
        }
    }
}

/// Write session summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &SessionSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)
}

/// Write session summary JSON to a file.
pub fn write_summary_file(path: &str, summary: &SessionSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}
