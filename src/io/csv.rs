use std::io::{self, Write};

use crate::sim::Snapshot;

/// Write session snapshots to CSV format.
///
/// Columns: time, tick, pursuer_x, pursuer_y, target_x, target_y,
///          pursuer_sma, pursuer_ecc, pursuer_argp_deg, pursuer_mean_anom_deg,
///          separation, collided_with_primary, caught_target
pub fn write_trajectory<W: Write>(writer: &mut W, snapshots: &[Snapshot]) -> io::Result<()> {
    writeln!(
        writer,
        "time,tick,pursuer_x,pursuer_y,target_x,target_y,\
         pursuer_sma,pursuer_ecc,pursuer_argp_deg,pursuer_mean_anom_deg,\
         separation,collided_with_primary,caught_target"
    )?;

    for s in snapshots {
        writeln!(
            writer,
            "{:.4},{},{:.6e},{:.6e},{:.6e},{:.6e},\
             {:.6e},{:.6},{:.3},{:.3},\
             {:.6e},{},{}",
            s.time,
            s.tick,
            s.pursuer_pos.x, s.pursuer_pos.y,
            s.target_pos.x, s.target_pos.y,
            s.pursuer.sma,
            s.pursuer.ecc,
            s.pursuer.argp.to_degrees(),
            s.pursuer.mean_anom.to_degrees(),
            (s.pursuer_pos - s.target_pos).norm(),
            s.collided_with_primary as u8,
            s.caught_target as u8,
        )?;
    }

    Ok(())
}

/// Write snapshots to a CSV file at the given path.
pub fn write_trajectory_file(path: &str, snapshots: &[Snapshot]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::Simulation;

    #[test]
    fn csv_output_has_header_and_rows() {
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        let mut snaps = vec![sim.snapshot()];
        sim.step().unwrap();
        snaps.push(sim.snapshot());

        let mut buf = Vec::new();
        write_trajectory(&mut buf, &snaps).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,tick,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.0000,0,"));
        assert!(lines[2].starts_with("0.5000,1,"));
        let columns = lines[0].split(',').count();
        assert!(lines.iter().all(|l| l.split(',').count() == columns));
    }
}
