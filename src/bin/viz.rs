use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use eframe::egui::{self, Color32, Key};
use egui_plot::{Line, Plot, PlotPoints, Points, Polygon};
use nalgebra::Vector2;
use tracing_subscriber::EnvFilter;

use orbit_rendezvous::{Collider, SimConfig, Simulation};

const PRIMARY_COLOR: Color32 = Color32::from_rgb(255, 204, 51);
const PURSUER_COLOR: Color32 = Color32::from_rgb(56, 56, 200);
const TARGET_COLOR: Color32 = Color32::from_rgb(230, 100, 100);

/// Interactive rendezvous: Up/Down burn, Space pauses, R resets, Esc quits.
#[derive(Parser, Debug)]
struct Args {
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "game")]
    preset: String,

    /// Simulation ticks per second
    #[arg(long, default_value_t = 10.0)]
    fps: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::preset(&args.preset).ok_or_else(|| anyhow::anyhow!("unknown preset {:?}", args.preset))?,
    };
    let sim = Simulation::new(&config)?;

    let app = RendezvousViz {
        sim,
        paused: false,
        last_tick: Instant::now(),
        tick_interval: Duration::from_secs_f64(1.0 / args.fps.max(0.1)),
        status: String::new(),
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([700.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native("Orbit Rendezvous", options, Box::new(|_| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}

struct RendezvousViz {
    sim: Simulation,
    paused: bool,
    last_tick: Instant,
    tick_interval: Duration,
    status: String,
}

fn circle(center: Vector2<f64>, radius: f64) -> PlotPoints<'static> {
    (0..48)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / 48.0;
            [center.x + radius * t.cos(), center.y + radius * t.sin()]
        })
        .collect()
}

impl RendezvousViz {
    fn handle_input(&mut self, ctx: &egui::Context) {
        let (up, down, pause, reset, quit) = ctx.input(|i| {
            (
                i.key_pressed(Key::ArrowUp),
                i.key_pressed(Key::ArrowDown),
                i.key_pressed(Key::Space),
                i.key_pressed(Key::R),
                i.key_pressed(Key::Escape),
            )
        });

        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if pause {
            self.paused = !self.paused;
        }
        if reset {
            match self.sim.reset() {
                Ok(()) => self.status.clear(),
                Err(e) => self.status = e.to_string(),
            }
        }
        if !self.paused && !self.sim.is_over() && (up || down) {
            if let Err(e) = self.sim.change_orbit(up) {
                self.status = e.to_string();
            }
        }
    }

    fn advance(&mut self) {
        if self.paused || self.sim.is_over() || self.last_tick.elapsed() < self.tick_interval {
            return;
        }
        self.last_tick = Instant::now();
        if let Err(e) = self.sim.step() {
            self.status = e.to_string();
        }
    }
}

impl eframe::App for RendezvousViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);
        self.advance();
        ctx.request_repaint_after(self.tick_interval);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            let el = self.sim.pursuer.elements();
            let state = if self.sim.caught_target {
                "TARGET CAUGHT"
            } else if self.sim.collided_with_primary {
                "CRASHED"
            } else if self.paused {
                "paused"
            } else {
                "running"
            };
            ui.heading(format!("Orbit Rendezvous  |  {state}"));
            ui.label(format!(
                "t = {:.1}  |  a = {:.4}  e = {:.4}  |  maneuvers: {}  |  Up/Down burn, Space pause, R reset, Esc quit",
                self.sim.time(),
                el.sma,
                el.ecc,
                self.sim.maneuvers(),
            ));
            if !self.status.is_empty() {
                ui.colored_label(Color32::LIGHT_RED, &self.status);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let r = self.sim.world_radius;
            let primary = &self.sim.primary;
            let pursuer = &self.sim.pursuer;
            let target = &self.sim.target;

            let orbit_line = |el: &orbit_rendezvous::orbital::OrbitalElements| -> PlotPoints<'static> {
                el.orbit_path(180).iter().map(|p| [p.x, p.y]).collect()
            };
            let (rp, wp) = pursuer.periapsis();
            let (ra, wa) = pursuer.apoapsis();
            let apsides: PlotPoints = vec![[rp * wp.cos(), rp * wp.sin()], [ra * wa.cos(), ra * wa.sin()]].into();

            Plot::new("world")
                .data_aspect(1.0)
                .include_x(-r)
                .include_x(r)
                .include_y(-r)
                .include_y(r)
                .show_axes(false)
                .show_grid(false)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new("Pursuer orbit", orbit_line(pursuer.elements())).color(PURSUER_COLOR));
                    plot_ui.line(Line::new("Target orbit", orbit_line(target.elements())).color(TARGET_COLOR));
                    plot_ui.polygon(
                        Polygon::new(primary.name.clone(), circle(primary.position(), Collider::radius(primary)))
                            .fill_color(PRIMARY_COLOR),
                    );
                    plot_ui.polygon(
                        Polygon::new(pursuer.name.clone(), circle(pursuer.position(), pursuer.radius))
                            .fill_color(PURSUER_COLOR),
                    );
                    plot_ui.polygon(
                        Polygon::new(target.name.clone(), circle(target.position(), target.radius))
                            .fill_color(TARGET_COLOR),
                    );
                    plot_ui.points(Points::new("Apsides", apsides).radius(3.0).color(Color32::WHITE));
                });
        });
    }
}
