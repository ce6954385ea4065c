use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use macroquad::prelude::*;
use tracing::{error, info};

mod ui;

use ant_colony::config::{self, SimConfig};
use ant_colony::reporting;
use ant_colony::scenario::{self, Scenario, ScenarioMasks};
use ant_colony::stats::ColonyStats;
use ant_colony::AntSimulation;
use ui::UiState;

#[derive(Parser, Debug)]
#[command(name = "ant-colony")]
#[command(version, about = "Ant colony foraging on a wrapping pheromone grid", long_about = None)]
struct Cli {
    /// JSON file with configuration overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Layout to build: arena, open or caves
    #[arg(short, long, default_value = "arena")]
    scenario: Scenario,

    /// Random seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ants (overrides the config file)
    #[arg(short = 'n', long)]
    ants: Option<usize>,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Remove food cells once picked up
    #[arg(long)]
    finite_food: bool,

    /// Run without a window and print a JSON report
    #[arg(long)]
    headless: bool,

    /// Ticks to run in headless mode
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Ticks per rendered frame in the viewer
    #[arg(long, default_value_t = config::DEFAULT_STEPS_PER_FRAME)]
    steps_per_frame: u32,

    /// Also write the headless report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log progress every N ticks in headless mode (0 = never)
    #[arg(long, default_value_t = 100)]
    log_every: u64,
}

impl Cli {
    fn sim_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
            None => SimConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(ants) = self.ants {
            config.n_ants = ants;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if self.finite_food {
            config.infinite_food = false;
        }
        Ok(config)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Create a simulation, apply the scenario masks and place the colony.
fn build_simulation(config: SimConfig, masks: &ScenarioMasks) -> Result<AntSimulation> {
    let mut sim = AntSimulation::new(config)?;
    masks.apply(&mut sim)?;
    sim.ready()?;
    Ok(sim)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.sim_config()?;
    config.validate()?;
    let masks = scenario::build(cli.scenario, config.width, config.height, config.seed);
    let sim = build_simulation(config, &masks)?;

    if cli.headless {
        return run_headless(sim, &cli);
    }

    let (width, height) = sim.config().shape();
    if u16::try_from(width).is_err() || u16::try_from(height).is_err() {
        bail!("grid {width}x{height} is too large to display");
    }
    info!(scenario = cli.scenario.label(), width, height, "opening viewer");
    macroquad::Window::from_config(window_conf(), run_viewer(sim, masks, cli.steps_per_frame));
    Ok(())
}

fn run_headless(mut sim: AntSimulation, cli: &Cli) -> Result<()> {
    let report = reporting::run_headless(&mut sim, cli.scenario.label(), cli.ticks, cli.log_every);
    let json = serde_json::to_string_pretty(&report)?;
    if let Some(path) = &cli.report {
        std::fs::write(path, &json).with_context(|| format!("writing report {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }
    println!("{json}");
    Ok(())
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Ant Colony".to_string(),
        window_width: config::WINDOW_WIDTH,
        window_height: config::WINDOW_HEIGHT,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

async fn run_viewer(mut sim: AntSimulation, masks: ScenarioMasks, steps_per_frame: u32) {
    let (width, height) = sim.config().shape();
    let mut buffer = vec![0u8; width * height * 4];
    sim.draw(&mut buffer);
    // Both extents were checked to fit u16 before the window opened.
    let texture = Texture2D::from_rgba8(width as u16, height as u16, &buffer);
    texture.set_filter(FilterMode::Nearest);

    let mut ui_state = UiState::new(steps_per_frame);
    let mut stats = ColonyStats::new(config::STATS_CAPACITY, config::STATS_SAMPLE_INTERVAL);

    loop {
        if is_key_pressed(KeyCode::Space) {
            ui_state.paused = !ui_state.paused;
        }
        if is_key_pressed(KeyCode::Period) {
            ui_state.paused = true;
            ui_state.step_requested = true;
        }

        if std::mem::take(&mut ui_state.restart_requested) {
            match build_simulation(sim.config().clone(), &masks) {
                Ok(fresh) => {
                    sim = fresh;
                    stats = ColonyStats::new(config::STATS_CAPACITY, config::STATS_SAMPLE_INTERVAL);
                    info!("colony restarted");
                }
                Err(err) => error!(%err, "restart failed"),
            }
        }

        for _ in 0..ui_state.ticks_this_frame() {
            sim.step();
            scenario::deplete_picked_food(&mut sim);
            stats.record(&sim);
        }

        sim.draw(&mut buffer);
        texture.update_from_bytes(width as u32, height as u32, &buffer);

        clear_background(BLACK);
        let scale = (screen_width() / width as f32).min(screen_height() / height as f32);
        let size = vec2(width as f32 * scale, height as f32 * scale);
        let offset = (vec2(screen_width(), screen_height()) - size) * 0.5;
        draw_texture_ex(
            &texture,
            offset.x,
            offset.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(size),
                ..Default::default()
            },
        );

        ui::draw_ui(&mut sim, &mut ui_state, &stats);

        next_frame().await;
    }
}
