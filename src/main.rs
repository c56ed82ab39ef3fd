use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use sampling_bias::params::{
    DEFAULT_BASE_VELOCITY, DEFAULT_BOUNDARY_FRACTION, DEFAULT_FPS, DEFAULT_HISTORY_LEN, DEFAULT_MAX_SAMPLE,
    DEFAULT_NUM_PARTICLES, DEFAULT_RADIUS_MEAN, DEFAULT_RADIUS_VARIANCE, DEFAULT_SPAWN_VARIANCE,
};
use sampling_bias::{FixedRateTicker, SamplingApp, SimulationParams};

/// Bouncing particles and a movable sampling boundary: watch the sampled
/// average radius drift away from the true one.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of particles
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_PARTICLES)]
    particles: usize,

    /// Mean particle radius
    #[arg(long, default_value_t = DEFAULT_RADIUS_MEAN)]
    radius_mean: f32,

    /// Scale of the normal radius sample
    #[arg(long, default_value_t = DEFAULT_RADIUS_VARIANCE)]
    radius_variance: f32,

    /// speed * pi * radius^2, shared by every particle
    #[arg(long, default_value_t = DEFAULT_BASE_VELOCITY)]
    base_velocity: f32,

    /// Spawn jitter around the canvas centre
    #[arg(long, default_value_t = DEFAULT_SPAWN_VARIANCE)]
    spawn_variance: f32,

    /// Nominal cap on sampled particles
    #[arg(long, default_value_t = DEFAULT_MAX_SAMPLE)]
    max_sample: usize,

    /// Simulation ticks per second
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: f32,

    /// Initial boundary position as a fraction of the canvas width
    #[arg(long, default_value_t = DEFAULT_BOUNDARY_FRACTION)]
    boundary: f32,

    /// Ticks of history kept for the plot
    #[arg(long, default_value_t = DEFAULT_HISTORY_LEN)]
    history: usize,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Initial window width
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Initial window height
    #[arg(long, default_value_t = 720.0)]
    height: f32,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl From<&Args> for SimulationParams {
    fn from(args: &Args) -> Self {
        SimulationParams {
            num_particles: args.particles,
            radius_mean: args.radius_mean,
            radius_variance: args.radius_variance,
            base_velocity: args.base_velocity,
            spawn_variance: args.spawn_variance,
            max_sample: args.max_sample,
            fps: args.fps,
            boundary_fraction: args.boundary,
            history_len: args.history,
            seed: args.seed,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger; RUST_LOG still wins over -v
    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let params = SimulationParams::from(&args);
    params.validate().context("invalid simulation parameters")?;
    let ticker = FixedRateTicker::new(params.fps)?;

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get_physical())
        .build_global()
        .context("failed to build the rayon thread pool")?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    log::info!("starting with {params:?}");
    eframe::run_native(
        "Sampling Bias",
        native_options,
        Box::new(move |_cc| Ok(Box::new(SamplingApp::new(params, ticker)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe exited with an error: {e}"))
}
