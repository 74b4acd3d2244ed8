use std::path::PathBuf;
use std::sync::Arc;

use algo_visualiser_core::{
    within_slider, AlgorithmRegistry, AppConfig, LineId, LineSink, Recorder, RecordingSettings,
    RunOutcome,
};
use algo_visualiser_core::timeline::{MAX_SPEED, MIN_SPEED};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::{listing_sink, numbered_listing, TerminalRenderer};

#[tokio::main]
async fn main() -> algo_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let registry = AlgorithmRegistry::new();

    match cli.command {
        Commands::List => {
            list(&registry);
            Ok(())
        }
        Commands::Show { algorithm } => show(&registry, &algorithm),
        Commands::Run(args) => run(&registry, args).await,
    }
}

fn list(registry: &AlgorithmRegistry) {
    for entry in registry.entries() {
        println!("{:<12} {}", entry.name, entry.title);
    }
}

fn show(registry: &AlgorithmRegistry, name: &str) -> algo_visualiser_core::Result<()> {
    let entry = registry.lookup(name)?;
    println!("{}\n", entry.title);
    print!("{}", numbered_listing(entry.listing));
    Ok(())
}

async fn run(registry: &AlgorithmRegistry, args: RunArgs) -> algo_visualiser_core::Result<()> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;

    if !within_slider(config.animation.speed) {
        tracing::warn!(
            speed = config.animation.speed,
            min = MIN_SPEED,
            max = MAX_SPEED,
            "speed is outside the usual slider range"
        );
    }

    let entry = registry.lookup(&args.algorithm)?;
    let mut controller = registry.controller(entry.name, &config.animation)?;
    tracing::info!(
        algorithm = entry.name,
        speed = config.animation.speed,
        seed = ?config.animation.seed,
        "starting animation"
    );

    let recorder = Recorder::new(RecordingSettings {
        capture_geometry: args.geometry,
        ..RecordingSettings::default()
    });
    let echo = listing_sink(entry.listing, args.quiet);
    let record = recorder.line_sink();
    let sink: LineSink = Arc::new(move |line: LineId| {
        echo(line);
        record(line);
    });
    controller.initialize(
        (TerminalRenderer::new(args.quiet), recorder.clone()),
        config.canvas.width,
        config.canvas.height,
        Some(sink),
    )?;

    let stop = controller.stop_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping animation");
            stop.cleanup();
        }
    });

    let outcome = controller.animate(config.animation.speed).await;
    interrupt.abort();
    let outcome = outcome?;

    match outcome {
        RunOutcome::Completed { steps } => tracing::info!(steps, "animation finished"),
        RunOutcome::Stopped { steps } => tracing::info!(steps, "animation stopped early"),
    }

    if let Some(path) = &args.record {
        recorder.save(path)?;
        let events = recorder.len()?;
        tracing::info!(?path, events, "recording written");
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Step-by-step algorithm visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available algorithms.
    List,
    /// Print the numbered pseudocode listing of an algorithm.
    Show {
        /// One of `bubblesort`, `quicksort`, `bfs`, `dfs`.
        algorithm: String,
    },
    /// Animate an algorithm in the terminal.
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// One of `bubblesort`, `quicksort`, `bfs`, `dfs`.
    algorithm: String,
    /// Speed multiplier; each step waits 1000 / speed milliseconds. The
    /// usual range is 0.5 to 3.0.
    #[arg(short, long)]
    speed: Option<f64>,
    /// Seed for the bar values.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of bars for the sorting algorithms.
    #[arg(long)]
    size: Option<usize>,
    #[arg(long)]
    width: Option<f32>,
    #[arg(long)]
    height: Option<f32>,
    /// JSON configuration file; flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write every frame and line signal to this JSON file.
    #[arg(short, long)]
    record: Option<PathBuf>,
    /// Include laid-out draw commands in the recording.
    #[arg(long)]
    geometry: bool,
    /// Suppress terminal frames and listing lines.
    #[arg(short, long)]
    quiet: bool,
}

impl RunArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(speed) = self.speed {
            config.animation.speed = speed;
        }
        if let Some(seed) = self.seed {
            config.animation.seed = Some(seed);
        }
        if let Some(size) = self.size {
            config.animation.array_size = size;
        }
        if let Some(width) = self.width {
            config.canvas.width = width;
        }
        if let Some(height) = self.height {
            config.canvas.height = height;
        }
    }
}
