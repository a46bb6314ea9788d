use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use narrative_track::{
    Effect, NarrativeTrack, ScrollGeometry, SharedLayer, TimeMs, TrackConfig, schedule,
};

#[derive(Parser, Debug)]
#[command(name = "narrative-track", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the per-character reveal schedule of a text as JSON.
    Schedule(ScheduleArgs),
    /// Drive a synthetic scroll through a track and print one JSON frame per line.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct ScheduleArgs {
    /// Text to split into character units.
    #[arg(long)]
    text: String,

    /// Delay between consecutive units, in milliseconds.
    #[arg(long, default_value_t = narrative_track::DEFAULT_STAGGER_MS)]
    stagger_ms: u64,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Track configuration JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stage-1 text.
    #[arg(long)]
    text: String,

    /// Height of the tracked region, in px.
    #[arg(long, default_value_t = 4000.0)]
    region_height: f64,

    /// Viewport height, in px.
    #[arg(long, default_value_t = 900.0)]
    viewport_height: f64,

    /// Frames needed to scroll through the whole region.
    #[arg(long, default_value_t = 120)]
    steps: u32,

    /// Display frame duration, in ms.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Extra frames spent pushing past the end of the region.
    #[arg(long, default_value_t = 0)]
    hold: u32,

    /// Scroll back to the top afterwards.
    #[arg(long)]
    back: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Schedule(args) => cmd_schedule(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_config_json(path: &Path) -> anyhow::Result<TrackConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let config = TrackConfig::from_json_reader(BufReader::new(f))
        .with_context(|| format!("parse config '{}'", path.display()))?;
    Ok(config)
}

fn cmd_schedule(args: ScheduleArgs) -> anyhow::Result<()> {
    let schedule = schedule(&args.text, args.stagger_ms);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &schedule).context("write schedule")?;
    writeln!(out)?;
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if args.steps == 0 {
        anyhow::bail!("--steps must be > 0");
    }
    let config = match &args.config {
        Some(path) => read_config_json(path)?,
        None => TrackConfig::default(),
    };

    let layer = SharedLayer::mounted();
    let mut track = NarrativeTrack::new(&config, &args.text, layer.clone());

    let max_scroll = (args.region_height - args.viewport_height).max(0.0);
    let delta = max_scroll / f64::from(args.steps);
    let geometry = |scroll_y: f64| {
        ScrollGeometry::at_scroll(0.0, args.region_height, args.viewport_height, scroll_y)
    };

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut now = 0u64;
    let mut scroll_y = 0.0f64;

    let mut script: Vec<f64> = vec![delta; (args.steps + args.hold) as usize];
    if args.back {
        script.extend(std::iter::repeat_n(-delta, args.steps as usize));
    }

    for d in script {
        now += args.frame_ms;
        scroll_y = (scroll_y + d).clamp(0.0, max_scroll);
        track.notify_scroll(geometry(scroll_y));
        let Some(frame) = track.frame(TimeMs(now)) else {
            continue;
        };
        for effect in &frame.effects {
            match *effect {
                Effect::ScrollTo { y } => scroll_y = y,
            }
        }
        serde_json::to_writer(&mut out, &frame).context("write frame")?;
        writeln!(out)?;
    }

    // Let running reveals and the completion delay play out.
    loop {
        now += args.frame_ms;
        let Some(frame) = track.frame(TimeMs(now)) else {
            break;
        };
        serde_json::to_writer(&mut out, &frame).context("write frame")?;
        writeln!(out)?;
    }

    track.dispose();
    tracing::info!(offset_px = layer.offset_px(), "simulation finished");
    out.flush()?;
    Ok(())
}
