// Copyright (c) 2024 Mike Tsao

//! Renders the soundtracks and motion cues for a batch of videos.

use clap::{Args, Parser, Subcommand};
use reelsynth::{motion::MotionTrack, prelude::*};
use std::{path::PathBuf, time::Instant};

#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Settings file (JSON)
    #[arg(short = 's', long, global = true)]
    settings: Option<PathBuf>,

    /// Cue sheet file (JSON). Defaults to the built-in sheet.
    #[arg(short = 'c', long, global = true)]
    cue_sheet: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short = 'd', long, global = true)]
    debug: bool,

    /// Print version and exit
    #[arg(short = 'v', long)]
    version: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render soundtracks as WAV files
    Render(RenderArgs),
    /// List the videos in the cue sheet
    List,
    /// Write the per-frame flash and shake values for one video
    Motion(MotionArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Videos to render. Renders all of them if none are given.
    names: Vec<String>,

    /// Override every video's duration, in seconds
    #[arg(long)]
    duration: Option<f64>,

    /// Where to write the WAV files
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Seed for the noise sources, for repeatable renders
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct MotionArgs {
    /// The video
    name: String,

    /// Frames per second
    #[arg(long)]
    fps: Option<f64>,

    /// Output file. Prints to stdout if not given.
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.debug { "debug" } else { "info" }),
    )
    .init();

    if cli.version {
        println!("reelsynth {}", reelsynth::app_version());
        return Ok(());
    }

    let settings = match &cli.settings {
        Some(path) => RenderSettings::load(path)?,
        None => RenderSettings::default(),
    };
    let sheet = match &cli.cue_sheet {
        Some(path) => CueSheet::load(path)?,
        None => CueSheet::builtin(),
    };

    match cli.command {
        Some(Command::Render(args)) => render(args, settings, &sheet),
        Some(Command::List) | None => {
            list(&sheet);
            Ok(())
        }
        Some(Command::Motion(args)) => motion(args, settings, &sheet),
    }
}

fn render(args: RenderArgs, mut settings: RenderSettings, sheet: &CueSheet) -> anyhow::Result<()> {
    if let Some(output_dir) = args.output_dir {
        settings.set_output_dir(output_dir);
    }
    if args.seed.is_some() {
        settings.set_seed(args.seed);
    }
    let duration_override = match args.duration {
        Some(d) if VideoCue::is_valid_duration(Seconds(d)) => Some(Seconds(d)),
        Some(d) => {
            return Err(anyhow::anyhow!(
                "duration {d} must be in (0, {}]",
                VideoCue::MAX_DURATION.0
            ))
        }
        None => None,
    };

    let videos = sheet.select(&args.names)?;
    std::fs::create_dir_all(settings.output_dir()).map_err(|e| {
        anyhow::format_err!("Unable to create {:?}: {}", settings.output_dir(), e)
    })?;

    log::info!(
        "Rendering {} video(s) at {} into {:?}",
        videos.len(),
        settings.sample_rate(),
        settings.output_dir()
    );
    let total_start = Instant::now();
    let mut renderer = settings.renderer();
    let exporter = settings.exporter();
    for (i, video) in videos.iter().enumerate() {
        log::info!("[{}/{}] {}...", i + 1, videos.len(), video.name);
        let start = Instant::now();
        let signal = renderer.render(video, duration_override);
        let path = settings.output_path_for(&video.name);
        exporter.export_to_wav(&signal, &path)?;
        log::info!(
            "  -> {path:?} ({:.1}s)",
            start.elapsed().as_secs_f64()
        );
    }
    log::info!("All done in {:.0}s", total_start.elapsed().as_secs_f64());
    Ok(())
}

fn list(sheet: &CueSheet) {
    println!("{:<16} {:>8} {:<10} {:>9} {:>4}", "name", "duration", "style", "tempo", "sfx");
    for video in sheet.videos.iter() {
        println!(
            "{:<16} {:>8} {:<10} {:>9} {:>4}",
            video.name,
            video.duration.to_string(),
            video.style.to_string(),
            video.effective_tempo().to_string(),
            video.sfx.len()
        );
    }
}

fn motion(args: MotionArgs, settings: RenderSettings, sheet: &CueSheet) -> anyhow::Result<()> {
    let fps = args.fps.unwrap_or_else(|| settings.fps());
    let track = MotionTrack::for_video(sheet.find(&args.name)?, fps)?;
    log::info!(
        "{}: {} frames, {} with effects",
        track.name,
        track.frames.len(),
        track.active_frames().count()
    );
    match args.out {
        Some(path) => track.save(&path)?,
        None => println!("{}", track.to_json()?),
    }
    Ok(())
}
