use std::{
    fs::File,
    io::BufWriter,
    path::PathBuf,
};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "quakelapse", version)]
struct Cli {
    /// Run configuration JSON; flags below override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download the earthquake catalogue as CSV, one month range per request.
    Fetch(FetchArgs),
    /// Render one image per closed time window (resumes over existing frames).
    Frames(FramesArgs),
    /// Encode the frames directory to MP4 (requires `ffmpeg` on PATH).
    Video(VideoArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Output CSV path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// First range start (RFC 3339 or ISO-8601 UTC).
    #[arg(long, value_parser = parse_utc)]
    start: Option<DateTime<Utc>>,

    /// Stop once a range would start after this instant (default: now).
    #[arg(long, value_parser = parse_utc)]
    end: Option<DateTime<Utc>>,

    /// Months per request.
    #[arg(long)]
    step_months: Option<u32>,
}

#[derive(Args, Debug)]
struct FramesArgs {
    /// Input catalogue CSV.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Frame output directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Frame image extension (png, jpg, ...).
    #[arg(long)]
    ext: Option<String>,

    /// Window advance policy.
    #[arg(long, value_enum)]
    advance: Option<AdvanceChoice>,

    /// Windows an entity stays visible.
    #[arg(long)]
    fade_frames: Option<u32>,

    /// Background image resized to the canvas.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Extra font directory for the date label.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Accept timestamps that go backwards.
    #[arg(long)]
    allow_unordered: bool,
}

#[derive(Args, Debug)]
struct VideoArgs {
    /// Frame input directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Output MP4 path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Fail instead of replacing an existing video.
    #[arg(long)]
    no_overwrite: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AdvanceChoice {
    Single,
    CatchUp,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = match &cli.config {
        Some(path) => quakelapse::RunConfig::from_path(path)?,
        None => quakelapse::RunConfig::default(),
    };

    match cli.cmd {
        Command::Fetch(args) => cmd_fetch(cfg, args),
        Command::Frames(args) => cmd_frames(cfg, args),
        Command::Video(args) => cmd_video(cfg, args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "quakelapse=warn",
        1 => "quakelapse=info",
        2 => "quakelapse=debug",
        _ => "quakelapse=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_utc(raw: &str) -> Result<DateTime<Utc>, String> {
    quakelapse::parse_timestamp(raw).ok_or_else(|| format!("invalid timestamp '{raw}'"))
}

fn cmd_fetch(mut cfg: quakelapse::RunConfig, args: FetchArgs) -> anyhow::Result<()> {
    if let Some(out) = args.out {
        cfg.data_path = out;
    }
    if let Some(start) = args.start {
        cfg.fetch.start = start;
    }
    if let Some(end) = args.end {
        cfg.fetch.end = Some(end);
    }
    if let Some(step) = args.step_months {
        cfg.fetch.step_months = step;
    }

    let end = cfg.fetch.end.unwrap_or_else(Utc::now);
    quakelapse::ensure_parent_dir(&cfg.data_path)?;
    let file = File::create(&cfg.data_path)
        .with_context(|| format!("create data file '{}'", cfg.data_path.display()))?;
    let mut out = BufWriter::new(file);

    let mut source = quakelapse::UsgsSource::new(cfg.fetch.endpoint.clone())?;
    let stats = quakelapse::fetch_all(
        &mut source,
        cfg.fetch.start,
        end,
        cfg.fetch.step_months,
        &mut out,
    )?;

    tracing::info!(
        ranges = stats.ranges,
        rows = stats.rows,
        bytes = stats.bytes,
        out = %cfg.data_path.display(),
        "fetch complete"
    );
    Ok(())
}

fn cmd_frames(mut cfg: quakelapse::RunConfig, args: FramesArgs) -> anyhow::Result<()> {
    if let Some(data) = args.data {
        cfg.data_path = data;
    }
    if let Some(dir) = args.frames_dir {
        cfg.frames_dir = dir;
    }
    if let Some(ext) = args.ext {
        cfg.image_ext = ext;
    }
    if let Some(choice) = args.advance {
        cfg.advance = match choice {
            AdvanceChoice::Single => quakelapse::AdvancePolicy::Single,
            AdvanceChoice::CatchUp => quakelapse::AdvancePolicy::CatchUp,
        };
    }
    if let Some(n) = args.fade_frames {
        cfg.fade_frames = n;
    }
    if args.background.is_some() {
        cfg.background = args.background;
    }
    if args.fonts_dir.is_some() {
        cfg.fonts_dir = args.fonts_dir;
    }
    if args.allow_unordered {
        cfg.strict_order = false;
    }
    cfg.validate()?;

    let mut coordinator = quakelapse::FrameCoordinator::from_config(&cfg)?;
    let mut surface = quakelapse::CpuSurface::new(
        cfg.render.clone(),
        cfg.background.as_deref(),
        cfg.fonts_dir.as_deref(),
    )?;
    let mut store = quakelapse::FramesDir::create(&cfg.frames_dir, &cfg.image_ext)?;
    let events = quakelapse::open_events(&cfg.data_path, cfg.strict_order)?;

    let stats = coordinator.run(events, &mut surface, &mut store)?;
    tracing::info!(
        events = stats.events,
        rendered = stats.frames_rendered,
        skipped = stats.frames_skipped,
        frames_dir = %cfg.frames_dir.display(),
        "frames complete"
    );
    Ok(())
}

fn cmd_video(mut cfg: quakelapse::RunConfig, args: VideoArgs) -> anyhow::Result<()> {
    if let Some(dir) = args.frames_dir {
        cfg.frames_dir = dir;
    }
    if let Some(out) = args.out {
        cfg.video.out_path = out;
    }
    if let Some(fps) = args.fps {
        cfg.video.fps = fps;
    }
    if args.no_overwrite {
        cfg.video.overwrite = false;
    }

    let opts = quakelapse::VideoEncodeOpts {
        frames_dir: cfg.frames_dir.clone(),
        ext: cfg.image_ext.clone(),
        fps: cfg.video.fps,
        out_path: cfg.video.out_path.clone(),
        overwrite: cfg.video.overwrite,
    };
    let report = quakelapse::encode_frames_dir(&opts)?;
    eprintln!(
        "wrote {} ({} frames)",
        report.out_path.display(),
        report.frames
    );
    Ok(())
}
