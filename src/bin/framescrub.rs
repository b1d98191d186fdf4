use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::{info, level_filters::LevelFilter};

#[derive(Parser, Debug)]
#[command(name = "framescrub", version)]
struct Cli {
    /// More logging (DEBUG).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Less logging (WARN and above).
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the whole sequence and render the frame for one progress value.
    Frame(FrameArgs),
    /// Scroll across a range of offsets and write one PNG per step.
    Sweep(SweepArgs),
    /// Load the sequence and report progress as it is published.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Sequence config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Scroll progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    /// Sequence config JSON.
    #[arg(long)]
    config: PathBuf,

    /// First scroll offset (CSS px).
    #[arg(long, default_value_t = 0.0)]
    from: f64,

    /// Last scroll offset (CSS px); defaults to the end of the scroll window.
    #[arg(long)]
    to: Option<f64>,

    /// Number of frames to write.
    #[arg(long, default_value_t = 10)]
    steps: u32,

    /// Directory the numbered PNGs go into.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Sequence config JSON.
    #[arg(long)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start tokio runtime")?;

    match cli.cmd {
        Command::Frame(args) => rt.block_on(cmd_frame(args)),
        Command::Sweep(args) => rt.block_on(cmd_sweep(args)),
        Command::Probe(args) => rt.block_on(cmd_probe(args)),
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else if cli.quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_config(path: &Path) -> anyhow::Result<framescrub::ScrubConfig> {
    framescrub::ScrubConfig::from_path(path)
        .with_context(|| format!("load config '{}'", path.display()))
}

fn start_loader(
    cfg: &framescrub::ScrubConfig,
    config_path: &Path,
) -> anyhow::Result<framescrub::FrameLoader<framescrub::FsFrameSource>> {
    let root = framescrub::ScrubConfig::frames_root(config_path);
    let source = framescrub::FsFrameSource::new(root);
    let mut loader = framescrub::FrameLoader::new(source, cfg.loader.clone());
    loader.load(cfg.sequence.clone())?;
    Ok(loader)
}

/// Load every frame, reporting how many came through.
async fn load_all(
    cfg: &framescrub::ScrubConfig,
    config_path: &Path,
) -> anyhow::Result<framescrub::FrameSnapshot> {
    let mut loader = start_loader(cfg, config_path)?;
    loader.settled().await;
    let snapshot = loader.snapshot();
    if snapshot.populated() == 0 && !snapshot.is_empty() {
        anyhow::bail!(
            "none of the {} frames under '{}' could be loaded",
            snapshot.len(),
            cfg.sequence.base_path
        );
    }
    info!(
        loaded = snapshot.populated(),
        total = snapshot.len(),
        "frames ready"
    );
    Ok(snapshot)
}

fn make_scrubber(cfg: &framescrub::ScrubConfig) -> framescrub::Scrubber {
    let compositor = framescrub::FrameCompositor::new(cfg.surface, cfg.compositor);
    framescrub::Scrubber::new(cfg.scroll.mapper(), compositor)
}

async fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&args.progress) {
        anyhow::bail!("--progress must be within [0, 1], got {}", args.progress);
    }
    let cfg = read_config(&args.config)?;
    let frames = load_all(&cfg, &args.config).await?;

    let mut scrubber = make_scrubber(&cfg);
    let tick = scrubber.render_at(args.progress, &frames);
    scrubber.compositor().surface().save_png(&args.out)?;

    info!(frame = ?tick.frame_index, progress = tick.progress, "rendered");
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    if args.steps == 0 {
        anyhow::bail!("--steps must be >= 1");
    }
    let cfg = read_config(&args.config)?;
    let frames = load_all(&cfg, &args.config).await?;

    let mut scrubber = make_scrubber(&cfg);
    if let Some(smoother) = cfg.smoothing {
        scrubber = scrubber.with_smoother(smoother);
    }
    let to = args.to.unwrap_or_else(|| scrubber.mapper().scroll_range().1);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    for step in 0..args.steps {
        let y = if args.steps == 1 {
            args.from
        } else {
            framescrub::lerp(args.from, to, f64::from(step) / f64::from(args.steps - 1))
        };
        scrubber.on_scroll(y, &frames);
        // One 60 Hz animation frame per step.
        let tick = scrubber.tick(1.0 / 60.0, &frames);

        let out = args.out_dir.join(format!("scrub_{}.png", framescrub::pad3(u64::from(step))));
        scrubber.compositor().surface().save_png(&out)?;
        info!(step, scroll_y = y, progress = tick.progress, frame = ?tick.frame_index, "wrote {}", out.display());
    }

    eprintln!("wrote {} frames to {}", args.steps, args.out_dir.display());
    Ok(())
}

async fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args.config)?;
    let mut loader = start_loader(&cfg, &args.config)?;
    let mut rx = loader.subscribe();

    let mut last = None;
    loop {
        let p = *rx.borrow_and_update();
        if last != Some(p) {
            info!(
                loaded = p.loaded_count,
                total = p.frame_count,
                first_frame = p.first_frame_loaded,
                "progress {:.0}%",
                p.fraction() * 100.0
            );
            last = Some(p);
        }
        if p.is_complete() || !loader.is_loading() {
            break;
        }
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
        }
    }
    loader.settled().await;

    let snapshot = loader.snapshot();
    println!(
        "{}: {} of {} frames decoded",
        cfg.sequence.base_path,
        snapshot.populated(),
        snapshot.len()
    );
    Ok(())
}
