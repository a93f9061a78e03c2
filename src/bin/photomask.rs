use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use photomask::{
    AppConfig, Compositor, MaskStore, OverlayAsset, ProcessReport, TargetFormat, logging,
};
use rayon::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "photomask", version)]
struct Cli {
    /// JSON config file (compositor tunables, mask locations, logging).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter override, e.g. `debug` or `photomask=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit JSON log lines.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a single photo.
    Compose(ComposeArgs),
    /// Composite many photos in parallel into a directory.
    Batch(BatchArgs),
    /// List the built-in canvas presets.
    Formats,
    /// List the registered masks.
    Masks,
}

#[derive(Args, Debug)]
struct JobArgs {
    /// Canvas preset.
    #[arg(long, value_enum, default_value_t = FormatChoice::Stories)]
    format: FormatChoice,

    /// Custom canvas width (requires --height; overrides --format).
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Custom canvas height (requires --width).
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Registered mask id.
    #[arg(long, default_value = "1", conflicts_with = "mask_file")]
    mask: String,

    /// Use this overlay image directly instead of the registry.
    #[arg(long)]
    mask_file: Option<PathBuf>,

    /// Overlay width as a fraction of canvas width.
    #[arg(long)]
    scale: Option<f64>,

    /// JPEG quality (1-100).
    #[arg(long)]
    quality: Option<u8>,

    /// Print the geometry report as JSON on stdout.
    #[arg(long, default_value_t = false)]
    report: bool,
}

#[derive(Args, Debug)]
struct ComposeArgs {
    /// Input photo.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    job: JobArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Input photos.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for `<stem>.jpg` outputs.
    #[arg(long)]
    out_dir: PathBuf,

    /// Worker threads (defaults to rayon's choice).
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    job: JobArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Stories,
    Square,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    config.logging.json |= cli.json_logs;
    logging::init_logging(&config.logging);

    match cli.cmd {
        Command::Compose(args) => cmd_compose(&config, args),
        Command::Batch(args) => cmd_batch(&config, args),
        Command::Formats => cmd_formats(),
        Command::Masks => cmd_masks(&config),
    }
}

fn cmd_compose(config: &AppConfig, args: ComposeArgs) -> anyhow::Result<()> {
    let (compositor, overlay, target) = prepare_job(config, &args.job)?;
    let report = compose_one(&compositor, &overlay, &target, &args.in_path, &args.out)?;
    if args.job.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_batch(config: &AppConfig, args: BatchArgs) -> anyhow::Result<()> {
    let (compositor, overlay, target) = prepare_job(config, &args.job)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = args.threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build().context("build worker pool")?;

    let results: Vec<(PathBuf, anyhow::Result<ProcessReport>)> = pool.install(|| {
        args.inputs
            .par_iter()
            .map(|input| {
                let out = batch_output_path(&args.out_dir, input);
                let res = compose_one(&compositor, &overlay, &target, input, &out);
                (out, res)
            })
            .collect()
    });

    let mut failed = 0usize;
    for (out, res) in &results {
        match res {
            Ok(report) => {
                if args.job.report {
                    println!("{}", serde_json::to_string(report)?);
                }
                eprintln!("wrote {}", out.display());
            }
            Err(e) => {
                failed += 1;
                eprintln!("failed {}: {e:#}", out.display());
            }
        }
    }
    anyhow::ensure!(failed == 0, "{failed} of {} images failed", results.len());
    Ok(())
}

fn cmd_formats() -> anyhow::Result<()> {
    for f in TargetFormat::presets() {
        println!("{}\t{}x{}\t{}", f.kind, f.width, f.height, f.kind.callback_data());
    }
    Ok(())
}

fn cmd_masks(config: &AppConfig) -> anyhow::Result<()> {
    let store = mask_store(config)?;
    for e in store.entries() {
        let scale = e
            .scale
            .map_or_else(|| "default".to_string(), |s| s.to_string());
        println!(
            "{}\t{}\t{}\t{}",
            e.id,
            e.name,
            store.root().join(&e.path).display(),
            scale
        );
    }
    Ok(())
}

fn prepare_job(
    config: &AppConfig,
    job: &JobArgs,
) -> anyhow::Result<(Compositor, OverlayAsset, TargetFormat)> {
    let mut compositor_cfg = config.compositor.clone();
    if let Some(q) = job.quality {
        compositor_cfg.quality = q;
    }
    let compositor = Compositor::new(compositor_cfg)?;

    let target = match (job.width, job.height) {
        (Some(w), Some(h)) => TargetFormat::custom(w, h)?,
        _ => match job.format {
            FormatChoice::Stories => TargetFormat::stories(),
            FormatChoice::Square => TargetFormat::square(),
        },
    };

    let mut overlay = match &job.mask_file {
        Some(path) => OverlayAsset::from_path(path, None)?,
        None => mask_store(config)?.load(&job.mask)?,
    };
    if job.scale.is_some() {
        overlay.scale = job.scale;
    }
    Ok((compositor, overlay, target))
}

fn mask_store(config: &AppConfig) -> anyhow::Result<MaskStore> {
    Ok(match &config.mask_manifest {
        Some(path) => MaskStore::from_manifest(path)?,
        None => MaskStore::builtin(config.assets_dir()),
    })
}

fn compose_one(
    compositor: &Compositor,
    overlay: &OverlayAsset,
    target: &TargetFormat,
    input: &Path,
    out: &Path,
) -> anyhow::Result<ProcessReport> {
    let source =
        std::fs::read(input).with_context(|| format!("read input '{}'", input.display()))?;
    let output = compositor
        .process_image(&source, overlay, target)
        .with_context(|| format!("process '{}'", input.display()))?;
    write_atomic(out, &output.bytes)?;
    Ok(output.report)
}

fn batch_output_path(out_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    out_dir.join(format!("{stem}.jpg"))
}

fn write_atomic(out: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let mut part = out.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);
    std::fs::write(&part, bytes).with_context(|| format!("write '{}'", part.display()))?;
    std::fs::rename(&part, out)
        .with_context(|| format!("move '{}' into place", out.display()))?;
    Ok(())
}
