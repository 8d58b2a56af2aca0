use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use marenimalt_core::{
    sanitize_filename, Duration, MarenimaltConfig, Quality, DEFAULT_CONFIG_FILE,
    DEFAULT_MAX_FILENAME_LEN,
};
use marenimalt_encode::{
    Exporter, FfmpegRenderer, FfprobeProbe, FixedProbe, ManifestRenderer,
};
use marenimalt_ir::{AudioProbe, Marenimalt, SequenceMode, Timeline};

#[derive(Parser)]
#[command(
    name = "marenimalt",
    version,
    about = "Marenimalt - narrated dialogue videos from record files",
    long_about = "Marenimalt turns a list of dialogue records (text, speaker image, voice type, audio clip)\ninto a captioned video with speaker portraits and synchronized audio."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the directive sequence for a record file
    Plan {
        /// Path to the .json or .csv record file
        #[arg()]
        records: PathBuf,

        /// Config file (default: ./marenimalt.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Keep record order instead of grouping by content and speaker
        #[arg(long)]
        ordered: bool,

        /// Print the directives as JSON
        #[arg(long)]
        json: bool,

        /// Treat every audio clip as this many seconds instead of probing it
        #[arg(long, value_name = "SECONDS")]
        assume_duration: Option<f64>,
    },

    /// Render a record file to video
    Export {
        /// Path to the .json or .csv record file
        #[arg()]
        records: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Config file (default: ./marenimalt.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Keep record order instead of grouping by content and speaker
        #[arg(long)]
        ordered: bool,

        /// Output quality: low, medium, high, production, 4k
        #[arg(short, long)]
        quality: Option<Quality>,

        /// Don't open the video once it is written
        #[arg(long)]
        no_preview: bool,

        /// Skip rendering when the output is already up to date
        #[arg(long)]
        cache: bool,

        /// Write a JSON render manifest instead of encoding video
        #[arg(long)]
        manifest: bool,
    },

    /// Write a default config file
    Init {
        /// Where to write the config
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print a name made safe for use as a file name
    Sanitize {
        #[arg()]
        name: String,

        #[arg(long, default_value_t = DEFAULT_MAX_FILENAME_LEN)]
        max_length: usize,
    },

    /// Display version and tool availability
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `plan --json` output stays machine readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Plan {
            records,
            config,
            ordered,
            json,
            assume_duration,
        } => cmd_plan(&records, config, ordered, json, assume_duration),
        Commands::Export {
            records,
            output,
            config,
            ordered,
            quality,
            no_preview,
            cache,
            manifest,
        } => cmd_export(ExportArgs {
            records,
            output,
            config,
            ordered,
            quality,
            no_preview,
            cache,
            manifest,
        }),
        Commands::Init { path, force } => cmd_init(&path, force),
        Commands::Sanitize { name, max_length } => {
            println!("{}", sanitize_filename(&name, max_length));
            Ok(())
        }
        Commands::Info => cmd_info(),
    }
}

fn mode(ordered: bool) -> SequenceMode {
    if ordered {
        SequenceMode::Ordered
    } else {
        SequenceMode::Grouped
    }
}

/// `--config` if given, else `./marenimalt.toml` if it exists, else defaults.
fn load_config(explicit: Option<PathBuf>) -> Result<MarenimaltConfig> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !local.exists() {
                tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                return Ok(MarenimaltConfig::default());
            }
            local
        }
    };
    let config = MarenimaltConfig::load_from_file(&path)
        .with_context(|| format!("failed to load config: {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(config)
}

fn load_project(records: &Path, config: Option<PathBuf>) -> Result<Marenimalt> {
    let config = load_config(config)?;
    Marenimalt::load(records, config)
        .with_context(|| format!("failed to load records: {}", records.display()))
}

fn cmd_plan(
    records: &Path,
    config: Option<PathBuf>,
    ordered: bool,
    json: bool,
    assume_duration: Option<f64>,
) -> Result<()> {
    let project = load_project(records, config)?;

    let mut probe: Box<dyn AudioProbe> = match assume_duration {
        Some(seconds) => Box::new(FixedProbe(Duration::from_seconds(seconds))),
        None => Box::new(FfprobeProbe::new()),
    };
    let directives = project.plan(probe.as_mut(), mode(ordered))?;
    let timeline = Timeline::from_directives(&directives)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&directives)?);
    } else {
        for (i, directive) in directives.iter().enumerate() {
            println!("{:>4}  {}", i, directive);
        }
    }

    tracing::info!(
        "{} records -> {} directives, {}",
        project.records().len(),
        directives.len(),
        timeline.duration
    );
    Ok(())
}

struct ExportArgs {
    records: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    ordered: bool,
    quality: Option<Quality>,
    no_preview: bool,
    cache: bool,
    manifest: bool,
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let project = load_project(&args.records, args.config)?;

    let mut render = project.config().render.clone();
    if let Some(quality) = args.quality {
        render.quality = quality;
    }
    if args.no_preview {
        render.preview = false;
    }
    if args.cache {
        render.disable_caching = false;
    }

    let mode = mode(args.ordered);
    let report = if args.manifest {
        render.preview = false;
        Exporter::new(FfprobeProbe::new(), ManifestRenderer).export(
            &project,
            &args.output,
            &render,
            mode,
        )?
    } else {
        if !FfmpegRenderer::is_available() {
            anyhow::bail!(
                "ffmpeg not found in PATH. Install FFmpeg: https://ffmpeg.org/download.html"
            );
        }
        Exporter::ffmpeg().export(&project, &args.output, &render, mode)?
    };

    if report.cached {
        println!("{} is up to date", report.output.display());
    } else {
        println!(
            "Wrote {} ({} directives, {})",
            report.output.display(),
            report.directives,
            report.duration
        );
    }
    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("'{}' already exists (use --force to overwrite)", path.display());
    }
    MarenimaltConfig::default()
        .save_to_file(path)
        .with_context(|| format!("failed to write config: {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn cmd_info() -> Result<()> {
    let status = |available: bool| if available { "available" } else { "NOT FOUND" };
    println!("Marenimalt");
    println!("   Version:   {}", env!("CARGO_PKG_VERSION"));
    println!("   Encoder:   FFmpeg (H.264/AAC)");
    println!("   ffmpeg:    {}", status(FfmpegRenderer::is_available()));
    println!("   ffprobe:   {}", status(FfprobeProbe::is_available()));
    Ok(())
}
