use clap::{Parser, Subcommand};
use pspcomic::config::{self, Config, ConfigOverrides};
use pspcomic::imaging::{CropMargin, Dimensions, FitPolicy, Margin, OutputFormat, RustBackend};
use pspcomic::{output, process};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Target box and fit policy flags.
#[derive(clap::Args, Clone, Default)]
struct ResizeArgs {
    /// Target width in pixels (0 = derive from height)
    #[arg(long)]
    width: Option<u32>,
    /// Target height in pixels (0 = derive from width)
    #[arg(long)]
    height: Option<u32>,
    /// How the page maps onto the target box
    #[arg(long, value_enum)]
    policy: Option<FitPolicy>,
}

/// Encoder flags.
#[derive(clap::Args, Clone, Default)]
struct EncodeArgs {
    /// Output encoder
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// JPEG quality (1-100)
    #[arg(long)]
    quality: Option<u32>,
}

#[derive(Parser)]
#[command(name = "pspcomic")]
#[command(about = "Prepare scanned comic pages for handheld screens")]
#[command(long_about = "\
Prepare scanned comic pages for handheld screens

Each page goes through the same steps:

  load → trim paper margins → fit to the screen → encode

Margins are found by scanning in from every edge for the first pixel whose
lightness is at or below the threshold. Pages with no such pixel are kept
whole. Fitting never upscales under the default 'scale' policy.

Settings are read from ./pspcomic.toml when present (or --config FILE) and
command-line flags override them.

Run 'pspcomic gen-config' to generate a documented pspcomic.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./pspcomic.toml if it exists)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log each processing step to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Trim, fit and encode a page
    Process {
        input: PathBuf,
        /// Output file (default: <stem>-psp.<ext> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        resize: ResizeArgs,
        /// Lightness at or below which a pixel counts as content
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<i32>,
        /// Keep margins instead of trimming them
        #[arg(long)]
        no_trim: bool,
        #[command(flatten)]
        encode: EncodeArgs,
        /// Print the page report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the margin detected on a page
    Detect {
        input: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<i32>,
        /// Print the raw margin as JSON
        #[arg(long)]
        json: bool,
    },
    /// Trim the detected margin and nothing else
    Trim {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<i32>,
        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Crop explicit margins off a page
    Crop {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = 0)]
        left: u32,
        #[arg(long, default_value_t = 0)]
        top: u32,
        #[arg(long, default_value_t = 0)]
        right: u32,
        #[arg(long, default_value_t = 0)]
        bottom: u32,
        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Fit a page to the target box without trimming
    Resize {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        resize: ResizeArgs,
        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Print a stock pspcomic.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let backend = RustBackend::new();

    match cli.command {
        Command::Process {
            input,
            output: output_path,
            resize,
            threshold,
            no_trim,
            encode,
            json,
        } => {
            let overrides = ConfigOverrides {
                threshold,
                trim: no_trim.then_some(false),
                ..overrides_from(&resize, &encode)
            };
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let output_path = output_path
                .unwrap_or_else(|| process::default_output_path(&input, config.output.format));
            let report = process::process_page(&backend, &input, &output_path, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_page_report(&report);
            }
        }
        Command::Detect {
            input,
            threshold,
            json,
        } => {
            let config = load_config(cli.config.as_deref(), &ConfigOverrides::default())?;
            let threshold = threshold.unwrap_or(config.margin.threshold);
            let margin = process::detect_page(&backend, &input, threshold)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&margin)?);
            } else {
                output::print_margin(&input, threshold, margin);
            }
        }
        Command::Trim {
            input,
            output: output_path,
            threshold,
            encode,
        } => {
            let overrides = ConfigOverrides {
                threshold,
                ..overrides_from(&ResizeArgs::default(), &encode)
            };
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let dims = process::trim_page_strict(
                &backend,
                &input,
                &output_path,
                config.margin.threshold,
                config.output.format,
                config.quality(),
            )?;
            print_written(&input, &output_path, dims, config.output.format);
        }
        Command::Crop {
            input,
            output: output_path,
            left,
            top,
            right,
            bottom,
            encode,
        } => {
            let overrides = overrides_from(&ResizeArgs::default(), &encode);
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let dims = process::crop_page(
                &backend,
                &input,
                &output_path,
                Margin::from(CropMargin {
                    left,
                    top,
                    right,
                    bottom,
                }),
                config.output.format,
                config.quality(),
            )?;
            print_written(&input, &output_path, dims, config.output.format);
        }
        Command::Resize {
            input,
            output: output_path,
            resize,
            encode,
        } => {
            let config = load_config(cli.config.as_deref(), &overrides_from(&resize, &encode))?;
            let dims = process::resize_page(
                &backend,
                &input,
                &output_path,
                config.target(),
                config.resize.policy,
                config.output.format,
                config.quality(),
            )?;
            print_written(&input, &output_path, dims, config.output.format);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins; otherwise warnings only, or debug with `-v`.
fn init_logging(verbose: bool) {
    let default = if verbose { "pspcomic=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve config layers. An explicit `--config` must exist; the default file may not.
fn load_config(
    explicit: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<Config, config::ConfigError> {
    match explicit {
        Some(path) => config::load_layered(path, true, overrides),
        None => config::load_layered(Path::new(config::DEFAULT_CONFIG_FILE), false, overrides),
    }
}

fn overrides_from(resize: &ResizeArgs, encode: &EncodeArgs) -> ConfigOverrides {
    ConfigOverrides {
        width: resize.width,
        height: resize.height,
        policy: resize.policy,
        format: encode.format,
        quality: encode.quality,
        ..Default::default()
    }
}

fn print_written(input: &Path, output_path: &Path, dims: Dimensions, format: OutputFormat) {
    println!(
        "{}",
        output::format_written(input, output_path, dims, format)
    );
}
