//! sizefit CLI: measurements and size recommendations from JSON inputs.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;
use sizefit::io::{load_measurements, write_json};
use sizefit::recommend::{SizeChart, SizeRecommender, WeightProfile};
use sizefit::{Gender, PipelineConfig, SizingPipeline, SizingRequest};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "sizefit")]
#[command(about = "Estimate body measurements from pose keypoints and recommend garment sizes")]
#[command(version)]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline on a sizing request (JSON) and print the report.
    Measure(MeasureArgs),

    /// Recommend a size for a measurement set (JSON).
    Recommend(RecommendArgs),

    /// Print a built-in size chart as JSON.
    Chart {
        #[arg(long, value_enum, default_value_t = GenderArg::Unisex)]
        gender: GenderArg,
    },
}

#[derive(Debug, Clone, Args)]
struct CommonArgs {
    /// Pipeline config (JSON). Defaults are used if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in chart to score against.
    #[arg(long, value_enum)]
    gender: Option<GenderArg>,

    /// Custom size chart (JSON); replaces the built-in chart.
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Write JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct MeasureArgs {
    /// Sizing request (JSON) with front/back/side observations.
    #[arg(long)]
    input: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Clone, Args)]
struct RecommendArgs {
    /// Measurement set (JSON), e.g. {"chest": 98.0, "shoulder": 46.5}.
    #[arg(long)]
    measurements: PathBuf,

    /// Scoring profile.
    #[arg(long, value_enum)]
    profile: Option<ProfileArg>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GenderArg {
    Male,
    Female,
    Unisex,
}

impl From<GenderArg> for Gender {
    fn from(g: GenderArg) -> Self {
        match g {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
            GenderArg::Unisex => Gender::Unisex,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    Shirt,
    FullBody,
}

impl From<ProfileArg> for WeightProfile {
    fn from(p: ProfileArg) -> Self {
        match p {
            ProfileArg::Shirt => WeightProfile::shirt(),
            ProfileArg::FullBody => WeightProfile::full_body(),
        }
    }
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Measure(args) => run_measure(&args),
        Commands::Recommend(args) => run_recommend(&args),
        Commands::Chart { gender } => emit(&Gender::from(gender).chart(), None),
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: &str) -> CliResult<()> {
    sizefit::core::init_with_level(sizefit::core::level_from_str(level))?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(_level: &str) -> CliResult<()> {
    let _ = tracing_log::LogTracer::init();
    sizefit::core::init_tracing(false);
    Ok(())
}

/// Config from `--config`, then `--gender` / `--chart` on top.
fn load_config(args: &CommonArgs) -> CliResult<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load_json(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(gender) = args.gender {
        config.gender = gender.into();
    }
    if let Some(path) = &args.chart {
        config.size_chart = Some(SizeChart::load_json(path)?);
    }
    Ok(config)
}

fn run_measure(args: &MeasureArgs) -> CliResult<()> {
    let config = load_config(&args.common)?;
    let request = SizingRequest::load_json(&args.input)?;
    info!("loaded request from {}", args.input.display());

    let report = SizingPipeline::new(config)?.run(&request)?;
    emit(&report, args.common.out.as_deref())
}

fn run_recommend(args: &RecommendArgs) -> CliResult<()> {
    let mut config = load_config(&args.common)?;
    if let Some(profile) = args.profile {
        config.profile = profile.into();
    }
    let measurements = load_measurements(&args.measurements)?;

    let mut recommender = SizeRecommender::for_gender(config.gender).with_profile(config.profile);
    if let Some(chart) = config.size_chart {
        recommender = recommender.with_chart(chart);
    }
    let rec = recommender.recommend(&measurements);
    info!("{}", rec.summary());
    emit(&rec, args.common.out.as_deref())
}

fn emit<T: Serialize>(value: &T, out: Option<&Path>) -> CliResult<()> {
    match out {
        Some(path) => write_json(value, path)?,
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
