use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use genome_resource_manager::domain::{GenomeId, ResourceKind};
use genome_resource_manager::error::GrmError;
use genome_resource_manager::manager::{GenomeManager, ProgressPolicy};
use genome_resource_manager::output::JsonOutput;
use genome_resource_manager::registry::Registry;

#[derive(Parser)]
#[command(name = "grm")]
#[command(about = "Fetch curated genome reference artifacts from blob storage")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    registry: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Download one resource for a registered genome")]
    Download(DownloadArgs),
    #[command(about = "List registered genomes and their available resources")]
    List,
    #[command(about = "Show the locator record for a genome")]
    Show(ShowArgs),
}

#[derive(Args)]
struct DownloadArgs {
    genome: String,

    #[arg(value_enum)]
    resource: ResourceKind,

    #[arg(long, conflicts_with = "no_progress")]
    progress: bool,

    #[arg(long)]
    no_progress: bool,
}

#[derive(Args)]
struct ShowArgs {
    genome: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(grm) = report.downcast_ref::<GrmError>() {
            return ExitCode::from(map_exit_code(grm));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &GrmError) -> u8 {
    match error {
        GrmError::UnregisteredGenome(_) | GrmError::ResourceNotAvailable { .. } => 2,
        GrmError::BackendUnavailable | GrmError::TransferFailed { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = load_registry(cli.registry.as_deref())?;

    match cli.command {
        Commands::Download(args) => run_download(args, registry),
        Commands::List => JsonOutput::print_list(&registry.summarize()).into_diagnostic(),
        Commands::Show(args) => {
            let id = GenomeId::new(args.genome);
            let record = registry
                .lookup(&id)
                .ok_or_else(|| GrmError::UnregisteredGenome(id.to_string()))
                .into_diagnostic()?;
            JsonOutput::print_record(record).into_diagnostic()
        }
    }
}

fn load_registry(path: Option<&Utf8Path>) -> miette::Result<Registry> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path.as_std_path())
                .map_err(|_| GrmError::RegistryRead(path.to_path_buf()))
                .into_diagnostic()?;
            Registry::from_json_str(&content).into_diagnostic()
        }
        None => Registry::builtin().into_diagnostic(),
    }
}

fn run_download(args: DownloadArgs, registry: Registry) -> miette::Result<()> {
    let manager = GenomeManager::with_registry(args.genome, registry).into_diagnostic()?;
    let manager = if args.progress {
        manager.with_progress_policy(ProgressPolicy::all(true))
    } else if args.no_progress {
        manager.with_progress_policy(ProgressPolicy::all(false))
    } else {
        manager
    };
    let report = manager.download_report(args.resource).into_diagnostic()?;
    JsonOutput::print_download(&report).into_diagnostic()
}
