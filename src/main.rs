use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use version_updater::config::{FetcherConfig, log_path};
use version_updater::logging::init_logging;
use version_updater::version::{
    CheckType, MapResolver, Source, VersionBuilder, VersionFetchResult,
};

#[derive(Parser)]
#[command(name = "version-updater")]
#[command(version, about = "Check whether an application or plugin is up to date")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the remote descriptor and compare it with the current version
    Check(CheckArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// Installed version
    #[arg(long)]
    current: String,

    /// URL of the remote .kupdter descriptor
    #[arg(long)]
    url: String,

    #[arg(long, default_value = "app")]
    name: String,

    #[arg(long, value_enum, default_value_t = StrategyArg::Numeric)]
    strategy: StrategyArg,

    /// Identifier mapping for the resolvable strategy, e.g. `beta=1.1`
    #[arg(long = "resolve", value_parser = parse_mapping)]
    resolve: Vec<(String, String)>,

    /// JSON file with fetcher settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file, defaults to the data directory
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Exact,
    Numeric,
    Resolvable,
}

impl From<StrategyArg> for CheckType {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Exact => CheckType::ExactId,
            StrategyArg::Numeric => CheckType::Numeric,
            StrategyArg::Resolvable => CheckType::ResolvableId,
        }
    }
}

fn parse_mapping(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((id, token)) if !id.trim().is_empty() => {
            Ok((id.trim().to_string(), token.trim().to_string()))
        }
        _ => Err(format!("expected ID=VERSION, got {:?}", raw)),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Check(args) => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(check(args)),
    }
}

async fn check(args: CheckArgs) -> anyhow::Result<()> {
    let log_file = args.log_file.clone().unwrap_or_else(log_path);
    let _guard = init_logging(&log_file, false)?;

    let fetcher_config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {:?}", path))?;
            serde_json::from_str::<FetcherConfig>(&raw)
                .with_context(|| format!("Failed to parse config {:?}", path))?
        }
        None => FetcherConfig::default(),
    };

    let source = Source::new(args.name, args.current, args.url);
    let mut builder = VersionBuilder::new(source)
        .with_strategy(args.strategy.into())
        .with_fetcher_config(fetcher_config);

    if !args.resolve.is_empty() {
        let resolver: MapResolver = args.resolve.into_iter().collect();
        builder = builder.with_resolver(Arc::new(resolver))?;
    }

    let updater = builder.build()?;
    let result = updater.get().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&*result)?);
    } else {
        print_result(&result);
    }

    Ok(())
}

fn print_result(result: &VersionFetchResult) {
    if result.is_up_to_date() {
        println!("Up to date ({})", result.current_version());
        return;
    }

    println!(
        "Update available: {} -> {}",
        result.current_version(),
        result.remote_version()
    );
    if !result.update_note().is_empty() {
        println!("{}", result.update_note());
    }
    for entry in result.changelog() {
        println!("  - {}", entry);
    }
}
