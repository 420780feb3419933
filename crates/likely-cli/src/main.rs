//! `likely` — build the baseline table, score questionnaires, serve the API.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use likely_baseline::{rebuild_from_store, run_baseline_job, BaselineJob, BaselineJobResult, CsvFormat};
use likely_config::Config;
use likely_db::{BaselineRepository, Database};
use likely_scoring::{RiskEngine, RiskForm, StaticBaseline};
use likely_web::state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "likely",
    version,
    about = "Breast-cancer risk context: baseline builder and scoring service"
)]
struct Cli {
    /// Path to likely.toml (defaults to LIKELY_CONFIG, then ./likely.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read historical CSV extracts and rebuild the stored baseline
    BuildBaseline(BuildArgs),
    /// Rebuild the baseline from the historical records already stored
    RebuildBaseline,
    /// Score a questionnaire JSON file and print the result
    Score(ScoreArgs),
    /// Run the HTTP API
    Serve,
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// Directory holding the CSV extracts
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// File name prefix; only `<pattern>*.csv` files are read
    #[arg(long)]
    pattern: Option<String>,

    /// CSV layout: raw (registry codes) or tidy (age, ethnicity, cases)
    #[arg(long)]
    format: Option<CsvFormat>,
}

#[derive(Debug, Args)]
struct ScoreArgs {
    /// Questionnaire answers as a JSON object
    profile: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::BuildBaseline(args) => {
            let job = build_job(&config, args)?;
            let db = open_database(&config).await?;
            report(&run_baseline_job(&job, db).await?)
        }
        Command::RebuildBaseline => {
            let db = open_database(&config).await?;
            report(&rebuild_from_store(db).await?)
        }
        Command::Score(args) => score_file(&config, &args.profile).await,
        Command::Serve => {
            let db = open_database(&config).await?;
            let state = AppState::load(db, config.server.submission_list_limit).await;
            likely_web::serve(state, &config.bind_addr()).await
        }
    }
}

/// Command-line flags win over the `[baseline]` config section.
fn build_job(config: &Config, args: BuildArgs) -> anyhow::Result<BaselineJob> {
    let format = match args.format {
        Some(f) => f,
        None => config
            .baseline
            .format
            .parse::<CsvFormat>()
            .map_err(anyhow::Error::msg)
            .context("invalid [baseline] format")?,
    };
    Ok(BaselineJob {
        data_dir: args.data_dir.unwrap_or_else(|| config.baseline.data_dir.clone()),
        file_prefix: args.pattern.unwrap_or_else(|| config.baseline.file_prefix.clone()),
        format,
    })
}

async fn open_database(config: &Config) -> anyhow::Result<Arc<Database>> {
    let db = Database::open_with(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("opening {}", config.database.url))?;
    db.initialize().await.context("initializing schema")?;
    Ok(Arc::new(db))
}

fn report(result: &BaselineJobResult) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

async fn score_file(config: &Config, path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let form: RiskForm = serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    let db = open_database(config).await?;
    let table = BaselineRepository::new(db).load().await.context("loading baseline")?;
    let engine = RiskEngine::new(Arc::new(StaticBaseline::new(table)));

    let (_, result) = engine.score_form(form)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
