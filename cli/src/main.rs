use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use dirs::home_dir;
use ethers::types::Address;
use eyre::{eyre, Result};
use tracing::{error, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::FmtSubscriber;

use client::ClientBuilder;
use common::types::{ConfirmWith, Correlation};
use config::{CliConfig, Config};
use store::{PostgresStore, RecordStore};
use timing::{latest_input_time, latest_notice_time, latest_report_time};

use crate::bench::Benchmark;

mod bench;

#[tokio::main]
async fn main() {
    enable_tracer();

    let cli = Cli::parse();
    let res = match cli.command {
        Command::Run(args) => run(args).await,
        Command::Latest(args) => latest(args).await,
    };

    if let Err(err) = res {
        error!(target: "rollup_bench::runner", error = %err);
        exit(1);
    }
}

fn enable_tracer() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()
        .expect("invalid env filter");

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("subscriber set failed");
}

async fn run(args: RunArgs) -> Result<()> {
    let config = args.config.load_with(&args.as_cli_config())?;

    let store = Arc::new(PostgresStore::connect(&config.database()).await?);
    let client = ClientBuilder::new().config(config.clone()).build().await?;

    let report = Benchmark::new(client, store.clone(), &config).run().await;

    // every other handle died with the benchmark
    if let Ok(store) = Arc::try_unwrap(store) {
        store.close().await;
    }

    let report = report?;
    info!(
        target: "rollup_bench::runner",
        "benchmark finished with token {:?}", report.token
    );

    Ok(())
}

async fn latest(args: LatestArgs) -> Result<()> {
    let config = args.config.load()?;
    let store = PostgresStore::connect(&config.database()).await?;

    let input = latest_input_time(&store).await?;
    let notice = latest_notice_time(&store).await?;
    let report = latest_report_time(&store).await?;
    info!(
        target: "rollup_bench::runner",
        input, notice, report, "latest logical times on {}", store.name()
    );

    store.close().await;
    Ok(())
}

#[derive(Parser)]
#[clap(version, about)]
/// Measures how long a rollup dapp takes to process token streams
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Deploy a token, fund the dapp and time stream creation
    #[clap(name = "run")]
    Run(RunArgs),
    /// Print the newest logical time of every record kind
    #[clap(name = "latest")]
    Latest(LatestArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    config: ConfigArgs,
    #[clap(long, alias = "streamNumber")]
    stream_number: Option<u64>,
    #[clap(long)]
    token: Option<Address>,
    #[clap(long)]
    rpc_url: Option<String>,
    #[clap(long)]
    private_key: Option<String>,
    #[clap(long)]
    chain_id: Option<u64>,
    #[clap(long)]
    deployments_dir: Option<PathBuf>,
    #[clap(long)]
    token_artifact: Option<PathBuf>,
    #[clap(long)]
    poll_interval_ms: Option<u64>,
    #[clap(long)]
    max_poll_attempts: Option<u64>,
    #[clap(long)]
    correlation: Option<Correlation>,
    #[clap(long)]
    confirm_with: Option<ConfirmWith>,
}

#[derive(Args, Debug)]
struct LatestArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

/// Options shared by every command.
#[derive(Args, Debug, Default)]
struct ConfigArgs {
    #[clap(short, long, default_value = "localhost")]
    network: String,
    #[clap(short, long, env = "ROLLUP_BENCH_CONFIG")]
    config: Option<PathBuf>,
    #[clap(long)]
    db_host: Option<String>,
    #[clap(long)]
    db_port: Option<u16>,
    #[clap(long)]
    db_user: Option<String>,
    #[clap(long)]
    db_password: Option<String>,
    #[clap(long)]
    db_name: Option<String>,
}

impl ConfigArgs {
    fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => home_dir()
                .map(|home| home.join(".rollup-bench/rollup-bench.toml"))
                .ok_or(eyre!("cannot find home directory")),
        }
    }

    fn as_cli_config(&self) -> CliConfig {
        CliConfig {
            db_host: self.db_host.clone(),
            db_port: self.db_port,
            db_user: self.db_user.clone(),
            db_password: self.db_password.clone(),
            db_name: self.db_name.clone(),
            ..Default::default()
        }
    }

    fn load_with(&self, cli_config: &CliConfig) -> Result<Config> {
        let config_path = self.config_path()?;
        Ok(Config::from_file(&config_path, &self.network, cli_config)?)
    }

    fn load(&self) -> Result<Config> {
        self.load_with(&self.as_cli_config())
    }
}

impl RunArgs {
    fn as_cli_config(&self) -> CliConfig {
        CliConfig {
            rpc_url: self.rpc_url.clone(),
            private_key: self.private_key.clone(),
            chain_id: self.chain_id,
            deployments_dir: self.deployments_dir.clone(),
            token_artifact: self.token_artifact.clone(),
            token: self.token,
            poll_interval_ms: self.poll_interval_ms,
            max_poll_attempts: self.max_poll_attempts,
            correlation: self.correlation,
            confirm_with: self.confirm_with,
            stream_number: self.stream_number,
            ..self.config.as_cli_config()
        }
    }
}
