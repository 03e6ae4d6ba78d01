//! Learnopoly command-line entry point: opens the LMDB-backed ledger and
//! runs one operation per invocation, printing the result as JSON.

mod commands;
mod config;

use anyhow::{bail, Context};
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;

use commands::LedgerCommand;
use config::DaemonConfig;
use learnopoly_ledger::{Ledger, LedgerEvent, LedgerSnapshot};
use learnopoly_store_lmdb::LmdbStore;
use learnopoly_types::Identity;
use learnopoly_utils::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "learnopoly", about = "Learnopoly social-learning ledger")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for ledger storage.
    #[arg(long, global = true, env = "LEARNOPOLY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Identity performing the operation ("0x" + 40 hex digits).
    #[arg(long, global = true, env = "LEARNOPOLY_CALLER")]
    caller: Option<Identity>,

    /// Administrator recorded by `init` (defaults to the caller).
    #[arg(long, global = true, env = "LEARNOPOLY_ADMINISTRATOR")]
    administrator: Option<Identity>,

    /// LMDB map size in MiB.
    #[arg(long, global = true, env = "LEARNOPOLY_MAP_SIZE_MB")]
    map_size_mb: Option<usize>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "LEARNOPOLY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "LEARNOPOLY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Initialise a new ledger in the data directory.
    Init,
    /// Write a verified snapshot of the whole ledger to a file.
    Export { path: PathBuf },
    /// Restore a snapshot file into an empty data directory.
    Import { path: PathBuf },
    #[command(flatten)]
    Ledger(LedgerCommand),
}

impl Cli {
    /// Merge the optional config file with flag and env overrides.
    fn resolve_config(&self) -> anyhow::Result<DaemonConfig> {
        let mut config = match &self.config {
            Some(path) => DaemonConfig::from_toml_file(path)?,
            None => DaemonConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(admin) = self.administrator {
            config.administrator = Some(admin);
        }
        if let Some(mb) = self.map_size_mb {
            config.map_size_mb = mb;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_logging(config.log_format, &config.log_level);

    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    let output = run(&cli, &config)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn open_store(config: &DaemonConfig) -> anyhow::Result<LmdbStore> {
    LmdbStore::open(&config.data_dir, config.map_size_bytes())
        .with_context(|| format!("opening store at {}", config.data_dir.display()))
}

fn run(cli: &Cli, config: &DaemonConfig) -> anyhow::Result<serde_json::Value> {
    match &cli.command {
        Command::Init => {
            let Some(administrator) = config.administrator.or(cli.caller) else {
                bail!("init needs --administrator, an administrator in the config file, or --caller");
            };
            let ledger = Ledger::create(open_store(config)?, administrator)?;
            Ok(json!({
                "data_dir": config.data_dir,
                "administrator": ledger.administrator(),
            }))
        }
        Command::Export { path } => {
            let ledger = Ledger::open(open_store(config)?)?;
            let snapshot = ledger.export_snapshot()?;
            std::fs::write(path, snapshot.to_bytes()?)
                .with_context(|| format!("writing snapshot to {}", path.display()))?;
            tracing::info!(path = %path.display(), "exported snapshot");
            Ok(json!({
                "path": path,
                "hash": hex::encode(snapshot.hash),
                "profiles": snapshot.profiles.len(),
                "courses": snapshot.courses.len(),
                "posts": snapshot.posts.len(),
            }))
        }
        Command::Import { path } => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading snapshot from {}", path.display()))?;
            let snapshot = LedgerSnapshot::from_bytes(&bytes)?;
            let ledger = Ledger::import_snapshot(open_store(config)?, &snapshot)?;
            Ok(serde_json::to_value(ledger.summary()?)?)
        }
        Command::Ledger(command) => {
            let mut ledger = Ledger::open(open_store(config)?)?;
            ledger.subscribe(Box::new(|event: &LedgerEvent| {
                tracing::info!(?event, "ledger event");
            }));
            commands::execute(&mut ledger, cli.caller, command.clone())
        }
    }
}
