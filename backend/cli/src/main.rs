mod config;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use captionforge_config::{
    apply_all_defaults, config_dir, config_file_path, load_config, prepare, redact, write_config,
    CaptionForgeConfig,
};
use captionforge_logging::init_logger;
use captionforge_pipeline::BatchOrchestrator;
use captionforge_understanding::BedrockVisionClient;

use config::Config;

#[derive(Parser)]
#[command(name = "captionforge")]
#[command(about = "Describe every image in a directory with Claude on Amazon Bedrock")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.captionforge/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive; RUST_LOG still wins
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize every image that has no summary yet (the default)
    Run {
        /// Directory to scan instead of the configured one
        dir: Option<PathBuf>,
    },
    /// List the images a run would send to the model
    Plan {
        /// Directory to scan instead of the configured one
        dir: Option<PathBuf>,
    },
    /// Print the effective configuration with secrets masked
    Config {
        /// Write a config file with every default filled in
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));

    let raw = load_config(&config_path).await?;

    // Logging comes up before validation so config warnings are visible.
    let logging = raw.logging.clone().unwrap_or_default();
    let level = cli
        .log_level
        .clone()
        .or(logging.level)
        .unwrap_or_else(|| "info".to_string());
    init_logger(logging.dir.as_deref().map(Path::new), &level);

    let env: HashMap<String, String> = std::env::vars().collect();

    match cli.command.unwrap_or(Commands::Run { dir: None }) {
        Commands::Run { dir } => {
            let settings = Config::from_config(&prepare(raw, &env)?);
            run(settings, dir).await?;
        }
        Commands::Plan { dir } => {
            let settings = Config::from_config(&prepare(raw, &env)?);
            plan(settings, dir).await?;
        }
        Commands::Config { init: true } => init_config(&config_path).await?,
        Commands::Config { init: false } => show_config(prepare(raw, &env)?)?,
    }

    Ok(())
}

async fn run(settings: Config, dir: Option<PathBuf>) -> Result<()> {
    let dir = dir.unwrap_or(settings.scan_dir);
    info!(
        dir = %dir.display(),
        model = %settings.vision.model_id,
        endpoint = %settings.vision.endpoint,
        "Starting captionforge"
    );

    let client = BedrockVisionClient::new(settings.vision)?;
    let orchestrator = BatchOrchestrator::new(client, settings.orchestrator);
    let report = orchestrator.run(&dir).await?;

    // Per-file failures are reported, not turned into an exit code.
    println!("{report}");
    Ok(())
}

async fn plan(settings: Config, dir: Option<PathBuf>) -> Result<()> {
    let dir = dir.unwrap_or(settings.scan_dir);
    let client = BedrockVisionClient::new(settings.vision)?;
    let orchestrator = BatchOrchestrator::new(client, settings.orchestrator);

    let pending = orchestrator.plan(&dir).await?;
    for image in &pending {
        println!("{image}");
    }
    println!("{} image(s) to summarize in {}", pending.len(), dir.display());
    Ok(())
}

fn show_config(config: CaptionForgeConfig) -> Result<()> {
    let value = serde_json::to_value(&config).context("Failed to serialize config")?;
    let yaml = serde_yaml::to_string(&redact(&value)).context("Failed to render config")?;
    print!("{yaml}");
    Ok(())
}

async fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }
    let mut config = apply_all_defaults(CaptionForgeConfig::default());
    if let Some(bedrock) = config.bedrock.as_mut() {
        // Left unset so AWS_REGION and the derived endpoint still apply.
        bedrock.region = None;
        bedrock.endpoint = None;
    }
    write_config(&config, path).await?;
    println!("Wrote {}", path.display());
    Ok(())
}
