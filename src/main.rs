use anyhow::Result;
use clap::{Parser, ValueEnum};
use snake_qlearn::game::GameConfig;
use snake_qlearn::modes::{HumanMode, TrainConfig, TrainMode, WatchMode};
use snake_qlearn::rl::{AgentConfig, TrainingBackend, default_device};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_qlearn")]
#[command(version, about = "Snake game with a deep Q-learning agent")]
struct Cli {
    /// Execution mode
    #[arg(long, default_value = "train")]
    mode: Mode,

    /// Board width in pixels
    #[arg(long, default_value = "640")]
    width: i32,

    /// Board height in pixels
    #[arg(long, default_value = "480")]
    height: i32,

    /// Cell size in pixels
    #[arg(long, default_value = "20")]
    block_size: i32,

    /// Number of games to train (train/watch modes); unlimited if omitted
    #[arg(long)]
    episodes: Option<usize>,

    /// Directory for the model snapshot
    #[arg(long, default_value = "snake_models")]
    model_dir: PathBuf,

    /// Resume from the snapshot in the model directory
    #[arg(long)]
    resume: bool,

    /// Seed for food placement and exploration
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Train the agent without a display
    Train,
    /// Train the agent while drawing the board and score chart
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.mode {
        Mode::Human => {
            let config = GameConfig {
                width: cli.width,
                height: cli.height,
                block_size: cli.block_size,
                seed: cli.seed,
                ..GameConfig::human()
            };
            let mut human_mode = HumanMode::new(config)?;
            human_mode.run().await?;
        }
        Mode::Train => {
            // Log output would tear the alternate screen, so only headless training logs
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .init();

            let mut train_mode =
                TrainMode::<TrainingBackend>::new(train_config(&cli), default_device())?;
            train_mode.run()?;
        }
        Mode::Watch => {
            let mut watch_mode =
                WatchMode::<TrainingBackend>::new(train_config(&cli), default_device())?;
            watch_mode.run().await?;
        }
    }

    Ok(())
}

fn train_config(cli: &Cli) -> TrainConfig {
    let mut config = TrainConfig::new(cli.model_dir.clone());
    config.episodes = cli.episodes;
    config.resume = cli.resume;
    config.game_config = GameConfig {
        width: cli.width,
        height: cli.height,
        block_size: cli.block_size,
        seed: cli.seed,
        ..GameConfig::default()
    };
    config.agent_config = AgentConfig {
        seed: cli.seed,
        ..AgentConfig::default()
    };
    config
}
