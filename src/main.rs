use anyhow::{Context, Result};
use clap::Parser;
use pixel_snake::game::{GameConfig, GameEngine};
use pixel_snake::modes::HumanMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

#[derive(Parser)]
#[command(name = "pixel_snake")]
#[command(version, about = "Single-screen snake game for the terminal")]
struct Cli {
    /// Grid side length in cells
    #[arg(long, conflicts_with_all = ["canvas", "cell"])]
    size: Option<usize>,

    /// Canvas side length in pixels, divided by --cell to get the grid size
    #[arg(long, requires = "cell")]
    canvas: Option<usize>,

    /// Cell side length in pixels
    #[arg(long, requires = "canvas")]
    cell: Option<usize>,

    /// JSON file with game settings; command line flags win over it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here (filtered by RUST_LOG). The terminal belongs to the game.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_tracing(path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install log subscriber")?;
    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(size) = cli.size {
        config.grid_size = size;
    }
    if let (Some(canvas), Some(cell)) = (cli.canvas, cli.cell) {
        config.grid_size = GameConfig::from_canvas(canvas, cell)?.grid_size;
    }

    config.validate().context("Invalid game settings")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let config = build_config(&cli)?;
    info!(grid = config.grid_size, level_rule = ?config.level_rule, "Configuration loaded");

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };

    let mut human_mode = HumanMode::with_engine(engine);
    human_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_subscriber_install_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();

        assert!(init_tracing(&dir.path().join("first.log")).is_ok());
        assert!(init_tracing(&dir.path().join("second.log")).is_err());
    }
}
