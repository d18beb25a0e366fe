// main.rs - Headless door-world: generate a dungeon, optionally walk it, export JSON

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use door_world::journey::{AutoWalker, HeadlessPresenter, JourneyStore, NavigatorBuilder};
use door_world::{DungeonSession, DungeonSettings, Seed, StrategyType};

/// CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Generation seed (overrides the settings file)
    #[arg(short, long)]
    pub seed: Option<Seed>,

    /// Target selection strategy: random, growth, type, branch or simple
    #[arg(long)]
    pub strategy: Option<StrategyType>,

    /// Number of rooms to place
    #[arg(short, long)]
    pub max_rooms: Option<usize>,

    /// Settings JSON to start from; missing files fall back to defaults
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Write the effective settings back to the settings file
    #[arg(long, requires = "settings")]
    pub save_settings: bool,

    /// Output path for the dungeon JSON; use "-" for stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Grow extra rooms around this room after generating
    #[arg(long)]
    pub grow_around: Option<u32>,

    /// Levels of growth around the new rooms
    #[arg(long, default_value = "1")]
    pub recurse: usize,

    /// Rooms to auto-walk through after generating
    #[arg(short, long)]
    pub walk: Option<usize>,

    /// Idle time before each automatic move, in milliseconds
    #[arg(long, default_value = "0")]
    pub idle_ms: u64,
}

impl Args {
    fn apply_to(&self, mut settings: DungeonSettings) -> DungeonSettings {
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(strategy) = self.strategy {
            settings.strategy = strategy;
        }
        if let Some(max_rooms) = self.max_rooms {
            settings.max_rooms = max_rooms;
        }
        settings
    }
}

async fn load_settings(args: &Args) -> Result<DungeonSettings> {
    let base = match &args.settings {
        Some(path) => DungeonSettings::load(path)
            .await
            .with_context(|| format!("Failed to read settings from {}", path.display()))?,
        None => DungeonSettings::default(),
    };
    let settings = args.apply_to(base);

    if let (true, Some(path)) = (args.save_settings, &args.settings) {
        settings
            .save(path)
            .await
            .with_context(|| format!("Failed to save settings to {}", path.display()))?;
        info!("Saved settings to {}", path.display());
    }
    Ok(settings)
}

async fn walk(session: &DungeonSession, moves: usize, idle: Duration) -> Result<()> {
    let navigator = NavigatorBuilder::new().build(Arc::clone(session.store()), HeadlessPresenter::new());
    navigator.initialise().context("Failed to start the journey")?;

    let walker = AutoWalker::new(Arc::new(navigator)).with_idle_timeout(idle);
    let walked = walker.run(Some(moves)).await.context("Journey failed")?;

    let state = session.store().get_state()?;
    info!(
        "Walked {} rooms, visited {} unique, now in room {}",
        walked,
        state.visited_room_ids.len(),
        state.current_room_id
    );
    if walked < moves {
        warn!("Ran out of rooms after {} of {} moves", walked, moves);
    }
    Ok(())
}

async fn write_output(session: &DungeonSession, output: &Path) -> Result<()> {
    let json = session.export_json()?;
    if output.as_os_str() == "-" {
        println!("{json}");
    } else {
        tokio::fs::write(output, json)
            .await
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("Wrote dungeon to {}", output.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    info!("Starting with {args:?}");

    let settings = load_settings(&args).await?;
    let session = DungeonSession::new(Arc::new(JourneyStore::new()));

    let mut last_logged = 0.0;
    let dungeon = session
        .regenerate_with_progress(
            &settings,
            |progress| {
                if progress - last_logged >= 25.0 {
                    info!("Generating... {progress:.0}%");
                    last_logged = progress;
                }
            },
            None,
        )
        .await
        .context("Dungeon generation failed")?;
    info!(
        "Dungeon ready: {} rooms, {} doors, depth {}",
        dungeon.rooms.len(),
        dungeon.doors.len(),
        dungeon.max_depth
    );

    if let Some(room_id) = args.grow_around {
        let grown = session
            .grow_around(room_id, args.recurse)
            .with_context(|| format!("Failed to grow around room {room_id}"))?;
        info!("Grew dungeon to {} rooms", grown.rooms.len());
    }

    if let Some(moves) = args.walk {
        walk(&session, moves, Duration::from_millis(args.idle_ms)).await?;
    }

    if let Some(output) = &args.output {
        write_output(&session, output).await?;
    }

    Ok(())
}
