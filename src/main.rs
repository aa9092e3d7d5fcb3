//! Tile Merge Demo
//!
//! Plays a seeded game through the turn sequencer, then replays the
//! transcript to check it reproduces the same final state.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tile_merge::{
    BOARD_SIZE, VERSION,
    core::hash_hex,
    game::{replay::verify, Direction, GameState},
    sequencer::{LogListener, SequencerConfig, TurnSequencer},
};

/// Demo settings, read from the environment.
#[derive(Debug, Clone)]
struct DemoConfig {
    /// Game seed (`TILE_MERGE_SEED`).
    seed: u64,
    /// Input limit (`TILE_MERGE_MAX_TURNS`).
    max_turns: u32,
    /// Pacing (`TILE_MERGE_DELAY_MS` sets both delays).
    sequencer: SequencerConfig,
}

impl DemoConfig {
    fn from_env() -> Result<Self> {
        let seed = read_env("TILE_MERGE_SEED")?.unwrap_or(12345);
        let max_turns = read_env("TILE_MERGE_MAX_TURNS")?.unwrap_or(2000);
        let sequencer = match read_env::<u64>("TILE_MERGE_DELAY_MS")? {
            Some(ms) => SequencerConfig::from_millis(ms, ms),
            None => SequencerConfig::immediate(),
        };

        Ok(Self { seed, max_turns, sequencer })
    }
}

fn read_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid {}: {:?}", key, raw)),
        Err(_) => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DemoConfig::from_env()?;

    info!("Tile Merge v{}", VERSION);
    info!("Board: {}x{}, seed {}", BOARD_SIZE, BOARD_SIZE, config.seed);

    let game = GameState::new(config.seed).context("failed to start game")?;
    let sequencer = TurnSequencer::spawn(game, config.sequencer, LogListener);

    // Corner strategy: prefer down and left, fall back to right, up last
    let preference = [Direction::Down, Direction::Left, Direction::Right, Direction::Up];
    let mut turns = 0;

    'play: while turns < config.max_turns {
        let before = sequencer.settled().await?;
        if before.game_over {
            break;
        }

        for direction in preference {
            sequencer.enqueue(direction)?;
            turns += 1;
            if sequencer.settled().await?.moved || turns >= config.max_turns {
                continue 'play;
            }
        }

        warn!("No direction moved on a live board");
        break;
    }

    let game = sequencer.shutdown().await?;
    info!("Finished after {} turns: score {}, max tile {}", game.turn, game.score, game.max_tile());
    println!("{}", game.board);
    println!("{}", serde_json::to_string_pretty(&game.board)?);

    // Replay and verify
    let transcript = game.transcript();
    let bytes = transcript.to_bytes()?;
    info!("Transcript: {} directions, {} bytes", transcript.len(), bytes.len());

    let replayed = verify(&transcript)?;
    info!("Replay verified, state hash {}", hash_hex(&replayed.compute_hash()));

    Ok(())
}
