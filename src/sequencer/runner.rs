//! Sequencer task.
//!
//! A single task owns the [`GameState`]. Inputs arrive over an unbounded
//! channel and run strictly one after another, so turn `n + 1` always starts
//! from turn `n`'s settled board no matter how the delays are tuned.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::game::state::GameState;
use crate::game::tile::Direction;
use crate::sequencer::checkpoint::Checkpoint;
use crate::sequencer::listener::TurnListener;
use crate::sequencer::{SequencerConfig, SequencerError};

/// Commands processed by the sequencer task.
#[derive(Debug)]
enum Command {
    /// Apply one direction.
    Turn(Direction),
    /// Discard the game and start a new one.
    NewGame(u64),
    /// Reply once every earlier command has finished.
    Settled(oneshot::Sender<Checkpoint>),
}

/// Handle to a running sequencer task.
pub struct TurnSequencer {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<Checkpoint>,
    task: JoinHandle<Result<GameState, SequencerError>>,
}

impl TurnSequencer {
    /// Spawn the sequencer task on the current runtime.
    pub fn spawn<L: TurnListener>(game: GameState, config: SequencerConfig, listener: L) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot) = watch::channel(Checkpoint::initial(&game));

        let task = tokio::spawn(run_sequencer(game, config, listener, receiver, snapshot_tx));

        Self { commands, snapshot, task }
    }

    /// Queue a direction. Returns immediately.
    pub fn enqueue(&self, direction: Direction) -> Result<(), SequencerError> {
        self.send(Command::Turn(direction))
    }

    /// Queue a new game, applied after every earlier input.
    pub fn reset(&self, seed: u64) -> Result<(), SequencerError> {
        self.send(Command::NewGame(seed))
    }

    /// Wait until everything queued so far has settled.
    pub async fn settled(&self) -> Result<Checkpoint, SequencerError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Settled(reply))?;
        response.await.map_err(|_| SequencerError::Closed)
    }

    /// Latest checkpoint published by the task.
    pub fn snapshot(&self) -> Checkpoint {
        self.snapshot.borrow().clone()
    }

    /// Receiver that is notified on every checkpoint.
    pub fn subscribe(&self) -> watch::Receiver<Checkpoint> {
        self.snapshot.clone()
    }

    /// Check if the task has stopped.
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Finish every queued command, stop the task and return the game.
    pub async fn shutdown(self) -> Result<GameState, SequencerError> {
        drop(self.commands);
        self.task
            .await
            .map_err(|e| SequencerError::Join(e.to_string()))?
    }

    fn send(&self, command: Command) -> Result<(), SequencerError> {
        self.commands.send(command).map_err(|_| SequencerError::Closed)
    }
}

#[instrument(skip_all, fields(seed = game.seed))]
async fn run_sequencer<L: TurnListener>(
    mut game: GameState,
    config: SequencerConfig,
    mut listener: L,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshot: watch::Sender<Checkpoint>,
) -> Result<GameState, SequencerError> {
    info!("Sequencer started");

    while let Some(command) = commands.recv().await {
        match command {
            Command::Turn(direction) => {
                run_turn(&mut game, direction, &config, &mut listener, &snapshot).await?;
            }
            Command::NewGame(seed) => {
                if let Err(e) = game.reset(seed) {
                    error!("New game failed: {}", e);
                    return Err(e.into());
                }
                info!("New game with seed {}", seed);
                publish(&mut listener, &snapshot, Checkpoint::initial(&game));
            }
            Command::Settled(reply) => {
                // Caller may have stopped waiting
                let _ = reply.send(snapshot.borrow().clone());
            }
        }
    }

    info!("Sequencer stopped after {} turns, score {}", game.turn, game.score);
    Ok(game)
}

async fn run_turn<L: TurnListener>(
    game: &mut GameState,
    direction: Direction,
    config: &SequencerConfig,
    listener: &mut L,
    snapshot: &watch::Sender<Checkpoint>,
) -> Result<(), SequencerError> {
    let outcome = match game.apply(direction) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Turn {} ({}) failed: {}", game.turn + 1, direction, e);
            return Err(e.into());
        }
    };

    debug!(
        turn = game.turn,
        %direction,
        moved = outcome.moved,
        score_delta = outcome.score_delta,
        "turn resolved"
    );

    publish(listener, snapshot, Checkpoint::collapsed(game, &outcome));

    if outcome.moved {
        listener.on_score(game.score);
        for event in game.take_events() {
            listener.on_event(&event);
        }
        tokio::time::sleep(config.collapse_delay).await;
    }

    publish(listener, snapshot, Checkpoint::settled(game, &outcome));

    if outcome.moved {
        tokio::time::sleep(config.settle_delay).await;
    }

    Ok(())
}

fn publish<L: TurnListener>(listener: &mut L, snapshot: &watch::Sender<Checkpoint>, checkpoint: Checkpoint) {
    listener.on_checkpoint(&checkpoint);
    snapshot.send_replace(checkpoint);
}
