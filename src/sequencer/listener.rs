//! Turn listeners.
//!
//! Callbacks the sequencer task invokes, in order, for every turn.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::game::events::{TurnEvent, TurnEventData};
use crate::sequencer::checkpoint::{Checkpoint, CheckpointStage};

/// Receives presentation updates from the sequencer task.
///
/// Called from the task itself, so implementations should not block.
pub trait TurnListener: Send + 'static {
    /// A checkpoint was reached.
    fn on_checkpoint(&mut self, checkpoint: &Checkpoint);

    /// Cumulative score after a moving turn.
    fn on_score(&mut self, score: u32);

    /// A rules event was produced.
    fn on_event(&mut self, _event: &TurnEvent) {}
}

/// Writes every update to the tracing log.
#[derive(Debug, Default)]
pub struct LogListener;

impl TurnListener for LogListener {
    fn on_checkpoint(&mut self, checkpoint: &Checkpoint) {
        match checkpoint.stage {
            CheckpointStage::Collapsed => debug!(
                turn = checkpoint.turn,
                direction = ?checkpoint.direction,
                removed = checkpoint.removed_count(),
                "collapsed"
            ),
            CheckpointStage::Settled => debug!(
                turn = checkpoint.turn,
                tiles = checkpoint.tiles.len(),
                moved = checkpoint.moved,
                "settled"
            ),
        }
    }

    fn on_score(&mut self, score: u32) {
        debug!(score, "score");
    }

    fn on_event(&mut self, event: &TurnEvent) {
        match &event.data {
            TurnEventData::WinTileReached { value, .. } => {
                info!("Turn {}: reached {}", event.turn, value);
            }
            TurnEventData::GameOver { final_score, max_tile } => {
                info!("Turn {}: game over, score {} (max tile {})", event.turn, final_score, max_tile);
            }
            _ => {}
        }
    }
}

/// One update forwarded by [`ChannelListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerUpdate {
    /// Checkpoint reached
    Checkpoint(Checkpoint),
    /// Cumulative score
    Score(u32),
    /// Rules event
    Event(TurnEvent),
}

/// Forwards every update over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    sender: mpsc::UnboundedSender<SequencerUpdate>,
}

impl ChannelListener {
    /// Create a listener and the receiving half.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SequencerUpdate>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn forward(&self, update: SequencerUpdate) {
        // Receiver dropped means nobody is watching any more
        let _ = self.sender.send(update);
    }
}

impl TurnListener for ChannelListener {
    fn on_checkpoint(&mut self, checkpoint: &Checkpoint) {
        self.forward(SequencerUpdate::Checkpoint(checkpoint.clone()));
    }

    fn on_score(&mut self, score: u32) {
        self.forward(SequencerUpdate::Score(score));
    }

    fn on_event(&mut self, event: &TurnEvent) {
        self.forward(SequencerUpdate::Event(event.clone()));
    }
}
