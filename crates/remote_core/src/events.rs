//! Display-surface events published by the session.

use shared::domain::{Command, TrackSnapshot};
use tokio::sync::broadcast;

use crate::motion::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteEvent {
    /// Per-frame classifier readout, labelled by command.
    Predictions(Vec<(Command, f32)>),
    CommandAccepted(Command),
    Status(String),
    TrackShown(TrackSnapshot),
    TrackCleared,
    WordsReplaced(Vec<String>),
    WordMoved {
        index: usize,
        position: Vec2,
    },
}

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<RemoteEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishing never fails; events without subscribers are dropped.
    pub fn emit(&self, event: RemoteEvent) {
        let _ = self.tx.send(event);
    }

    pub fn status(&self, text: impl Into<String>) {
        self.emit(RemoteEvent::Status(text.into()));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RemoteEvent> {
        self.tx.subscribe()
    }
}
