//! Lifecycle notifications for external consumers
//!
//! Fire-and-forget: each occurrence is sent once to every live subscriber.
//! Nothing is buffered for subscribers that join later.

use crate::core::types::Position;
use crate::entity::BeingSnapshot;
use serde::Serialize;
use std::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimulationEvent {
    BeingBorn(BeingSnapshot),
    BeingDied(BeingSnapshot),
    AreaBombed { position: Position, diameter: f64 },
}

#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<mpsc::Sender<SimulationEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<SimulationEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Send to every subscriber, forgetting those whose receiver is gone
    pub fn publish(&mut self, event: &SimulationEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
