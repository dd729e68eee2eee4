//! StpDaemon - single-owner event loop.
//!
//! The daemon owns the [`SpanningTreeOrch`] exclusively. Producers hold an
//! [`EventSender`] and never touch topology state. Whatever is already
//! waiting on the channel, up to `batch_size` events, is queued on the orch
//! and drained in arrival order; each event runs to completion before the
//! next one is looked at, so rebuilds always observe the topology as of their
//! own event.

use crate::events::ControllerEvent;
use crate::orch::SpanningTreeOrch;
use log::{debug, info};
use sdn_orch_common::Orch;
use tokio::sync::mpsc;

/// Sending half of the daemon's event channel.
pub type EventSender = mpsc::Sender<ControllerEvent>;

/// The controller's event loop.
pub struct StpDaemon {
    orch: SpanningTreeOrch,
    receiver: mpsc::Receiver<ControllerEvent>,
    processed: u64,
}

impl StpDaemon {
    /// Creates a daemon around `orch` with a channel sized from its config.
    pub fn new(orch: SpanningTreeOrch) -> (Self, EventSender) {
        let (sender, receiver) = mpsc::channel(orch.config().event_queue_depth.max(1));
        let daemon = Self {
            orch,
            receiver,
            processed: 0,
        };
        (daemon, sender)
    }

    pub fn orch(&self) -> &SpanningTreeOrch {
        &self.orch
    }

    /// Number of events received so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Runs until every sender is dropped, then hands the orch back.
    pub async fn run(mut self) -> SpanningTreeOrch {
        info!("Starting {} event loop", self.orch.name());

        let batch_size = self.orch.config().batch_size.max(1);

        while let Some(first) = self.receiver.recv().await {
            self.accept(first);
            let mut queued = 1;
            while queued < batch_size {
                match self.receiver.try_recv() {
                    Ok(event) => {
                        self.accept(event);
                        queued += 1;
                    }
                    Err(_) => break,
                }
            }

            while self.orch.has_pending_tasks() {
                self.orch.do_task().await;
            }
        }

        info!(
            "{} event loop stopped after {} events",
            self.orch.name(),
            self.processed
        );
        self.orch
    }

    fn accept(&mut self, event: ControllerEvent) {
        debug!("Received {} event: {}", event.kind(), event);
        self.processed += 1;
        self.orch.enqueue(event);
    }
}
