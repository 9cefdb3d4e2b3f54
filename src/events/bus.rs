use tokio::sync::broadcast;

use super::AppEvent;

/// Events a slow subscriber may fall behind by before it starts missing
/// them. A burst of directory refreshes is the usual way to get there.
const CHANNEL_CAPACITY: usize = 64;

/// Fan-out of [`AppEvent`]s to whoever is listening: the event logger in the
/// binary and any front end. Publishing never blocks and never fails.
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publishes `event` and returns how many subscribers it reached.
    pub fn send(&self, event: AppEvent) -> usize {
        match self.tx.send(event) {
            Ok(reached) => reached,
            Err(broadcast::error::SendError(event)) => {
                log::trace!("No subscribers for {:?}", event);
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
