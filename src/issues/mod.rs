//! Error reporting for failures that are handled rather than propagated.
//!
//! An [`ErrorEvent`] is either surfaced (shown to the user) or omitted
//! (logged quietly). Components that swallow errors hand them to an
//! [`ErrorSink`] instead of dropping them.

use crate::events::{AppEvent, EventBus};
use std::sync::Arc;

#[derive(Debug)]
pub struct ErrorEvent {
    pub error: anyhow::Error,
    pub omitted: bool,
}

impl ErrorEvent {
    pub fn from_error(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            omitted: false,
        }
    }

    pub fn omit(mut self) -> Self {
        self.omitted = true;
        self
    }

    pub fn handle(self, sink: &dyn ErrorSink) {
        sink.handle(self);
    }
}

pub trait ErrorSink: Send + Sync {
    fn handle(&self, event: ErrorEvent);
}

/// Writes surfaced errors at `error` level and omitted ones at `debug`.
#[derive(Debug, Default)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn handle(&self, event: ErrorEvent) {
        log_event(&event);
    }
}

/// Logs like [`LogSink`] and publishes every event on the bus so a front end
/// can decide how to show it.
pub struct BusSink {
    events: Arc<EventBus>,
}

impl BusSink {
    pub fn new(events: Arc<EventBus>) -> Self {
        Self { events }
    }
}

impl ErrorSink for BusSink {
    fn handle(&self, event: ErrorEvent) {
        log_event(&event);
        self.events.send(AppEvent::ErrorReported {
            message: format!("{:#}", event.error),
            omitted: event.omitted,
        });
    }
}

fn log_event(event: &ErrorEvent) {
    if event.omitted {
        log::debug!("Omitted error: {:#}", event.error);
    } else {
        log::error!("{:#}", event.error);
    }
}
