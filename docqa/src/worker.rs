//! Background task that owns the backend client.
//!
//! Commands arrive on an unbounded channel; each one runs in its own tokio
//! task so a slow analyze never blocks a question. Results go back to the main
//! loop as `AppEvent::Api`. Ordering between results is not guaranteed; the
//! workflow drops stale ones.

use std::sync::Arc;

use docqa_core::workflow::execute;
use docqa_core::{Backend, Command};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::event::AppEvent;

/// Send half held by the main loop.
#[derive(Clone)]
pub struct ApiHandle {
    tx: UnboundedSender<Command>,
}

impl ApiHandle {
    /// Queues `commands`. Silently drops them if the worker has stopped.
    pub fn dispatch(&self, commands: Vec<Command>) {
        for command in commands {
            let _ = self.tx.send(command);
        }
    }
}

/// Starts the worker and returns the handle used to feed it.
pub fn spawn_api_worker(backend: Arc<dyn Backend>, event_tx: UnboundedSender<AppEvent>) -> ApiHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(api_worker_loop(backend, rx, event_tx));
    ApiHandle { tx }
}

async fn api_worker_loop(
    backend: Arc<dyn Backend>,
    mut rx: UnboundedReceiver<Command>,
    event_tx: UnboundedSender<AppEvent>,
) {
    while let Some(command) = rx.recv().await {
        debug!(command = command.name(), "dispatching request");
        let backend = Arc::clone(&backend);
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            let outcome = execute(backend.as_ref(), command).await;
            let _ = event_tx.send(AppEvent::Api(Box::new(outcome)));
        });
    }
}
