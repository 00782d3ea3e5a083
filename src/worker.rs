//! Mutation worker
//!
//! One long-lived task owns the receiving end of the operation queue and is
//! the only writer to the [`Store`]. Callers hand operations over through a
//! [`WorkerHandle`] and wait until the worker has applied them.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::store::{Entry, Operation, Store};

/// Queue depth. A single slot keeps the hand-off close to a rendezvous:
/// a busy worker stalls every submitter.
const DEFAULT_QUEUE_CAPACITY: usize = 1;

/// An operation plus the channel its result is reported on
struct Envelope {
    op: Operation,
    reply: oneshot::Sender<Option<Entry>>,
}

/// Cloneable submit side of the worker queue
#[derive(Clone)]
pub struct WorkerHandle {
    sender: mpsc::Sender<Envelope>,
}

/// The mutation worker task
pub struct Worker {
    store: Arc<Store>,
    receiver: mpsc::Receiver<Envelope>,
}

impl Worker {
    /// Spawn the worker with the default queue depth
    pub fn spawn(store: Arc<Store>) -> (WorkerHandle, JoinHandle<()>) {
        Self::spawn_with_capacity(store, DEFAULT_QUEUE_CAPACITY)
    }

    /// Spawn the worker with a custom queue depth
    pub fn spawn_with_capacity(
        store: Arc<Store>,
        capacity: usize,
    ) -> (WorkerHandle, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity);
        let worker = Worker { store, receiver };
        let join = tokio::spawn(worker.run());
        (WorkerHandle { sender }, join)
    }

    /// Apply operations in receive order until every handle is dropped
    async fn run(mut self) {
        info!("Mutation worker started");

        while let Some(Envelope { op, reply }) = self.receiver.recv().await {
            debug!(word = op.word(), "Applying {:?}", op);
            let previous = self.store.apply(op);
            // The submitter may have gone away; the mutation stands regardless.
            let _ = reply.send(previous);
        }

        info!("Mutation worker stopped: all handles dropped");
    }
}

impl WorkerHandle {
    async fn submit(&self, op: Operation) -> Result<Option<Entry>> {
        let (reply, applied) = oneshot::channel();
        self.sender
            .send(Envelope { op, reply })
            .await
            .map_err(|_| Error::WorkerStopped)?;
        applied.await.map_err(|_| Error::WorkerStopped)
    }

    /// Queue an add and wait until it is applied; returns the replaced entry
    pub async fn submit_add(
        &self,
        word: impl Into<String>,
        definition: impl Into<String>,
    ) -> Result<Option<Entry>> {
        self.submit(Operation::Add {
            word: word.into(),
            definition: definition.into(),
        })
        .await
    }

    /// Queue a remove and wait until it is applied; returns the removed entry
    pub async fn submit_remove(&self, word: impl Into<String>) -> Result<Option<Entry>> {
        self.submit(Operation::Remove { word: word.into() }).await
    }
}
