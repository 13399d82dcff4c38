//! Whole runs on a worker thread
//!
//! A [`RunHandle`] owns the thread driving an [`Engine`] to completion. A run
//! spawned paused waits on a gate until [`RunHandle::start`]; until it has begun
//! executing it can be cancelled. Dropping the handle of a run that was never
//! started cancels it too. Cancellation never interrupts a run in progress.

use super::{Engine, FungeError, FungeResult};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::debug;

const PENDING: u8 = 0;
const RUNNING: u8 = 1;
const CANCELLED: u8 = 2;

/// Handle to a run executing on its own thread
#[derive(Debug)]
pub struct RunHandle<C> {
    status: Arc<AtomicU8>,
    gate: Option<Sender<()>>,
    worker: JoinHandle<FungeResult<Option<C>>>,
}

pub(super) fn spawn<C>(mut engine: Engine<C>, paused: bool) -> FungeResult<RunHandle<C>>
where
    C: Clone + Send + 'static,
{
    let status = Arc::new(AtomicU8::new(PENDING));
    let (gate, wait): (Option<Sender<()>>, Option<Receiver<()>>) = if paused {
        let (tx, rx) = mpsc::channel();
        (Some(tx), Some(rx))
    } else {
        (None, None)
    };

    let worker_status = Arc::clone(&status);
    let worker = thread::Builder::new()
        .name("fungetty-run".to_string())
        .spawn(move || {
            if let Some(wait) = wait {
                // A gate dropped without a start signal means the handle is gone.
                if wait.recv().is_err() {
                    let _ = worker_status.compare_exchange(
                        PENDING,
                        CANCELLED,
                        Ordering::AcqRel,
                        Ordering::Acquire,
                    );
                }
            }
            if worker_status
                .compare_exchange(PENDING, RUNNING, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                debug!("run cancelled before it began");
                return Err(FungeError::Cancelled);
            }
            engine.run()
        })?;

    Ok(RunHandle {
        status,
        gate,
        worker,
    })
}

impl<C> RunHandle<C> {
    /// Release a paused run; a no-op for runs spawned unpaused
    pub fn start(&mut self) {
        if let Some(gate) = self.gate.take() {
            let _ = gate.send(());
        }
    }

    /// Cancel the run if it has not begun executing
    ///
    /// Returns `true` when the run will never execute.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self
            .status
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        self.gate.take();
        cancelled
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.load(Ordering::Acquire) == CANCELLED
    }

    /// Whether the engine has begun executing
    pub fn has_started(&self) -> bool {
        self.status.load(Ordering::Acquire) == RUNNING
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wait for the run's result
    pub fn join(mut self) -> FungeResult<Option<C>> {
        self.start();
        self.worker.join().map_err(|_| FungeError::WorkerPanicked)?
    }
}
