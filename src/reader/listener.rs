//! Background tag listener
//!
//! Runs a `TagReader` on a dedicated thread and forwards each tag to
//! the controller over a channel. The thread checks for a stop request
//! between device fetches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::events::ReaderEvent;

use super::source::KeySource;
use super::tag_reader::TagReader;
use super::ReaderError;

/// Reads tags off the device and sends them to the controller
pub struct TagListener {
    event_tx: mpsc::Sender<ReaderEvent>,
    running: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TagListener {
    /// Create a new tag listener
    pub fn new(event_tx: mpsc::Sender<ReaderEvent>) -> Self {
        Self {
            event_tx,
            running: Arc::new(AtomicBool::new(false)),
            handle: Mutex::new(None),
        }
    }

    /// Grab `source` and start reading it on a dedicated thread
    ///
    /// The grab happens before this returns, so a busy device is
    /// reported to the caller instead of over the channel.
    pub fn start<S>(&self, source: S) -> Result<(), ReaderError>
    where
        S: KeySource + Send + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ReaderError::AlreadyRunning);
        }

        let reader = match TagReader::open(source) {
            Ok(reader) => reader,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let event_tx = self.event_tx.clone();
        let running = Arc::clone(&self.running);

        let handle = thread::Builder::new()
            .name("tag-reader".to_string())
            .spawn(move || {
                info!("tag reader thread started");
                run_read_loop(reader, event_tx, &running);
                running.store(false, Ordering::SeqCst);
                info!("tag reader thread stopped");
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                ReaderError::ThreadSpawn(e.to_string())
            })?;

        if let Ok(mut slot) = self.handle.lock() {
            *slot = Some(handle);
        }

        Ok(())
    }

    /// Stop the listener and wait for the device to be released
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);

        let handle = self.handle.lock().ok().and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("tag reader thread panicked");
            }
        }
    }

    /// Check if the listener is currently running
    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Read tags until stopped, the device fails, or the controller goes away
///
/// The reader is dropped on return, which releases the device.
fn run_read_loop<S: KeySource>(
    mut reader: TagReader<S>,
    event_tx: mpsc::Sender<ReaderEvent>,
    running: &AtomicBool,
) {
    loop {
        match reader.next_tag(running) {
            Ok(Some(tag)) => {
                debug!(%tag, "forwarding tag");
                if event_tx.blocking_send(ReaderEvent::Tag(tag)).is_err() {
                    warn!("failed to send tag - channel closed?");
                    return;
                }
            }
            Ok(None) => return,
            Err(e) => {
                error!(?e, "tag reader failed");
                drop(reader);
                let _ = event_tx.blocking_send(ReaderEvent::Failed(e.to_string()));
                return;
            }
        }
    }
}
