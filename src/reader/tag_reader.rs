//! Pull-based tag reader
//!
//! Holds the device grabbed for its whole lifetime and hands out one
//! tag per call, in the order the terminators were pressed.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error};

use crate::events::{KeyEvent, Tag};

use super::assembler::TagAssembler;
use super::source::{ExclusiveGrab, KeySource};
use super::ReaderError;

/// Reads tags from a grabbed key source
pub struct TagReader<S: KeySource> {
    /// `None` once a read failure has released the device
    grab: Option<ExclusiveGrab<S>>,
    assembler: TagAssembler,
    /// Events fetched but not yet fed, kept so batches never reorder
    backlog: VecDeque<KeyEvent>,
}

impl<S: KeySource> TagReader<S> {
    /// Grab `source` exclusively and start reading
    pub fn open(source: S) -> Result<Self, ReaderError> {
        let grab = ExclusiveGrab::acquire(source).map_err(|(source, e)| {
            error!(device = %source.describe(), ?e, "failed to grab device");
            ReaderError::Io(e)
        })?;

        Ok(Self {
            grab: Some(grab),
            assembler: TagAssembler::new(),
            backlog: VecDeque::new(),
        })
    }

    /// Whether the reader still holds the device
    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.grab.is_some()
    }

    /// Text typed since the last completed tag
    #[cfg(test)]
    pub fn pending(&self) -> &str {
        self.assembler.pending()
    }

    /// Return a tag if one is complete after at most one device fetch
    fn poll_tag(&mut self) -> Result<Option<Tag>, ReaderError> {
        if let Some(tag) = self.drain_backlog() {
            return Ok(Some(tag));
        }

        let grab = self.grab.as_mut().ok_or(ReaderError::Closed)?;
        match grab.source_mut().fetch() {
            Ok(events) => {
                self.backlog.extend(events);
                Ok(self.drain_backlog())
            }
            Err(e) => {
                // Release before the failure propagates.
                if let Some(mut grab) = self.grab.take() {
                    error!(device = %grab.source_mut().describe(), ?e, "device read failed");
                    drop(grab);
                }
                Err(ReaderError::Io(e))
            }
        }
    }

    /// Block until the next tag is complete
    ///
    /// Returns `None` once `running` is cleared; the flag is checked
    /// between device fetches.
    pub fn next_tag(&mut self, running: &AtomicBool) -> Result<Option<Tag>, ReaderError> {
        while running.load(Ordering::SeqCst) {
            if let Some(tag) = self.poll_tag()? {
                return Ok(Some(tag));
            }
        }
        Ok(None)
    }

    fn drain_backlog(&mut self) -> Option<Tag> {
        while let Some(event) = self.backlog.pop_front() {
            if let Some(tag) = self.assembler.feed(event) {
                debug!(%tag, "tag assembled");
                return Some(tag);
            }
        }
        None
    }
}
