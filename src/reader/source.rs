//! Key event sources and scoped exclusive access
//!
//! A `KeySource` is anything that can be grabbed and read for key
//! events. `ExclusiveGrab` owns a source for as long as it is grabbed
//! and releases it when dropped.

use std::io;

use tracing::{debug, warn};

use crate::events::KeyEvent;

/// A device that yields key events
pub trait KeySource {
    /// Human-readable identity used in log messages
    fn describe(&self) -> String;

    /// Take exclusive access to the device
    fn grab(&mut self) -> io::Result<()>;

    /// Give up exclusive access
    fn ungrab(&mut self) -> io::Result<()>;

    /// Read the key events currently available, in arrival order
    ///
    /// May return an empty batch when nothing arrived in time.
    fn fetch(&mut self) -> io::Result<Vec<KeyEvent>>;
}

/// Owns a grabbed source and ungrabs it on drop
#[derive(Debug)]
pub struct ExclusiveGrab<S: KeySource> {
    source: S,
}

impl<S: KeySource> ExclusiveGrab<S> {
    /// Grab `source`, handing it back with the error on failure
    pub fn acquire(mut source: S) -> Result<Self, (S, io::Error)> {
        match source.grab() {
            Ok(()) => {
                debug!(device = %source.describe(), "device grabbed");
                Ok(Self { source })
            }
            Err(e) => Err((source, e)),
        }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: KeySource> Drop for ExclusiveGrab<S> {
    fn drop(&mut self) {
        match self.source.ungrab() {
            Ok(()) => debug!(device = %self.source.describe(), "device released"),
            Err(e) => warn!(device = %self.source.describe(), ?e, "failed to release device"),
        }
    }
}
