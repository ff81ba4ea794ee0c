//! Tag reader module
//!
//! Turns keystrokes from a badge reader into tags: key naming, the
//! assembly state machine, scoped exclusive access to the device, a
//! pull-based reader and a background listener thread.

mod assembler;
mod keys;
mod listener;
mod source;
mod tag_reader;

pub use listener::TagListener;
pub use source::KeySource;

/// Errors that can occur while reading tags
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("device I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("device was released after an earlier failure")]
    Closed,

    #[error("tag reader is already running")]
    AlreadyRunning,

    #[error("failed to spawn reader thread: {0}")]
    ThreadSpawn(String),
}
