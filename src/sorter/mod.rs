//! Sorting module
//!
//! Maps scanned tags to guest audio files.

mod controller;

pub use controller::{ControllerError, SortingController};
