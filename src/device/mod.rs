//! Input device module
//!
//! Locates the badge reader among the host's evdev devices and wraps
//! it as a key source for the tag reader.

mod evdev_source;
mod locator;

pub use evdev_source::EvdevSource;
pub use locator::find;
