//! Device discovery
//!
//! Picks the first input device whose name mentions "rfid". When
//! several match, enumeration order decides.

use std::path::PathBuf;

use tracing::{debug, error, info};

use super::evdev_source::EvdevSource;

/// Substring looked for in device names, compared case-insensitively
pub const NAME_PATTERN: &str = "rfid";

/// An enumerated device with the details the locator looks at
#[derive(Debug)]
pub struct Candidate<D> {
    pub path: PathBuf,
    pub name: String,
    pub device: D,
}

/// Whether a device name looks like a badge reader
pub fn is_reader_name(name: &str) -> bool {
    name.to_lowercase().contains(NAME_PATTERN)
}

/// Return the first candidate whose name looks like a badge reader
pub fn select<D>(candidates: impl IntoIterator<Item = Candidate<D>>) -> Option<Candidate<D>> {
    for candidate in candidates {
        debug!(path = %candidate.path.display(), name = %candidate.name, "scan");
        if is_reader_name(&candidate.name) {
            info!(path = %candidate.path.display(), name = %candidate.name, "selected");
            return Some(candidate);
        }
    }

    error!("unable to find reader");
    None
}

/// Enumerate the host's input devices and open the badge reader
pub fn find() -> Option<EvdevSource> {
    let candidates = evdev::enumerate().map(|(path, device)| Candidate {
        name: device.name().unwrap_or_default().to_string(),
        path,
        device,
    });

    select(candidates).map(|found| EvdevSource::new(found.path, found.device))
}
