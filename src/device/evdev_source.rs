//! evdev-backed key source

use std::io;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use evdev::{Device, EventType};

use crate::events::{KeyEvent, KeyState};
use crate::reader::KeySource;

/// How long a fetch waits for input before returning an empty batch
const POLL_INTERVAL_MS: libc::c_int = 100;

/// An input device node opened through evdev
pub struct EvdevSource {
    path: PathBuf,
    name: String,
    device: Device,
}

impl EvdevSource {
    pub fn new(path: PathBuf, device: Device) -> Self {
        let name = device.name().unwrap_or_default().to_string();
        Self { path, name, device }
    }

    /// Open a device node directly, e.g. `/dev/input/event5`
    pub fn open(path: &Path) -> io::Result<Self> {
        let device = Device::open(path)?;
        Ok(Self::new(path.to_owned(), device))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait up to one poll interval for the device to become readable
    fn wait_readable(&self) -> io::Result<bool> {
        let mut fds = libc::pollfd {
            fd: self.device.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };

        // SAFETY: `fds` is a single valid pollfd that outlives the call.
        let ready = unsafe { libc::poll(&mut fds, 1, POLL_INTERVAL_MS) };
        if ready < 0 {
            let err = io::Error::last_os_error();
            return match err.kind() {
                io::ErrorKind::Interrupted => Ok(false),
                _ => Err(err),
            };
        }
        if ready == 0 {
            return Ok(false);
        }
        if fds.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
            return Err(io::Error::from_raw_os_error(libc::ENODEV));
        }
        Ok(true)
    }
}

impl KeySource for EvdevSource {
    fn describe(&self) -> String {
        format!("{} ({})", self.path.display(), self.name)
    }

    fn grab(&mut self) -> io::Result<()> {
        self.device.grab()
    }

    fn ungrab(&mut self) -> io::Result<()> {
        self.device.ungrab()
    }

    fn fetch(&mut self) -> io::Result<Vec<KeyEvent>> {
        if !self.wait_readable()? {
            return Ok(Vec::new());
        }

        let events = self
            .device
            .fetch_events()?
            .filter(|event| event.event_type() == EventType::KEY)
            .filter_map(|event| {
                KeyState::from_value(event.value()).map(|state| KeyEvent::new(event.code(), state))
            })
            .collect();

        Ok(events)
    }
}
