//! Events module for raw key input and assembled tags
//!
//! Provides the key event type consumed by the tag reader, the tag
//! type it produces, and the messages the background reader sends
//! to the sorting controller.

/// Press state carried by a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Key went up
    Release,
    /// Key went down
    Press,
    /// Key held long enough to autorepeat
    Repeat,
}

impl KeyState {
    /// Map an `EV_KEY` event value onto a key state
    ///
    /// Returns `None` for values the kernel does not define.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Release),
            1 => Some(Self::Press),
            2 => Some(Self::Repeat),
            _ => None,
        }
    }
}

/// A single key transition read from an input device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Linux key code (`KEY_*` in input-event-codes.h)
    pub code: u16,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn new(code: u16, state: KeyState) -> Self {
        Self { code, state }
    }

    #[cfg(test)]
    pub fn press(code: u16) -> Self {
        Self::new(code, KeyState::Press)
    }

    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }
}

/// An identifier read from an RFID badge
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Messages sent from the background tag reader to the controller
#[derive(Debug)]
pub enum ReaderEvent {
    /// A complete tag was scanned
    Tag(Tag),
    /// The device failed; no further tags will arrive
    Failed(String),
}
