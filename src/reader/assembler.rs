//! Tag assembly state machine
//!
//! Accumulates the names of pressed keys until Enter is pressed, then
//! emits the accumulated text as a tag and starts over. Releases and
//! autorepeats are ignored.

use tracing::trace;

use crate::events::{KeyEvent, Tag};

use super::keys;

/// Accumulator for one scan cycle
#[derive(Debug, Default)]
pub struct TagAssembler {
    buffer: String,
}

impl TagAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text accumulated since the last terminator
    #[cfg(test)]
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Feed one key event, returning a tag when the terminator completes one
    pub fn feed(&mut self, event: KeyEvent) -> Option<Tag> {
        if !event.is_press() {
            return None;
        }

        if keys::is_terminator(event.code) {
            let tag = Tag::new(std::mem::take(&mut self.buffer));
            trace!(%tag, "terminator pressed");
            return Some(tag);
        }

        self.buffer.push_str(&keys::tag_fragment(event.code));
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::KeyState;
    use evdev::Key;

    fn press(key: Key) -> KeyEvent {
        KeyEvent::press(key.code())
    }

    #[test]
    fn test_initial_state() {
        let assembler = TagAssembler::new();
        assert_eq!(assembler.pending(), "");
    }

    #[test]
    fn test_accumulates_without_terminator() {
        let mut assembler = TagAssembler::new();

        for key in [Key::KEY_1, Key::KEY_A, Key::KEY_2, Key::KEY_B] {
            assert!(assembler.feed(press(key)).is_none());
        }

        assert_eq!(assembler.pending(), "1A2B");
    }

    #[test]
    fn test_terminator_emits_and_resets() {
        let mut assembler = TagAssembler::new();

        for key in [Key::KEY_1, Key::KEY_2, Key::KEY_3, Key::KEY_4] {
            assert!(assembler.feed(press(key)).is_none());
        }

        let tag = assembler.feed(press(Key::KEY_ENTER));
        assert_eq!(tag, Some(Tag::from("1234")));
        assert_eq!(assembler.pending(), "");
    }

    #[test]
    fn test_premature_terminator_emits_empty_tag() {
        let mut assembler = TagAssembler::new();
        assert_eq!(assembler.feed(press(Key::KEY_ENTER)), Some(Tag::default()));
    }

    #[test]
    fn test_release_and_repeat_ignored() {
        let mut assembler = TagAssembler::new();

        assembler.feed(press(Key::KEY_7));
        assembler.feed(KeyEvent::new(Key::KEY_7.code(), KeyState::Release));
        assembler.feed(KeyEvent::new(Key::KEY_7.code(), KeyState::Repeat));
        assert_eq!(
            assembler.feed(KeyEvent::new(Key::KEY_ENTER.code(), KeyState::Release)),
            None
        );

        assert_eq!(assembler.pending(), "7");
    }

    #[test]
    fn test_consecutive_tags() {
        let mut assembler = TagAssembler::new();

        assembler.feed(press(Key::KEY_1));
        let first = assembler.feed(press(Key::KEY_ENTER));
        assembler.feed(press(Key::KEY_2));
        let second = assembler.feed(press(Key::KEY_ENTER));

        assert_eq!(first, Some(Tag::from("1")));
        assert_eq!(second, Some(Tag::from("2")));
    }

    #[test]
    fn test_unknown_code_is_appended() {
        let mut assembler = TagAssembler::new();

        assembler.feed(press(Key::KEY_9));
        assembler.feed(KeyEvent::press(84));

        assert_eq!(assembler.pending(), "9<84>");
    }
}
