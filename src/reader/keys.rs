//! Key naming for tag assembly
//!
//! Badge readers type the tag as keystrokes, so each key's symbolic
//! name with the `KEY_` prefix removed is the character it stands for.

use evdev::Key;

/// Prefix removed from every symbolic key name
pub const KEY_PREFIX: &str = "KEY_";

/// Key that ends a tag
pub const TERMINATOR: Key = Key::KEY_ENTER;

/// Symbolic name of a key code, e.g. `KEY_1` for code 2
///
/// Codes evdev has no name for render as `<code>`.
pub fn key_name(code: u16) -> String {
    let name = format!("{:?}", Key::new(code));
    if name.starts_with(KEY_PREFIX) || name.starts_with("BTN_") {
        name
    } else {
        format!("<{code}>")
    }
}

/// Remove a leading `KEY_` from a key name
///
/// Only a true prefix is removed; other names pass through untouched.
pub fn strip_key_prefix(name: &str) -> &str {
    name.strip_prefix(KEY_PREFIX).unwrap_or(name)
}

/// Whether a key code ends a tag
pub fn is_terminator(code: u16) -> bool {
    code == TERMINATOR.code()
}

/// The text a key contributes to a tag
pub fn tag_fragment(code: u16) -> String {
    strip_key_prefix(&key_name(code)).to_owned()
}
