//! Key identities and raw input decoding.
//!
//! The Screen reads raw units (bytes) from the surface. A unit that passes
//! [`is_self_describing`] is decoded on its own; otherwise more units are
//! accumulated until [`sequence_status`] reports the sequence complete, no more
//! input is immediately available, or the accumulation cap is hit.

use std::fmt;

const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;
const BS: u8 = 0x08;
const TAB: u8 = 0x09;
const LF: u8 = 0x0a;
const CR: u8 = 0x0d;

/// Decoded, encoding-independent key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyId {
    /// Any printable character; the character itself travels next to the id.
    Char,
    /// `ctrl+<letter>`, lowercase.
    Ctrl(char),
    /// `alt+<letter>`, lowercase.
    Alt(char),
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

pub const CTRL_R: KeyId = KeyId::Ctrl('r');
pub const CTRL_E: KeyId = KeyId::Ctrl('e');

impl KeyId {
    /// Parses names such as `ctrl+r`, `alt+b`, `left`, `backspace`, `char`.
    pub fn parse(name: &str) -> Option<KeyId> {
        let lowered = name.trim().to_ascii_lowercase();
        if let Some(rest) = lowered.strip_prefix("ctrl+") {
            return single_letter(rest).map(KeyId::Ctrl);
        }
        if let Some(rest) = lowered.strip_prefix("alt+") {
            return single_letter(rest).map(KeyId::Alt);
        }
        let key = match lowered.as_str() {
            "char" => KeyId::Char,
            "backspace" => KeyId::Backspace,
            "delete" => KeyId::Delete,
            "enter" | "return" => KeyId::Enter,
            "tab" => KeyId::Tab,
            "escape" | "esc" => KeyId::Escape,
            "up" => KeyId::Up,
            "down" => KeyId::Down,
            "left" => KeyId::Left,
            "right" => KeyId::Right,
            "home" => KeyId::Home,
            "end" => KeyId::End,
            "pageup" => KeyId::PageUp,
            "pagedown" => KeyId::PageDown,
            _ => return None,
        };
        Some(key)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyId::Char => f.write_str("char"),
            KeyId::Ctrl(ch) => write!(f, "ctrl+{ch}"),
            KeyId::Alt(ch) => write!(f, "alt+{ch}"),
            KeyId::Backspace => f.write_str("backspace"),
            KeyId::Delete => f.write_str("delete"),
            KeyId::Enter => f.write_str("enter"),
            KeyId::Tab => f.write_str("tab"),
            KeyId::Escape => f.write_str("escape"),
            KeyId::Up => f.write_str("up"),
            KeyId::Down => f.write_str("down"),
            KeyId::Left => f.write_str("left"),
            KeyId::Right => f.write_str("right"),
            KeyId::Home => f.write_str("home"),
            KeyId::End => f.write_str("end"),
            KeyId::PageUp => f.write_str("pageUp"),
            KeyId::PageDown => f.write_str("pageDown"),
        }
    }
}

fn single_letter(rest: &str) -> Option<char> {
    let mut chars = rest.chars();
    let ch = chars.next()?;
    if chars.next().is_some() || !ch.is_ascii_lowercase() {
        return None;
    }
    Some(ch)
}

/// Whether `unit` is a complete key on its own.
///
/// ESC may start a CSI/SS3 sequence and UTF-8 lead bytes need continuation
/// bytes; everything else is a single-unit key.
pub fn is_self_describing(unit: u8) -> bool {
    unit != ESC && utf8_len(unit).map_or(true, |len| len == 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStatus {
    Complete,
    Incomplete,
}

/// Completeness of an accumulated multi-unit sequence.
pub fn sequence_status(units: &[u8]) -> SequenceStatus {
    let Some(&lead) = units.first() else {
        return SequenceStatus::Incomplete;
    };

    if lead != ESC {
        return match utf8_len(lead) {
            Some(len) if units.len() < len => SequenceStatus::Incomplete,
            _ => SequenceStatus::Complete,
        };
    }

    match units.get(1) {
        None => SequenceStatus::Incomplete,
        Some(b'[') => {
            // CSI: parameters then a final byte in 0x40..=0x7e.
            match units.get(2..).and_then(|payload| payload.last()) {
                Some(last) if (0x40..=0x7e).contains(last) => SequenceStatus::Complete,
                _ => SequenceStatus::Incomplete,
            }
        }
        Some(b'O') => {
            if units.len() >= 3 {
                SequenceStatus::Complete
            } else {
                SequenceStatus::Incomplete
            }
        }
        Some(_) => SequenceStatus::Complete,
    }
}

/// Decodes one complete raw sequence.
///
/// Returns `None` for sequences no key maps to; callers drop those like an
/// unbound key.
pub fn decode(units: &[u8]) -> Option<(KeyId, Option<char>)> {
    match units {
        [] => None,
        [unit] => decode_single(*unit),
        [ESC, rest @ ..] => decode_escape(rest).map(|key| (key, None)),
        _ => decode_utf8(units),
    }
}

fn decode_single(unit: u8) -> Option<(KeyId, Option<char>)> {
    let key = match unit {
        ESC => KeyId::Escape,
        TAB => KeyId::Tab,
        CR | LF => KeyId::Enter,
        DEL | BS => KeyId::Backspace,
        1..=26 => KeyId::Ctrl((unit + 96) as char),
        0x20..=0x7e => return Some((KeyId::Char, Some(unit as char))),
        _ => return None,
    };
    Some((key, None))
}

fn decode_escape(rest: &[u8]) -> Option<KeyId> {
    let key = match rest {
        b"[A" | b"OA" => KeyId::Up,
        b"[B" | b"OB" => KeyId::Down,
        b"[C" | b"OC" => KeyId::Right,
        b"[D" | b"OD" => KeyId::Left,
        b"[H" | b"OH" | b"[1~" | b"[7~" => KeyId::Home,
        b"[F" | b"OF" | b"[4~" | b"[8~" => KeyId::End,
        b"[3~" => KeyId::Delete,
        b"[5~" | b"[[5~" => KeyId::PageUp,
        b"[6~" | b"[[6~" => KeyId::PageDown,
        b"OM" => KeyId::Enter,
        [letter @ b'a'..=b'z'] => KeyId::Alt(*letter as char),
        _ => return None,
    };
    Some(key)
}

fn decode_utf8(units: &[u8]) -> Option<(KeyId, Option<char>)> {
    let text = std::str::from_utf8(units).ok()?;
    let mut chars = text.chars();
    let ch = chars.next()?;
    if chars.next().is_some() || ch.is_control() {
        return None;
    }
    Some((KeyId::Char, Some(ch)))
}

fn utf8_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7f => Some(1),
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}
