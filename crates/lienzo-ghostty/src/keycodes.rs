//! Hardware keycode tables for key injection.
//!
//! `ghostty_surface_key` wants the platform's physical keycode next to
//! the codepoint, so each OS gets its own table: X11/XKB codes on
//! Linux, Carbon virtual codes on macOS, and virtual-key codes on
//! Windows. Zero means "no code known"; injection falls back to the
//! codepoint alone.

use lienzo_core::Key;

/// Keycode for a semantic key, if the platform defines one.
pub(crate) fn keycode_for_key(key: Key) -> Option<u32> {
    if let Some(ch) = key.control_rune() {
        return keycode_for_rune(ch);
    }
    platform::semantic_keycode(key)
}

/// Keycode for a printable character, if the platform defines one.
/// Uppercase letters fold onto their unshifted key.
pub(crate) fn keycode_for_rune(ch: char) -> Option<u32> {
    platform::rune_keycode(ch.to_ascii_lowercase())
}

#[cfg(target_os = "linux")]
mod platform {
    use lienzo_core::Key;

    pub(super) fn semantic_keycode(key: Key) -> Option<u32> {
        match key {
            Key::Enter => Some(36),
            Key::Backspace => Some(22),
            Key::Tab => Some(23),
            Key::Escape => Some(9),
            Key::Delete => Some(119),
            Key::Insert => Some(118),
            Key::Home => Some(110),
            Key::End => Some(115),
            Key::PageUp => Some(112),
            Key::PageDown => Some(117),
            Key::Up => Some(111),
            Key::Down => Some(116),
            Key::Left => Some(113),
            Key::Right => Some(114),
            Key::F1 => Some(67),
            Key::F2 => Some(68),
            Key::F3 => Some(69),
            Key::F4 => Some(70),
            Key::F5 => Some(71),
            Key::F6 => Some(72),
            Key::F7 => Some(73),
            Key::F8 => Some(74),
            Key::F9 => Some(75),
            Key::F10 => Some(76),
            Key::F11 => Some(95),
            Key::F12 => Some(96),
            _ => None,
        }
    }

    pub(super) fn rune_keycode(ch: char) -> Option<u32> {
        match ch {
            'a' => Some(38),
            'b' => Some(56),
            'c' => Some(54),
            'd' => Some(40),
            'e' => Some(26),
            'f' => Some(41),
            'g' => Some(42),
            'h' => Some(43),
            'i' => Some(31),
            'j' => Some(44),
            'k' => Some(45),
            'l' => Some(46),
            'm' => Some(58),
            'n' => Some(57),
            'o' => Some(32),
            'p' => Some(33),
            'q' => Some(24),
            'r' => Some(27),
            's' => Some(39),
            't' => Some(28),
            'u' => Some(30),
            'v' => Some(55),
            'w' => Some(25),
            'x' => Some(53),
            'y' => Some(29),
            'z' => Some(52),
            '1' => Some(10),
            '2' => Some(11),
            '3' => Some(12),
            '4' => Some(13),
            '5' => Some(14),
            '6' => Some(15),
            '7' => Some(16),
            '8' => Some(17),
            '9' => Some(18),
            '0' => Some(19),
            ' ' => Some(65),
            '-' | '_' => Some(20),
            '=' | '+' => Some(21),
            '[' | '{' => Some(34),
            ']' | '}' => Some(35),
            '\\' | '|' => Some(51),
            ';' | ':' => Some(47),
            '\'' | '"' => Some(48),
            '`' | '~' => Some(49),
            ',' | '<' => Some(59),
            '.' | '>' => Some(60),
            '/' | '?' => Some(61),
            '\t' => Some(23),
            '\n' | '\r' => Some(36),
            '\u{8}' => Some(22),
            _ => None,
        }
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use lienzo_core::Key;

    pub(super) fn semantic_keycode(key: Key) -> Option<u32> {
        match key {
            Key::Enter => Some(36),
            Key::Backspace => Some(51),
            Key::Tab => Some(48),
            Key::Escape => Some(53),
            Key::Delete => Some(117),
            Key::Insert => Some(114),
            Key::Home => Some(115),
            Key::End => Some(119),
            Key::PageUp => Some(116),
            Key::PageDown => Some(121),
            Key::Up => Some(126),
            Key::Down => Some(125),
            Key::Left => Some(123),
            Key::Right => Some(124),
            Key::F1 => Some(122),
            Key::F2 => Some(120),
            Key::F3 => Some(99),
            Key::F4 => Some(118),
            Key::F5 => Some(96),
            Key::F6 => Some(97),
            Key::F7 => Some(98),
            Key::F8 => Some(100),
            Key::F9 => Some(101),
            Key::F10 => Some(109),
            Key::F11 => Some(103),
            Key::F12 => Some(111),
            _ => None,
        }
    }

    pub(super) fn rune_keycode(ch: char) -> Option<u32> {
        match ch {
            'a' => Some(0),
            's' => Some(1),
            'd' => Some(2),
            'f' => Some(3),
            'h' => Some(4),
            'g' => Some(5),
            'z' => Some(6),
            'x' => Some(7),
            'c' => Some(8),
            'v' => Some(9),
            'b' => Some(11),
            'q' => Some(12),
            'w' => Some(13),
            'e' => Some(14),
            'r' => Some(15),
            'y' => Some(16),
            't' => Some(17),
            '1' => Some(18),
            '2' => Some(19),
            '3' => Some(20),
            '4' => Some(21),
            '6' => Some(22),
            '5' => Some(23),
            '=' | '+' => Some(24),
            '9' => Some(25),
            '7' => Some(26),
            '-' | '_' => Some(27),
            '8' => Some(28),
            '0' => Some(29),
            ']' | '}' => Some(30),
            'o' => Some(31),
            'u' => Some(32),
            '[' | '{' => Some(33),
            'i' => Some(34),
            'p' => Some(35),
            'l' => Some(37),
            'j' => Some(38),
            '\'' | '"' => Some(39),
            'k' => Some(40),
            ';' | ':' => Some(41),
            '\\' | '|' => Some(42),
            ',' | '<' => Some(43),
            '/' | '?' => Some(44),
            'n' => Some(45),
            'm' => Some(46),
            '.' | '>' => Some(47),
            '`' | '~' => Some(50),
            ' ' => Some(49),
            '\t' => Some(48),
            '\n' | '\r' => Some(36),
            '\u{8}' => Some(51),
            _ => None,
        }
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use lienzo_core::Key;

    pub(super) fn semantic_keycode(key: Key) -> Option<u32> {
        match key {
            Key::Enter => Some(0x0D),
            Key::Backspace => Some(0x08),
            Key::Tab => Some(0x09),
            Key::Escape => Some(0x1B),
            Key::Delete => Some(0x2E),
            Key::Insert => Some(0x2D),
            Key::Home => Some(0x24),
            Key::End => Some(0x23),
            Key::PageUp => Some(0x21),
            Key::PageDown => Some(0x22),
            Key::Up => Some(0x26),
            Key::Down => Some(0x28),
            Key::Left => Some(0x25),
            Key::Right => Some(0x27),
            Key::F1 => Some(0x70),
            Key::F2 => Some(0x71),
            Key::F3 => Some(0x72),
            Key::F4 => Some(0x73),
            Key::F5 => Some(0x74),
            Key::F6 => Some(0x75),
            Key::F7 => Some(0x76),
            Key::F8 => Some(0x77),
            Key::F9 => Some(0x78),
            Key::F10 => Some(0x79),
            Key::F11 => Some(0x7A),
            Key::F12 => Some(0x7B),
            _ => None,
        }
    }

    pub(super) fn rune_keycode(ch: char) -> Option<u32> {
        match ch {
            'a'..='z' => Some(u32::from(ch) - u32::from('a') + 0x41),
            '0'..='9' => Some(u32::from(ch)),
            ' ' => Some(0x20),
            ';' | ':' => Some(0xBA),
            '=' | '+' => Some(0xBB),
            ',' | '<' => Some(0xBC),
            '-' | '_' => Some(0xBD),
            '.' | '>' => Some(0xBE),
            '/' | '?' => Some(0xBF),
            '`' | '~' => Some(0xC0),
            '[' | '{' => Some(0xDB),
            '\\' | '|' => Some(0xDC),
            ']' | '}' => Some(0xDD),
            '\'' | '"' => Some(0xDE),
            '\t' => Some(0x09),
            '\n' | '\r' => Some(0x0D),
            '\u{8}' => Some(0x08),
            _ => None,
        }
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod platform {
    use lienzo_core::Key;

    pub(super) fn semantic_keycode(_key: Key) -> Option<u32> {
        None
    }

    pub(super) fn rune_keycode(_ch: char) -> Option<u32> {
        None
    }
}
