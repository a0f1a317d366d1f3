//! Input events delivered by terminal backends.

use serde::{Deserialize, Serialize};

/// Events a backend delivers to the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// The native surface asked for a repaint.
    Render,
    /// The terminal grid changed size.
    Resize {
        /// New width in cells.
        columns: u16,
        /// New height in cells.
        rows: u16,
    },
    /// Key pressed or repeated.
    Key(KeyEvent),
    /// Pointer activity.
    Mouse(MouseEvent),
}

/// How a key event was produced.
///
/// Releases are never delivered; a backend that sees one drops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAction {
    /// Initial press.
    Press,
    /// Auto-repeat while held.
    Repeat,
}

/// A single key activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Semantic identity of the key.
    pub key: Key,
    /// Literal character, when the key produced one.
    pub ch: Option<char>,
    /// Held modifiers.
    pub mods: Modifiers,
    /// Press or repeat.
    pub action: KeyAction,
}

impl KeyEvent {
    /// Event for a semantic key with no literal character.
    #[must_use]
    pub const fn new(key: Key, mods: Modifiers) -> Self {
        Self {
            key,
            ch: None,
            mods,
            action: KeyAction::Press,
        }
    }

    /// Event for a literal character.
    #[must_use]
    pub const fn rune(ch: char, mods: Modifiers) -> Self {
        Self {
            key: Key::Rune,
            ch: Some(ch),
            mods,
            action: KeyAction::Press,
        }
    }

    /// Same event with a different action.
    #[must_use]
    pub const fn with_action(mut self, action: KeyAction) -> Self {
        self.action = action;
        self
    }
}

/// Semantic key identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A literal character, carried in [`KeyEvent::ch`].
    Rune,

    // Editing
    /// Enter key
    Enter,
    /// Backspace key
    Backspace,
    /// Tab key
    Tab,
    /// Escape key
    Escape,
    /// Delete key
    Delete,
    /// Insert key
    Insert,

    // Navigation
    /// Home key
    Home,
    /// End key
    End,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,

    // Function keys
    /// F1 key
    F1,
    /// F2 key
    F2,
    /// F3 key
    F3,
    /// F4 key
    F4,
    /// F5 key
    F5,
    /// F6 key
    F6,
    /// F7 key
    F7,
    /// F8 key
    F8,
    /// F9 key
    F9,
    /// F10 key
    F10,
    /// F11 key
    F11,
    /// F12 key
    F12,

    // Dedicated control shortcuts
    /// Ctrl-B
    CtrlB,
    /// Ctrl-C
    CtrlC,
    /// Ctrl-D
    CtrlD,
    /// Ctrl-F
    CtrlF,
    /// Ctrl-P
    CtrlP,
    /// Ctrl-V
    CtrlV,
    /// Ctrl-X
    CtrlX,
    /// Ctrl-Z
    CtrlZ,
}

impl Key {
    /// Dedicated control-shortcut identity for a lowercase character.
    #[must_use]
    pub const fn from_control_rune(ch: char) -> Option<Self> {
        match ch {
            'b' => Some(Self::CtrlB),
            'c' => Some(Self::CtrlC),
            'd' => Some(Self::CtrlD),
            'f' => Some(Self::CtrlF),
            'p' => Some(Self::CtrlP),
            'v' => Some(Self::CtrlV),
            'x' => Some(Self::CtrlX),
            'z' => Some(Self::CtrlZ),
            _ => None,
        }
    }

    /// Lowercase character behind a dedicated control-shortcut identity.
    #[must_use]
    pub const fn control_rune(self) -> Option<char> {
        match self {
            Self::CtrlB => Some('b'),
            Self::CtrlC => Some('c'),
            Self::CtrlD => Some('d'),
            Self::CtrlF => Some('f'),
            Self::CtrlP => Some('p'),
            Self::CtrlV => Some('v'),
            Self::CtrlX => Some('x'),
            Self::CtrlZ => Some('z'),
            _ => None,
        }
    }

    /// True for the dedicated control-shortcut identities.
    #[must_use]
    pub const fn is_control_shortcut(self) -> bool {
        self.control_rune().is_some()
    }
}

/// Keyboard modifier set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers(u8);

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self(0);
    /// Shift held.
    pub const SHIFT: Self = Self(1 << 0);
    /// Control held.
    pub const CTRL: Self = Self(1 << 1);
    /// Alt held.
    pub const ALT: Self = Self(1 << 2);
    /// Super/Command held.
    pub const SUPER: Self = Self(1 << 3);

    /// Create empty modifiers.
    #[must_use]
    pub const fn empty() -> Self {
        Self::NONE
    }

    /// Check if no modifier is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if all modifiers in `other` are set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Add a modifier.
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Remove a modifier.
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Get raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Create from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for Modifiers {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

/// Pointer buttons, with wheel steps folded in as buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// No button (plain movement).
    None,
    /// Left button
    Left,
    /// Right button
    Right,
    /// Middle button
    Middle,
    /// One wheel step up
    WheelUp,
    /// One wheel step down
    WheelDown,
}

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseAction {
    /// Button pressed (also used for wheel steps).
    Press,
    /// Button released.
    Release,
    /// Pointer moved.
    Move,
}

/// A single pointer event in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseEvent {
    /// Column of the affected cell.
    pub x: u16,
    /// Row of the affected cell.
    pub y: u16,
    /// Button involved, [`MouseButton::None`] for plain movement.
    pub button: MouseButton,
    /// Press, release or move.
    pub action: MouseAction,
    /// Held modifiers.
    pub mods: Modifiers,
}
