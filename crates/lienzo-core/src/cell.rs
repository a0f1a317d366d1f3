//! Grid content: cells, styles, packed colors.
//!
//! Colors and attributes use the packed representations the native
//! rendering engines take on the wire: a `0xRRGGBB` word and a one-byte
//! attribute mask.

use serde::{Deserialize, Serialize};

/// A packed 24-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(u32);

impl Color {
    /// Black (0x000000).
    pub const BLACK: Self = Self(0x0000_0000);
    /// Red.
    pub const RED: Self = Self(0x00CC_0000);
    /// Green.
    pub const GREEN: Self = Self(0x0000_CC00);
    /// Yellow.
    pub const YELLOW: Self = Self(0x00CC_CC00);
    /// Blue.
    pub const BLUE: Self = Self(0x0000_00CC);
    /// Magenta.
    pub const MAGENTA: Self = Self(0x00CC_00CC);
    /// Cyan.
    pub const CYAN: Self = Self(0x0000_CCCC);
    /// White (0xFFFFFF).
    pub const WHITE: Self = Self(0x00FF_FFFF);

    /// Build a color from 8-bit channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// The packed `0xRRGGBB` word.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Wrap a packed `0xRRGGBB` word.
    #[must_use]
    pub const fn from_u32(raw: u32) -> Self {
        Self(raw & 0x00FF_FFFF)
    }

    /// Red channel.
    #[must_use]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Green channel.
    #[must_use]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Blue channel.
    #[must_use]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

/// Text attributes for a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttrMask(u8);

impl AttrMask {
    /// No attributes.
    pub const NONE: Self = Self(0);
    /// Bold text.
    pub const BOLD: Self = Self(1 << 0);
    /// Italic text.
    pub const ITALIC: Self = Self(1 << 1);
    /// Underlined text.
    pub const UNDERLINE: Self = Self(1 << 2);
    /// Strikethrough text.
    pub const STRIKETHROUGH: Self = Self(1 << 3);
    /// Dim/faint text.
    pub const DIM: Self = Self(1 << 4);
    /// Blinking text.
    pub const BLINK: Self = Self(1 << 5);
    /// Reversed colors.
    pub const REVERSE: Self = Self(1 << 6);
    /// Hidden text.
    pub const HIDDEN: Self = Self(1 << 7);

    /// Check if no attribute is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if all attributes in `other` are set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Add an attribute.
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Remove an attribute.
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

impl std::ops::BitOr for AttrMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for AttrMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// How a cell is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Attribute mask.
    pub attrs: AttrMask,
}

impl Style {
    /// White on black, no attributes.
    pub const DEFAULT: Self = Self {
        fg: Color::WHITE,
        bg: Color::BLACK,
        attrs: AttrMask::NONE,
    };

    /// Style with a different foreground.
    #[must_use]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Style with a different background.
    #[must_use]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    /// Style with extra attributes.
    #[must_use]
    pub const fn with_attrs(mut self, attrs: AttrMask) -> Self {
        self.attrs = attrs;
        self
    }

    /// Split into the packed parts a native set-cell call takes.
    #[must_use]
    pub const fn decompose(self) -> (Color, Color, AttrMask) {
        (self.fg, self.bg, self.attrs)
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One terminal cell: a character plus its style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Displayed character.
    pub ch: char,
    /// How it is drawn.
    pub style: Style,
}

impl Cell {
    /// A space in the default style.
    pub const BLANK: Self = Self {
        ch: ' ',
        style: Style::DEFAULT,
    };

    /// Build a cell.
    #[must_use]
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}
