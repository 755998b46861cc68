//! PS/2 scancode set 1 decoding.

mod decoder;
pub mod tables;

pub use decoder::{DecodeResult, ScancodeDecoder};

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifier state carried across scancodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT      = 1 << 0;
        const CTL        = 1 << 1;
        const ALT        = 1 << 2;
        const CAPSLOCK   = 1 << 3;
        const NUMLOCK    = 1 << 4;
        const SCROLLLOCK = 1 << 5;
        /// The previous byte was the 0xE0 extended-key prefix.
        const E0ESC      = 1 << 6;
    }
}

/// Codes produced by the extended navigation keys.
///
/// They sit above the ASCII range so they can travel through the same byte
/// stream as ordinary characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NavigationKey {
    Home = 0xE0,
    End = 0xE1,
    Up = 0xE2,
    Down = 0xE3,
    Left = 0xE4,
    Right = 0xE5,
    PageUp = 0xE6,
    PageDown = 0xE7,
    Insert = 0xE8,
    Delete = 0xE9,
}

impl NavigationKey {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0xE0 => Some(NavigationKey::Home),
            0xE1 => Some(NavigationKey::End),
            0xE2 => Some(NavigationKey::Up),
            0xE3 => Some(NavigationKey::Down),
            0xE4 => Some(NavigationKey::Left),
            0xE5 => Some(NavigationKey::Right),
            0xE6 => Some(NavigationKey::PageUp),
            0xE7 => Some(NavigationKey::PageDown),
            0xE8 => Some(NavigationKey::Insert),
            0xE9 => Some(NavigationKey::Delete),
            _ => None,
        }
    }
}

/// Which character table a keypress is looked up in.
///
/// Ctrl+Shift deliberately uses the control table: shift has no further
/// effect once control is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharMap {
    Normal,
    Shifted,
    Control,
}

impl CharMap {
    pub fn select(modifiers: Modifiers) -> Self {
        if modifiers.contains(Modifiers::CTL) {
            CharMap::Control
        } else if modifiers.contains(Modifiers::SHIFT) {
            CharMap::Shifted
        } else {
            CharMap::Normal
        }
    }

    pub fn table(self) -> &'static [u8; 256] {
        match self {
            CharMap::Normal => &tables::NORMAL,
            CharMap::Shifted => &tables::SHIFTED,
            CharMap::Control => &tables::CONTROL,
        }
    }
}
