use log::{trace, warn};

use super::{tables, CharMap, Modifiers, NavigationKey};
use crate::port::ResetLine;

/// Extended-key prefix byte.
const E0_PREFIX: u8 = 0xE0;
/// Set on break codes, and on extended make codes after the prefix is folded in.
const BREAK_BIT: u8 = 0x80;

/// Outcome of feeding one byte to the decoder.
///
/// `Char(0)` is a key that has no character in the active table, which is
/// different from `NoEvent` (a prefix or a key release).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeResult {
    NoEvent,
    Char(u8),
}

/// Stateful scancode set 1 decoder.
///
/// Owns the modifier state; nothing else reads or writes it.
#[derive(Debug, Default)]
pub struct ScancodeDecoder {
    modifiers: Modifiers,
}

impl ScancodeDecoder {
    pub const fn new() -> Self {
        ScancodeDecoder {
            modifiers: Modifiers::empty(),
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether `c` together with the held modifiers is the Ctrl+Alt+Delete chord.
    pub fn is_reboot_chord(&self, c: u8) -> bool {
        self.modifiers.contains(Modifiers::CTL | Modifiers::ALT)
            && c == NavigationKey::Delete.code()
    }

    /// Feeds one raw byte from the keyboard controller.
    ///
    /// Ctrl+Alt+Delete pulses `reset`. On real hardware that does not return;
    /// otherwise the Delete key is still reported.
    pub fn decode_next<R: ResetLine + ?Sized>(&mut self, raw: u8, reset: &mut R) -> DecodeResult {
        let mut data = raw;

        if data == E0_PREFIX {
            self.modifiers.insert(Modifiers::E0ESC);
            return DecodeResult::NoEvent;
        } else if data & BREAK_BIT != 0 {
            // Extended break codes keep the high bit, matching their folded make codes.
            if !self.modifiers.contains(Modifiers::E0ESC) {
                data &= !BREAK_BIT;
            }
            let released = Modifiers::from_bits_truncate(tables::SHIFT_CODE[data as usize]);
            self.modifiers.remove(released | Modifiers::E0ESC);
            return DecodeResult::NoEvent;
        } else if self.modifiers.contains(Modifiers::E0ESC) {
            data |= BREAK_BIT;
            self.modifiers.remove(Modifiers::E0ESC);
        }

        self.modifiers
            .insert(Modifiers::from_bits_truncate(tables::SHIFT_CODE[data as usize]));
        self.modifiers
            .toggle(Modifiers::from_bits_truncate(tables::TOGGLE_CODE[data as usize]));

        let mut c = CharMap::select(self.modifiers).table()[data as usize];
        if self.modifiers.contains(Modifiers::CAPSLOCK) && c.is_ascii_alphabetic() {
            c ^= 0x20;
        }

        if c == tables::NO {
            trace!("keyboard: unmapped scancode {:#04x}", data);
        }

        if self.is_reboot_chord(c) {
            warn!("keyboard: ctrl-alt-del, rebooting");
            reset.pulse_reset();
        }

        DecodeResult::Char(c)
    }
}
