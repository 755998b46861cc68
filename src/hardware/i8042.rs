//! i8042 keyboard controller, polled as a console byte source.

use log::trace;

use crate::console::ByteSource;
use crate::keyboard::{tables, DecodeResult, Modifiers, ScancodeDecoder};
use crate::port::PortIo;

pub const DATA_PORT: u16 = 0x60;
pub const STATUS_PORT: u16 = 0x64;

/// Output buffer holds a byte for us.
pub const STATUS_DIB: u8 = 0x01;
/// Transmission error; the byte in the buffer is not a keystroke.
pub const STATUS_TERR: u8 = 0x20;

pub struct I8042Keyboard<P: PortIo> {
    ports: P,
    decoder: ScancodeDecoder,
}

impl<P: PortIo> I8042Keyboard<P> {
    pub fn new(ports: P) -> Self {
        I8042Keyboard {
            ports,
            decoder: ScancodeDecoder::new(),
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        self.decoder.modifiers()
    }

    fn next_scancode(&mut self) -> Option<u8> {
        loop {
            let status = self.ports.inb(STATUS_PORT);
            if status & STATUS_DIB == 0 {
                return None;
            }
            let data = self.ports.inb(DATA_PORT);
            if status & STATUS_TERR != 0 {
                trace!("keyboard: dropping {:#04x}, status {:#04x}", data, status);
                continue;
            }
            return Some(data);
        }
    }
}

impl<P: PortIo> ByteSource for I8042Keyboard<P> {
    /// Decodes scancodes until one produces a character or the controller runs dry.
    ///
    /// Releases, prefixes, unmapped keys and the reboot chord produce nothing.
    fn next_byte(&mut self) -> Option<u8> {
        while let Some(scancode) = self.next_scancode() {
            match self.decoder.decode_next(scancode, &mut self.ports) {
                DecodeResult::Char(c) if c != tables::NO && !self.decoder.is_reboot_chord(c) => {
                    return Some(c)
                }
                _ => {}
            }
        }
        None
    }
}
