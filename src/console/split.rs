//! The console taken apart for interrupt-driven input.
//!
//! [`ConsoleInput`] is the only writer of the buffer and belongs to the
//! interrupt handlers. [`ConsoleReader`] is the only reader and only pops, so
//! `getchar` never touches the hardware. [`ConsoleOutput`] keeps the fan-out.

use core::fmt;
use core::hint::spin_loop;

use super::{poll_source, CharSink, ConsoleBuffer, OutputFanout};
use crate::hardware::{I8042Keyboard, SerialPort};
use crate::port::PortIo;

/// Producer half: the input sources and the decoder state they carry.
pub struct ConsoleInput<'b, P: PortIo> {
    serial: SerialPort<P>,
    keyboard: I8042Keyboard<P>,
    buffer: &'b ConsoleBuffer,
}

impl<'b, P: PortIo> ConsoleInput<'b, P> {
    pub fn new(
        serial: SerialPort<P>,
        keyboard: I8042Keyboard<P>,
        buffer: &'b ConsoleBuffer,
    ) -> Self {
        ConsoleInput {
            serial,
            keyboard,
            buffer,
        }
    }

    pub fn serial(&self) -> &SerialPort<P> {
        &self.serial
    }

    pub(super) fn serial_mut(&mut self) -> &mut SerialPort<P> {
        &mut self.serial
    }

    pub fn keyboard(&self) -> &I8042Keyboard<P> {
        &self.keyboard
    }

    pub fn buffer(&self) -> &'b ConsoleBuffer {
        self.buffer
    }

    /// Serial receive interrupt work: drain the line into the buffer.
    pub fn serial_intr(&mut self) -> usize {
        if !self.serial.exists() {
            return 0;
        }
        poll_source(&mut self.serial, self.buffer)
    }

    /// Keyboard interrupt work: decode everything pending into the buffer.
    pub fn keyboard_intr(&mut self) -> usize {
        poll_source(&mut self.keyboard, self.buffer)
    }

    /// Drains serial, then keyboard.
    pub fn poll(&mut self) -> usize {
        self.serial_intr() + self.keyboard_intr()
    }
}

/// Consumer half: reads what the producer stored, nothing else.
#[derive(Clone, Copy)]
pub struct ConsoleReader<'b> {
    buffer: &'b ConsoleBuffer,
}

impl<'b> ConsoleReader<'b> {
    pub fn new(buffer: &'b ConsoleBuffer) -> Self {
        ConsoleReader { buffer }
    }

    pub fn try_getchar(&self) -> Option<u8> {
        self.buffer.pop()
    }

    /// Waits for the producer to store a byte.
    pub fn getchar(&self) -> u8 {
        loop {
            if let Some(c) = self.buffer.pop() {
                return c;
            }
            spin_loop();
        }
    }

    pub fn getchar_timeout(&self, attempts: usize) -> Option<u8> {
        for _ in 0..attempts {
            if let Some(c) = self.buffer.pop() {
                return Some(c);
            }
            spin_loop();
        }
        None
    }
}

/// Output half: a transmit handle on the serial line plus the display sinks.
pub struct ConsoleOutput<P: PortIo, D: CharSink> {
    serial: SerialPort<P>,
    display: D,
}

impl<P: PortIo, D: CharSink> ConsoleOutput<P, D> {
    pub fn new(serial: SerialPort<P>, display: D) -> Self {
        ConsoleOutput { serial, display }
    }

    pub fn fanout(&mut self) -> OutputFanout<'_, P, D> {
        OutputFanout::new(&mut self.serial, &mut self.display)
    }

    pub fn cputchar(&mut self, c: u8) {
        self.fanout().write_char(c);
    }
}

impl<P: PortIo, D: CharSink> fmt::Write for ConsoleOutput<P, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        fmt::Write::write_str(&mut self.fanout(), s)
    }
}
