//! Console input multiplexing and output fan-out.
//!
//! Input arrives from the serial line and the keyboard and is drained into
//! the shared [`ConsoleBuffer`], either by [`ConsoleSubsystem::service`] while
//! `getchar` spins, or by the [`ConsoleInput`] half from interrupt handlers.
//! The buffer has exactly one producer and one consumer either way. Output
//! skips the buffer and goes straight to every sink.

mod fanout;
mod ring;
mod split;

pub use fanout::{CharSink, OutputFanout};
pub use ring::{ConsoleBuffer, CONSOLE_BUFFER_SIZE};
pub use split::{ConsoleInput, ConsoleOutput, ConsoleReader};

use core::fmt;
use core::hint::spin_loop;

use log::debug;

use crate::config::ConsoleConfig;
use crate::hardware::{I8042Keyboard, SerialPort};
use crate::port::PortIo;

/// A polled producer of console input.
pub trait ByteSource {
    /// The next available byte, or `None` once the source has nothing more right now.
    fn next_byte(&mut self) -> Option<u8>;
}

/// Moves everything `source` currently has into `buffer`.
///
/// The source is always drained completely, even when the buffer fills up
/// and further bytes are dropped. Returns how many bytes were stored.
pub fn poll_source<S, const N: usize>(source: &mut S, buffer: &ConsoleBuffer<N>) -> usize
where
    S: ByteSource + ?Sized,
{
    let mut stored = 0;
    while let Some(byte) = source.next_byte() {
        if buffer.push(byte) {
            stored += 1;
        }
    }
    stored
}

/// The console: its input sources, its display sinks and the input buffer.
///
/// Owned by the boot sequence and passed to whoever needs console I/O. Used
/// whole, it is the polled console: `getchar` drains the sources itself. For
/// interrupt-driven input, [`split`](Self::split) it so the handler owns the
/// only producer and `getchar` only consumes.
pub struct ConsoleSubsystem<'b, P: PortIo, D: CharSink> {
    input: ConsoleInput<'b, P>,
    display: D,
}

impl<'b, P: PortIo, D: CharSink> ConsoleSubsystem<'b, P, D> {
    pub fn new(
        serial: SerialPort<P>,
        keyboard: I8042Keyboard<P>,
        display: D,
        buffer: &'b ConsoleBuffer,
    ) -> Self {
        ConsoleSubsystem {
            input: ConsoleInput::new(serial, keyboard, buffer),
            display,
        }
    }

    /// Probes and configures the hardware behind `ports` and returns a ready console.
    pub fn init(ports: P, display: D, buffer: &'b ConsoleBuffer, config: &ConsoleConfig) -> Self
    where
        P: Clone,
    {
        let mut serial = SerialPort::new(ports.clone(), config);
        serial.init();
        let keyboard = I8042Keyboard::new(ports);
        debug!("console: ready, serial present: {}", serial.exists());
        Self::new(serial, keyboard, display, buffer)
    }

    pub fn serial(&self) -> &SerialPort<P> {
        self.input.serial()
    }

    pub fn keyboard(&self) -> &I8042Keyboard<P> {
        self.input.keyboard()
    }

    pub fn buffer(&self) -> &'b ConsoleBuffer {
        self.input.buffer()
    }

    pub fn serial_intr(&mut self) -> usize {
        self.input.serial_intr()
    }

    pub fn keyboard_intr(&mut self) -> usize {
        self.input.keyboard_intr()
    }

    /// Polls serial, then keyboard, then hands back the oldest buffered byte.
    pub fn service(&mut self) -> Option<u8> {
        self.input.poll();
        self.input.buffer().pop()
    }

    /// One non-blocking round of [`service`](Self::service).
    pub fn try_getchar(&mut self) -> Option<u8> {
        self.service()
    }

    /// Waits for input. There is no way out except a byte arriving.
    pub fn getchar(&mut self) -> u8 {
        loop {
            if let Some(c) = self.service() {
                return c;
            }
            spin_loop();
        }
    }

    /// Like [`getchar`](Self::getchar), but gives up after `attempts` polls.
    pub fn getchar_timeout(&mut self, attempts: usize) -> Option<u8> {
        for _ in 0..attempts {
            if let Some(c) = self.service() {
                return Some(c);
            }
            spin_loop();
        }
        None
    }

    pub fn fanout(&mut self) -> OutputFanout<'_, P, D> {
        OutputFanout::new(self.input.serial_mut(), &mut self.display)
    }

    pub fn cputchar(&mut self, c: u8) {
        self.fanout().write_char(c);
    }

    /// Separates producer, consumer and output for interrupt-driven input.
    pub fn split(self) -> (ConsoleInput<'b, P>, ConsoleReader<'b>, ConsoleOutput<P, D>)
    where
        P: Clone,
    {
        let reader = ConsoleReader::new(self.input.buffer());
        let output = ConsoleOutput::new(self.input.serial().transmitter(), self.display);
        (self.input, reader, output)
    }
}

impl<P: PortIo, D: CharSink> fmt::Write for ConsoleSubsystem<'_, P, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        fmt::Write::write_str(&mut self.fanout(), s)
    }
}
