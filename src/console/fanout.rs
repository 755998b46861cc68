//! Console output: one character, every sink.

use core::fmt;

use crate::hardware::SerialPort;
use crate::port::PortIo;

/// Something that displays or transmits console output.
///
/// Sinks never fail; a sink without hardware behind it drops the character.
pub trait CharSink {
    fn put_char(&mut self, c: u8);
}

impl CharSink for () {
    fn put_char(&mut self, _c: u8) {}
}

impl<A: CharSink, B: CharSink> CharSink for (A, B) {
    fn put_char(&mut self, c: u8) {
        self.0.put_char(c);
        self.1.put_char(c);
    }
}

impl<S: CharSink + ?Sized> CharSink for &mut S {
    fn put_char(&mut self, c: u8) {
        (**self).put_char(c);
    }
}

/// Mirrors each character to the serial line and then to the display sinks.
pub struct OutputFanout<'a, P: PortIo, D: CharSink> {
    serial: &'a mut SerialPort<P>,
    display: &'a mut D,
}

impl<'a, P: PortIo, D: CharSink> OutputFanout<'a, P, D> {
    pub fn new(serial: &'a mut SerialPort<P>, display: &'a mut D) -> Self {
        OutputFanout { serial, display }
    }

    pub fn write_char(&mut self, c: u8) {
        self.serial.write(c);
        self.display.put_char(c);
    }
}

impl<P: PortIo, D: CharSink> fmt::Write for OutputFanout<'_, P, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.write_char(byte);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleConfig;

    #[derive(Default)]
    struct Capture(Vec<u8>);

    impl CharSink for Capture {
        fn put_char(&mut self, c: u8) {
            self.0.push(c);
        }
    }

    /// No UART: line status floats high.
    struct NoUart;

    impl PortIo for NoUart {
        fn inb(&mut self, _port: u16) -> u8 {
            0xFF
        }

        fn outb(&mut self, _port: u16, _value: u8) {}
    }

    #[test]
    fn absent_serial_still_reaches_display() {
        use core::fmt::Write;

        let mut serial = SerialPort::new(NoUart, &ConsoleConfig::new());
        serial.init();
        let mut display = Capture::default();

        let mut fanout = OutputFanout::new(&mut serial, &mut display);
        fanout.write_char(b'>');
        write!(fanout, " {}", 42).expect("fanout never fails");

        assert_eq!(display.0, b"> 42");
    }

    #[test]
    fn pair_sink_feeds_both() {
        let mut pair = (Capture::default(), Capture::default());
        pair.put_char(b'x');
        assert_eq!(pair.0 .0, b"x");
        assert_eq!(pair.1 .0, b"x");
    }
}
