//! Parallel port output, for printers and debug capture boards.

use crate::console::CharSink;
use crate::port::{io_delay, PortIo};

const DATA: u16 = 0;
const STATUS: u16 = 1;
const CONTROL: u16 = 2;

const STATUS_NOT_BUSY: u8 = 0x80;
const CONTROL_STROBE: u8 = 0x01;
const CONTROL_INIT: u8 = 0x04; // active low reset, kept high
const CONTROL_SELECT: u8 = 0x08;

pub struct ParallelPort<P: PortIo> {
    ports: P,
    base: u16,
    spin_limit: u32,
}

impl<P: PortIo> ParallelPort<P> {
    pub fn new(ports: P, base: u16, spin_limit: u32) -> Self {
        ParallelPort {
            ports,
            base,
            spin_limit,
        }
    }

    /// Latches `byte` onto the data lines and pulses strobe.
    pub fn write(&mut self, byte: u8) {
        let mut spins = 0;
        while !self.ready() && spins < self.spin_limit {
            io_delay(&mut self.ports);
            spins += 1;
        }
        self.ports.outb(self.base + DATA, byte);
        self.ports.outb(self.base + CONTROL, CONTROL_SELECT | CONTROL_INIT | CONTROL_STROBE);
        self.ports.outb(self.base + CONTROL, CONTROL_SELECT);
    }

    fn ready(&mut self) -> bool {
        self.ports.inb(self.base + STATUS) & STATUS_NOT_BUSY != 0
    }
}

impl<P: PortIo> CharSink for ParallelPort<P> {
    fn put_char(&mut self, c: u8) {
        self.write(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LPT1;

    struct FakeLpt {
        status: u8,
        status_reads: u32,
        writes: Vec<(u16, u8)>,
    }

    impl PortIo for FakeLpt {
        fn inb(&mut self, port: u16) -> u8 {
            if port == LPT1 + STATUS {
                self.status_reads += 1;
                self.status
            } else {
                0
            }
        }

        fn outb(&mut self, port: u16, value: u8) {
            self.writes.push((port, value));
        }
    }

    #[test]
    fn strobes_each_byte() {
        let fake = FakeLpt {
            status: STATUS_NOT_BUSY,
            status_reads: 0,
            writes: Vec::new(),
        };
        let mut lpt = ParallelPort::new(fake, LPT1, 100);
        lpt.put_char(b'P');
        assert_eq!(
            lpt.ports.writes,
            vec![(LPT1, b'P'), (LPT1 + CONTROL, 0x0D), (LPT1 + CONTROL, 0x08)]
        );
    }

    #[test]
    fn busy_printer_is_bounded() {
        let fake = FakeLpt {
            status: 0,
            status_reads: 0,
            writes: Vec::new(),
        };
        let mut lpt = ParallelPort::new(fake, LPT1, 3);
        lpt.write(b'x');
        assert_eq!(lpt.ports.status_reads, 4);
        assert_eq!(lpt.ports.writes[0], (LPT1, b'x'));
    }
}
