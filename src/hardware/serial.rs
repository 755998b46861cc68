//! 16550 UART line driver for the console serial port.

use log::{debug, warn};

use crate::config::ConsoleConfig;
use crate::console::{ByteSource, CharSink};
use crate::port::{io_delay, PortIo};

// Register offsets from the port base.
const RX: u16 = 0; // receive buffer (DLAB=0)
const TX: u16 = 0; // transmit holding (DLAB=0)
const DLL: u16 = 0; // divisor latch low (DLAB=1)
const DLM: u16 = 1; // divisor latch high (DLAB=1)
const IER: u16 = 1; // interrupt enable (DLAB=0)
const IIR: u16 = 2; // interrupt identification (read)
const FCR: u16 = 2; // FIFO control (write)
const LCR: u16 = 3; // line control
const MCR: u16 = 4; // modem control
const LSR: u16 = 5; // line status

const IER_RDI: u8 = 0x01; // receiver data available
const LCR_DLAB: u8 = 0x80;
const LCR_WLEN8: u8 = 0x03; // 8 data bits, 1 stop, no parity
const LSR_DATA: u8 = 0x01;
const LSR_TXRDY: u8 = 0x20;

/// Console serial line.
///
/// `exists` is decided once by [`SerialPort::init`]. When the chip is absent
/// every read reports no data and every write returns immediately.
pub struct SerialPort<P: PortIo> {
    ports: P,
    base: u16,
    divisor: u16,
    tx_spin_limit: u32,
    exists: bool,
}

impl<P: PortIo> SerialPort<P> {
    /// A port that has not been probed yet; it behaves as absent until [`init`](Self::init).
    pub fn new(ports: P, config: &ConsoleConfig) -> Self {
        let divisor = config.divisor().unwrap_or_else(|err| {
            warn!("serial: {}, falling back to 9600 baud", err);
            12
        });
        SerialPort {
            ports,
            base: config.serial_base,
            divisor,
            tx_spin_limit: config.tx_spin_limit,
            exists: false,
        }
    }

    pub fn init(&mut self) {
        self.outb(FCR, 0);

        self.outb(LCR, LCR_DLAB);
        self.outb(DLL, (self.divisor & 0xFF) as u8);
        self.outb(DLM, (self.divisor >> 8) as u8);
        self.outb(LCR, LCR_WLEN8 & !LCR_DLAB);

        self.outb(MCR, 0);
        self.outb(IER, IER_RDI);

        // Floating bus reads back all ones when nothing is wired to the port.
        self.exists = self.inb(LSR) != 0xFF;

        // Clear whatever the firmware left pending.
        let _ = self.inb(IIR);
        let _ = self.inb(RX);

        if self.exists {
            debug!("serial: {:#x} ready, divisor {}", self.base, self.divisor);
        } else {
            warn!("serial: no port at {:#x}, continuing without it", self.base);
        }
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    /// A second handle on the same, already probed, line for sending only.
    ///
    /// Lets output run in a different context from the receive side without
    /// configuring or probing the chip again.
    pub fn transmitter(&self) -> SerialPort<P>
    where
        P: Clone,
    {
        SerialPort {
            ports: self.ports.clone(),
            base: self.base,
            divisor: self.divisor,
            tx_spin_limit: self.tx_spin_limit,
            exists: self.exists,
        }
    }

    /// Next received byte, if the line has one.
    pub fn try_read(&mut self) -> Option<u8> {
        if !self.exists || self.inb(LSR) & LSR_DATA == 0 {
            return None;
        }
        Some(self.inb(RX))
    }

    /// Sends `byte`, waiting a bounded time for the transmitter.
    ///
    /// A stuck transmitter costs at most `tx_spin_limit` delays, after which
    /// the byte is written anyway.
    pub fn write(&mut self, byte: u8) {
        if !self.exists {
            return;
        }
        let mut spins = 0;
        while self.inb(LSR) & LSR_TXRDY == 0 && spins < self.tx_spin_limit {
            io_delay(&mut self.ports);
            spins += 1;
        }
        self.outb(TX, byte);
    }

    fn inb(&mut self, offset: u16) -> u8 {
        self.ports.inb(self.base + offset)
    }

    fn outb(&mut self, offset: u16, value: u8) {
        self.ports.outb(self.base + offset, value)
    }
}

impl<P: PortIo> ByteSource for SerialPort<P> {
    fn next_byte(&mut self) -> Option<u8> {
        self.try_read()
    }
}

impl<P: PortIo> CharSink for SerialPort<P> {
    fn put_char(&mut self, c: u8) {
        self.write(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::COM1;
    use std::collections::VecDeque;

    /// Scripted UART: a fixed line-status value, queued receive bytes, and a
    /// log of every port write.
    #[derive(Clone)]
    struct FakeUart {
        lsr: u8,
        rx: VecDeque<u8>,
        writes: Vec<(u16, u8)>,
        lsr_reads: usize,
    }

    impl FakeUart {
        fn new(lsr: u8) -> Self {
            FakeUart {
                lsr,
                rx: VecDeque::new(),
                writes: Vec::new(),
                lsr_reads: 0,
            }
        }
    }

    impl PortIo for FakeUart {
        fn inb(&mut self, port: u16) -> u8 {
            match port.wrapping_sub(COM1) {
                LSR => {
                    self.lsr_reads += 1;
                    let data = if self.rx.is_empty() { 0 } else { LSR_DATA };
                    if self.lsr == 0xFF { 0xFF } else { self.lsr | data }
                }
                RX => self.rx.pop_front().unwrap_or(0),
                _ => 0,
            }
        }

        fn outb(&mut self, port: u16, value: u8) {
            self.writes.push((port, value));
        }
    }

    fn port(lsr: u8) -> SerialPort<FakeUart> {
        let mut serial = SerialPort::new(FakeUart::new(lsr), &ConsoleConfig::new());
        serial.init();
        serial
    }

    #[test]
    fn init_programs_divisor_and_line_control() {
        let serial = port(LSR_TXRDY);
        assert!(serial.exists());
        assert_eq!(
            serial.ports.writes,
            vec![
                (COM1 + FCR, 0),
                (COM1 + LCR, LCR_DLAB),
                (COM1 + DLL, 12),
                (COM1 + DLM, 0),
                (COM1 + LCR, LCR_WLEN8),
                (COM1 + MCR, 0),
                (COM1 + IER, IER_RDI),
            ]
        );
    }

    #[test]
    fn all_ones_line_status_means_absent() {
        let mut serial = port(0xFF);
        assert!(!serial.exists());

        serial.ports.rx.push_back(b'x');
        let reads_before = serial.ports.lsr_reads;
        assert_eq!(serial.try_read(), None);
        serial.write(b'y');
        assert_eq!(serial.ports.lsr_reads, reads_before);
        // Only the seven init writes; nothing was transmitted.
        assert_eq!(serial.ports.writes.len(), 7);
    }

    #[test]
    fn reads_until_line_is_empty() {
        let mut serial = port(LSR_TXRDY);
        serial.ports.rx.extend(b"ok");
        assert_eq!(serial.try_read(), Some(b'o'));
        assert_eq!(serial.try_read(), Some(b'k'));
        assert_eq!(serial.try_read(), None);
    }

    #[test]
    fn write_goes_to_transmit_register() {
        let mut serial = port(LSR_TXRDY);
        serial.write(b'z');
        assert_eq!(serial.ports.writes.last(), Some(&(COM1 + TX, b'z')));
    }

    #[test]
    fn transmitter_keeps_presence_of_the_line() {
        let present = port(LSR_TXRDY);
        assert!(present.transmitter().exists());
        let absent = port(0xFF);
        assert!(!absent.transmitter().exists());
    }

    #[test]
    fn stuck_transmitter_gives_up_after_limit() {
        let config = ConsoleConfig::new().with_tx_spin_limit(5);
        let mut serial = SerialPort::new(FakeUart::new(0x00), &config);
        serial.init();
        let reads_before = serial.ports.lsr_reads;

        serial.write(b'q');

        assert_eq!(serial.ports.lsr_reads - reads_before, 6);
        assert_eq!(serial.ports.writes.last(), Some(&(COM1 + TX, b'q')));
    }
}
