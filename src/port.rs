//! Byte-wide x86 I/O port access.
//!
//! Every driver in the crate talks to hardware through [`PortIo`], so the same
//! code runs against the real ports on the machine and against scripted fake
//! hardware in tests.

use x86_64::instructions::port::Port;

/// System control port A. Bit 0 requests a fast reset.
pub const SYSTEM_CONTROL_PORT: u16 = 0x92;

/// Value written to [`SYSTEM_CONTROL_PORT`] to reset the machine.
pub const FAST_RESET: u8 = 0x03;

/// Something that can read and write byte-wide I/O ports.
pub trait PortIo {
    fn inb(&mut self, port: u16) -> u8;
    fn outb(&mut self, port: u16, value: u8);
}

/// The machine's real I/O port space.
#[derive(Debug, Clone, Copy)]
pub struct X86Ports {
    _private: (),
}

impl X86Ports {
    /// # Safety
    ///
    /// The caller gets unrestricted port access. Writing the wrong port can
    /// reprogram or reset hardware, so only the boot sequence should create this.
    pub const unsafe fn new() -> Self {
        X86Ports { _private: () }
    }
}

impl PortIo for X86Ports {
    #[inline]
    fn inb(&mut self, port: u16) -> u8 {
        let mut port = Port::<u8>::new(port);
        unsafe { port.read() }
    }

    #[inline]
    fn outb(&mut self, port: u16, value: u8) {
        let mut port = Port::<u8>::new(port);
        unsafe { port.write(value) }
    }
}

/// Port the firmware leaves unused; reading it burns roughly a microsecond.
const DELAY_PORT: u16 = 0x84;

/// Waits a few microseconds between polls of a slow device.
pub fn io_delay<P: PortIo + ?Sized>(ports: &mut P) {
    for _ in 0..4 {
        let _ = ports.inb(DELAY_PORT);
    }
}

/// A way to hard-reset the machine.
pub trait ResetLine {
    fn pulse_reset(&mut self);
}

impl<P: PortIo + ?Sized> ResetLine for P {
    fn pulse_reset(&mut self) {
        self.outb(SYSTEM_CONTROL_PORT, FAST_RESET);
    }
}
