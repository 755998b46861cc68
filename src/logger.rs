//! Kernel log output on the second serial port.
//!
//! COM1 belongs to the console, so `log` records and `serial_println!` go to
//! COM2 where the host can capture them separately.

use lazy_static::lazy_static;
use log::{LevelFilter, Metadata, Record};
use spin::Mutex;
use uart_16550::SerialPort;

use crate::config::COM2;

lazy_static! {
    pub static ref DEBUG_SERIAL: Mutex<SerialPort> = {
        let mut serial_port = unsafe { SerialPort::new(COM2) };
        serial_port.init();
        Mutex::new(serial_port)
    };
}

static LOGGER: KernelLogger = KernelLogger;

struct KernelLogger;

impl log::Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            _print(format_args!("[{}] {}\n", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

/// Installs the kernel logger. Only the first call succeeds.
pub fn init(max_level: LevelFilter) -> Result<(), &'static str> {
    lazy_static::initialize(&DEBUG_SERIAL);
    log::set_logger(&LOGGER).map_err(|_| "logger already installed")?;
    log::set_max_level(max_level);
    log::info!("logger initialized at {}", max_level);
    Ok(())
}

#[doc(hidden)]
pub fn _print(args: ::core::fmt::Arguments) {
    use core::fmt::Write;
    use x86_64::instructions::interrupts;

    // A log from an interrupt handler must not spin on a lock the
    // interrupted code holds.
    interrupts::without_interrupts(|| {
        DEBUG_SERIAL
            .lock()
            .write_fmt(args)
            .expect("Printing to serial failed");
    });
}

/// Prints to the host through the debug serial port.
#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => {
        $crate::logger::_print(format_args!($($arg)*));
    };
}

/// Prints to the host through the debug serial port, appending a newline.
#[macro_export]
macro_rules! serial_println {
    () => ($crate::serial_print!("\n"));
    ($fmt:expr) => ($crate::serial_print!(concat!($fmt, "\n")));
    ($fmt:expr, $($arg:tt)*) => ($crate::serial_print!(
        concat!($fmt, "\n"), $($arg)*));
}
