#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod hardware;
pub mod keyboard;
pub mod logger;
pub mod port;
pub mod vga_buffer;

use config::ConsoleConfig;
use console::{CharSink, ConsoleBuffer, ConsoleSubsystem};
use hardware::ParallelPort;
use port::{PortIo, X86Ports};
use vga_buffer::VgaConsole;

/// Display sinks the kernel console mirrors into.
pub type KernelDisplay = (VgaConsole, ParallelPort<X86Ports>);

/// Brings up logging and the console on the real machine.
///
/// # Safety
///
/// Takes raw port access; call once, early in boot.
pub unsafe fn init(
    buffer: &'static ConsoleBuffer,
    config: &ConsoleConfig,
) -> ConsoleSubsystem<'static, X86Ports, KernelDisplay> {
    if let Err(err) = logger::init(config.log_level) {
        vga_buffer::_print(format_args!("logger: {}\n", err));
    }
    let ports = X86Ports::new();
    let display = (
        VgaConsole,
        ParallelPort::new(ports, config.parallel_base, config.tx_spin_limit),
    );
    ConsoleSubsystem::init(ports, display, buffer, config)
}

/// Echoes console input back to every output until the machine resets.
pub fn echo_loop<P: PortIo, D: CharSink>(console: &mut ConsoleSubsystem<'_, P, D>) -> ! {
    loop {
        let c = console.getchar();
        let c = if c == b'\r' { b'\n' } else { c };
        console.cputchar(c);
    }
}

pub fn hlt_loop() -> ! {
    loop {
        x86_64::instructions::hlt();
    }
}
