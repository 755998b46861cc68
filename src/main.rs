#![no_std]
#![no_main]

use core::panic::PanicInfo;

use cinder::config::ConsoleConfig;
use cinder::console::ConsoleBuffer;
use cinder::println;

static CONSOLE_BUFFER: ConsoleBuffer = ConsoleBuffer::new();

#[no_mangle]
pub extern "C" fn _start() -> ! {
    println!("cinder");

    let config = ConsoleConfig::new();
    let mut console = unsafe { cinder::init(&CONSOLE_BUFFER, &config) };

    if !console.serial().exists() {
        println!("Serial port does not exist!");
    }
    log::info!("console up, echoing input");

    cinder::echo_loop(&mut console);
}

/// This function is called on panic.
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    println!("{}", info);
    log::error!("{}", info);
    cinder::hlt_loop();
}
