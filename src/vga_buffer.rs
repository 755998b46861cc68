use core::fmt;

use lazy_static::lazy_static;
use spin::Mutex;
use volatile::Volatile;

use crate::console::CharSink;
use crate::port::{PortIo, X86Ports};

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGray = 7,
    DarkGray = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    Pink = 13,
    Yellow = 14,
    White = 15,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ColorCode(u8);

impl ColorCode {
    pub const fn new(foreground: Color, background: Color) -> ColorCode {
        ColorCode((background as u8) << 4 | (foreground as u8))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
struct ScreenChar {
    ascii_character: u8,
    color_code: ColorCode,
}

pub const BUFFER_HEIGHT: usize = 25;
pub const BUFFER_WIDTH: usize = 80;
const TAB_WIDTH: usize = 4;

const VGA_TEXT_BUFFER: usize = 0xb8000;
const CRTC_INDEX: u16 = 0x3D4;
const CRTC_DATA: u16 = 0x3D5;
const CURSOR_HIGH: u8 = 0x0E;
const CURSOR_LOW: u8 = 0x0F;

#[repr(transparent)]
pub struct Buffer {
    chars: [[Volatile<ScreenChar>; BUFFER_WIDTH]; BUFFER_HEIGHT],
}

/// Text-mode writer. Output always lands on the bottom row; a newline
/// scrolls everything up by one.
pub struct Writer<P: PortIo> {
    column_position: usize,
    color_code: ColorCode,
    buffer: &'static mut Buffer,
    ports: P,
}

lazy_static! {
    pub static ref WRITER: Mutex<Writer<X86Ports>> = Mutex::new(Writer::new(
        unsafe { &mut *(VGA_TEXT_BUFFER as *mut Buffer) },
        unsafe { X86Ports::new() },
        ColorCode::new(Color::LightGray, Color::Black),
    ));
}

impl<P: PortIo> Writer<P> {
    pub fn new(buffer: &'static mut Buffer, ports: P, color_code: ColorCode) -> Self {
        Writer {
            column_position: 0,
            color_code,
            buffer,
            ports,
        }
    }

    pub fn write_byte(&mut self, byte: u8) {
        match byte {
            b'\n' => self.new_line(),
            b'\r' => self.column_position = 0,
            0x08 => {
                if self.column_position > 0 {
                    self.column_position -= 1;
                    self.put(b' ');
                }
            }
            b'\t' => loop {
                self.write_byte(b' ');
                if self.column_position % TAB_WIDTH == 0 {
                    break;
                }
            },
            byte => {
                if self.column_position >= BUFFER_WIDTH {
                    self.new_line();
                }
                self.put(byte);
                self.column_position += 1;
            }
        }
        self.update_cursor();
    }

    pub fn write_string(&mut self, s: &str) {
        for byte in s.bytes() {
            match byte {
                0x20..=0x7e | b'\n' | b'\r' | b'\t' | 0x08 => self.write_byte(byte),
                _ => self.write_byte(0xfe),
            }
        }
    }

    pub fn set_color(&mut self, color_code: ColorCode) {
        self.color_code = color_code;
    }

    pub fn clear_screen(&mut self) {
        for row in 0..BUFFER_HEIGHT {
            self.clear_row(row);
        }
        self.column_position = 0;
        self.update_cursor();
    }

    fn put(&mut self, byte: u8) {
        let row = BUFFER_HEIGHT - 1;
        let col = self.column_position;
        self.buffer.chars[row][col].write(ScreenChar {
            ascii_character: byte,
            color_code: self.color_code,
        });
    }

    fn new_line(&mut self) {
        for row in 1..BUFFER_HEIGHT {
            for col in 0..BUFFER_WIDTH {
                let character = self.buffer.chars[row][col].read();
                self.buffer.chars[row - 1][col].write(character);
            }
        }
        self.clear_row(BUFFER_HEIGHT - 1);
        self.column_position = 0;
    }

    fn clear_row(&mut self, row: usize) {
        let blank = ScreenChar {
            ascii_character: b' ',
            color_code: self.color_code,
        };
        for col in 0..BUFFER_WIDTH {
            self.buffer.chars[row][col].write(blank);
        }
    }

    fn update_cursor(&mut self) {
        let column = self.column_position.min(BUFFER_WIDTH - 1);
        let pos = ((BUFFER_HEIGHT - 1) * BUFFER_WIDTH + column) as u16;
        self.ports.outb(CRTC_INDEX, CURSOR_HIGH);
        self.ports.outb(CRTC_DATA, (pos >> 8) as u8);
        self.ports.outb(CRTC_INDEX, CURSOR_LOW);
        self.ports.outb(CRTC_DATA, (pos & 0xFF) as u8);
    }
}

impl<P: PortIo> fmt::Write for Writer<P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_string(s);
        Ok(())
    }
}

impl<P: PortIo> CharSink for Writer<P> {
    fn put_char(&mut self, c: u8) {
        self.write_byte(c);
    }
}

/// Display sink backed by the global [`WRITER`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VgaConsole;

impl CharSink for VgaConsole {
    fn put_char(&mut self, c: u8) {
        x86_64::instructions::interrupts::without_interrupts(|| {
            WRITER.lock().write_byte(c);
        });
    }
}

// ----------------------------------------------------------------------------------------
// Macros

#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::vga_buffer::_print(format_args!($($arg)*)));
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    use core::fmt::Write;
    use x86_64::instructions::interrupts;

    interrupts::without_interrupts(|| {
        WRITER.lock().write_fmt(args).expect("Printing to VGA failed");
    });
}

// ----------------------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[derive(Default)]
    struct CrtcLog(Vec<(u16, u8)>);

    impl PortIo for CrtcLog {
        fn inb(&mut self, _port: u16) -> u8 {
            0
        }

        fn outb(&mut self, port: u16, value: u8) {
            self.0.push((port, value));
        }
    }

    fn test_writer() -> Writer<CrtcLog> {
        // All-zero cells are valid screen characters.
        let buffer: &'static mut Buffer = Box::leak(Box::new(unsafe { core::mem::zeroed() }));
        let mut writer = Writer::new(
            buffer,
            CrtcLog::default(),
            ColorCode::new(Color::LightGray, Color::Black),
        );
        writer.clear_screen();
        writer
    }

    fn row_text(writer: &Writer<CrtcLog>, row: usize, len: usize) -> Vec<u8> {
        (0..len)
            .map(|col| writer.buffer.chars[row][col].read().ascii_character)
            .collect()
    }

    #[test]
    fn test_println_output() {
        let mut writer = test_writer();
        let s = "Some test string that fits on a single line";
        writeln!(writer, "{}", s).expect("writeln failed");
        assert_eq!(row_text(&writer, BUFFER_HEIGHT - 2, s.len()), s.as_bytes());
    }

    #[test]
    fn formatted_output_never_reports_an_error() {
        let mut writer = test_writer();
        for line in 0..BUFFER_HEIGHT * 2 {
            assert!(write!(writer, "line {}\t\x08{:>90}\r\n", line, "\u{e9}").is_ok());
        }
    }

    #[test]
    fn backspace_erases_previous_cell() {
        let mut writer = test_writer();
        writer.write_string("ab\x08");
        assert_eq!(row_text(&writer, BUFFER_HEIGHT - 1, 2), b"a ");
        assert_eq!(writer.column_position, 1);
    }

    #[test]
    fn tab_advances_to_next_stop() {
        let mut writer = test_writer();
        writer.write_string("a\tb");
        assert_eq!(row_text(&writer, BUFFER_HEIGHT - 1, 5), b"a   b");
    }

    #[test]
    fn long_line_wraps() {
        let mut writer = test_writer();
        for _ in 0..BUFFER_WIDTH {
            writer.write_byte(b'x');
        }
        writer.write_byte(b'y');
        assert_eq!(row_text(&writer, BUFFER_HEIGHT - 2, 1), b"x");
        assert_eq!(row_text(&writer, BUFFER_HEIGHT - 1, 1), b"y");
    }

    #[test]
    fn cursor_follows_output() {
        let mut writer = test_writer();
        writer.write_byte(b'k');
        let pos = ((BUFFER_HEIGHT - 1) * BUFFER_WIDTH + 1) as u16;
        let tail = &writer.ports.0[writer.ports.0.len() - 4..];
        assert_eq!(
            tail,
            &[
                (CRTC_INDEX, CURSOR_HIGH),
                (CRTC_DATA, (pos >> 8) as u8),
                (CRTC_INDEX, CURSOR_LOW),
                (CRTC_DATA, (pos & 0xFF) as u8),
            ]
        );
    }
}
