//! Scancode set 1 lookup tables for a US keyboard.
//!
//! Each table maps a raw scancode to a character. Extended keys (0xE0 prefix)
//! are looked up with the high bit set, so they share the index range of break
//! codes. Anything not listed maps to [`NO`].

use super::{Modifiers, NavigationKey};

/// Marker for a scancode with no character.
pub const NO: u8 = 0;

/// Builds a full table from a dense prefix and a list of sparse entries.
const fn table(dense: &[u8], sparse: &[(u8, u8)]) -> [u8; 256] {
    let mut out = [NO; 256];
    let mut i = 0;
    while i < dense.len() {
        out[i] = dense[i];
        i += 1;
    }
    let mut j = 0;
    while j < sparse.len() {
        out[sparse[j].0 as usize] = sparse[j].1;
        j += 1;
    }
    out
}

const fn ctrl(c: u8) -> u8 {
    c.wrapping_sub(b'@')
}

const HOME: u8 = NavigationKey::Home as u8;
const END: u8 = NavigationKey::End as u8;
const UP: u8 = NavigationKey::Up as u8;
const DOWN: u8 = NavigationKey::Down as u8;
const LEFT: u8 = NavigationKey::Left as u8;
const RIGHT: u8 = NavigationKey::Right as u8;
const PAGE_UP: u8 = NavigationKey::PageUp as u8;
const PAGE_DOWN: u8 = NavigationKey::PageDown as u8;
const INSERT: u8 = NavigationKey::Insert as u8;
const DELETE: u8 = NavigationKey::Delete as u8;

/// Extended navigation block, identical in every table.
const NAVIGATION: [(u8, u8); 10] = [
    (0xC7, HOME),
    (0xC8, UP),
    (0xC9, PAGE_UP),
    (0xCB, LEFT),
    (0xCD, RIGHT),
    (0xCF, END),
    (0xD0, DOWN),
    (0xD1, PAGE_DOWN),
    (0xD2, INSERT),
    (0xD3, DELETE),
];

const fn with_navigation(extra: [(u8, u8); 2]) -> [(u8, u8); 12] {
    let mut out = [(0, 0); 12];
    let mut i = 0;
    while i < NAVIGATION.len() {
        out[i] = NAVIGATION[i];
        i += 1;
    }
    out[10] = extra[0];
    out[11] = extra[1];
    out
}

#[rustfmt::skip]
pub static NORMAL: [u8; 256] = table(
    &[
        NO,    0x1B,  b'1',  b'2',  b'3',  b'4',  b'5',  b'6',  // 0x00
        b'7',  b'8',  b'9',  b'0',  b'-',  b'=',  0x08,  b'\t',
        b'q',  b'w',  b'e',  b'r',  b't',  b'y',  b'u',  b'i',  // 0x10
        b'o',  b'p',  b'[',  b']',  b'\n', NO,    b'a',  b's',
        b'd',  b'f',  b'g',  b'h',  b'j',  b'k',  b'l',  b';',  // 0x20
        b'\'', b'`',  NO,    b'\\', b'z',  b'x',  b'c',  b'v',
        b'b',  b'n',  b'm',  b',',  b'.',  b'/',  NO,    b'*',  // 0x30
        NO,    b' ',  NO,    NO,    NO,    NO,    NO,    NO,
        NO,    NO,    NO,    NO,    NO,    NO,    NO,    b'7',  // 0x40
        b'8',  b'9',  b'-',  b'4',  b'5',  b'6',  b'+',  b'1',
        b'2',  b'3',  b'0',  b'.',                              // 0x50
    ],
    &with_navigation([(0x9C, b'\n'), (0xB5, b'/')]),
);

#[rustfmt::skip]
pub static SHIFTED: [u8; 256] = table(
    &[
        NO,    0x1B,  b'!',  b'@',  b'#',  b'$',  b'%',  b'^',  // 0x00
        b'&',  b'*',  b'(',  b')',  b'_',  b'+',  0x08,  b'\t',
        b'Q',  b'W',  b'E',  b'R',  b'T',  b'Y',  b'U',  b'I',  // 0x10
        b'O',  b'P',  b'{',  b'}',  b'\n', NO,    b'A',  b'S',
        b'D',  b'F',  b'G',  b'H',  b'J',  b'K',  b'L',  b':',  // 0x20
        b'"',  b'~',  NO,    b'|',  b'Z',  b'X',  b'C',  b'V',
        b'B',  b'N',  b'M',  b'<',  b'>',  b'?',  NO,    b'*',  // 0x30
        NO,    b' ',  NO,    NO,    NO,    NO,    NO,    NO,
        NO,    NO,    NO,    NO,    NO,    NO,    NO,    b'7',  // 0x40
        b'8',  b'9',  b'-',  b'4',  b'5',  b'6',  b'+',  b'1',
        b'2',  b'3',  b'0',  b'.',                              // 0x50
    ],
    &with_navigation([(0x9C, b'\n'), (0xB5, b'/')]),
);

// Ctrl+/ produces 0x1F (^_), the usual terminal encoding.
#[rustfmt::skip]
pub static CONTROL: [u8; 256] = table(
    &[
        NO,        NO,        NO,        NO,        NO,        NO,        NO,        NO,
        NO,        NO,        NO,        NO,        NO,        NO,        NO,        NO,
        ctrl(b'Q'), ctrl(b'W'), ctrl(b'E'), ctrl(b'R'), ctrl(b'T'), ctrl(b'Y'), ctrl(b'U'), ctrl(b'I'),
        ctrl(b'O'), ctrl(b'P'), NO,        NO,        b'\r',     NO,        ctrl(b'A'), ctrl(b'S'),
        ctrl(b'D'), ctrl(b'F'), ctrl(b'G'), ctrl(b'H'), ctrl(b'J'), ctrl(b'K'), ctrl(b'L'), NO,
        NO,        NO,        NO,        ctrl(b'\\'), ctrl(b'Z'), ctrl(b'X'), ctrl(b'C'), ctrl(b'V'),
        ctrl(b'B'), ctrl(b'N'), ctrl(b'M'), NO,        NO,        ctrl(b'_'), NO,        NO,
    ],
    &with_navigation([(0x9C, b'\r'), (0xB5, ctrl(b'_'))]),
);

/// Momentary modifiers asserted by a make code and released by its break code.
pub static SHIFT_CODE: [u8; 256] = table(
    &[],
    &[
        (0x1D, Modifiers::CTL.bits()),
        (0x2A, Modifiers::SHIFT.bits()),
        (0x36, Modifiers::SHIFT.bits()),
        (0x38, Modifiers::ALT.bits()),
        (0x9D, Modifiers::CTL.bits()),
        (0xB8, Modifiers::ALT.bits()),
    ],
);

/// Sticky modifiers flipped by each make code.
pub static TOGGLE_CODE: [u8; 256] = table(
    &[],
    &[
        (0x3A, Modifiers::CAPSLOCK.bits()),
        (0x45, Modifiers::NUMLOCK.bits()),
        (0x46, Modifiers::SCROLLLOCK.bits()),
    ],
);
