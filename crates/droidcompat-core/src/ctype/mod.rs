//! Bionic character-classification table.
//!
//! Bionic's `<ctype.h>` macros index a 257-byte table through
//! `(_ctype_ + 1)[c]`, so slot 0 belongs to `EOF` (-1) and slot `c + 1`
//! describes byte `c`. Each slot is a bitmask of the flags below. The layout
//! follows the source runtime bit for bit; the host's own classification is
//! never consulted. C locale only: bytes `0x80..=0xFF` carry no flags.

/// Uppercase letter (`_U`).
pub const UPPER: u8 = 0x01;
/// Lowercase letter (`_L`).
pub const LOWER: u8 = 0x02;
/// Decimal digit (`_N`).
pub const DIGIT: u8 = 0x04;
/// Whitespace (`_S`).
pub const SPACE: u8 = 0x08;
/// Punctuation (`_P`).
pub const PUNCT: u8 = 0x10;
/// Control character (`_C`).
pub const CONTROL: u8 = 0x20;
/// Hexadecimal digit (`_X`).
pub const HEX: u8 = 0x40;
/// Blank: space and horizontal tab (`_B`).
pub const BLANK: u8 = 0x80;

/// Number of entries: one `EOF` sentinel plus one per byte value.
pub const TABLE_LEN: usize = 1 + 256;

/// Offset of byte 0 inside the table (slot 0 is the `EOF` sentinel).
pub const EOF_SLOT: usize = 0;

/// Flags for a single byte under the bionic C-locale rules.
#[must_use]
pub const fn flags_for(c: u8) -> u8 {
    match c {
        b'\t' => CONTROL | SPACE | BLANK,
        b'\n' | 0x0B | 0x0C | b'\r' => CONTROL | SPACE,
        0x00..=0x1F | 0x7F => CONTROL,
        b' ' => SPACE | BLANK,
        b'0'..=b'9' => DIGIT | HEX,
        b'A'..=b'F' => UPPER | HEX,
        b'G'..=b'Z' => UPPER,
        b'a'..=b'f' => LOWER | HEX,
        b'g'..=b'z' => LOWER,
        0x21..=0x7E => PUNCT,
        _ => 0,
    }
}

const fn build_table() -> [u8; TABLE_LEN] {
    let mut table = [0u8; TABLE_LEN];
    let mut c = 0usize;
    while c < 256 {
        table[c + 1] = flags_for(c as u8);
        c += 1;
    }
    table
}

/// The complete table in source-runtime layout.
pub const SOURCE_CTYPE_TABLE: [u8; TABLE_LEN] = build_table();

/// Look up the flags the way bionic's macros do: `c` may be `EOF` (-1) or a
/// value in `0..=255`. Anything else yields no flags.
#[must_use]
pub fn lookup(c: i32) -> u8 {
    match c {
        -1 => SOURCE_CTYPE_TABLE[EOF_SLOT],
        0..=255 => SOURCE_CTYPE_TABLE[c as usize + 1],
        _ => 0,
    }
}
