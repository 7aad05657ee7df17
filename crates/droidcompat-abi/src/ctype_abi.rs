//! ABI layer for bionic's `<ctype.h>` table.
//!
//! Bionic's classification macros read `(_ctype_ + 1)[c]` directly; no
//! function is ever called. The table is immutable, so concurrent readers
//! need nothing.

use droidcompat_core::ctype::{SOURCE_CTYPE_TABLE, TABLE_LEN};

/// `const char _ctype_[257]`
#[allow(non_upper_case_globals)]
#[unsafe(no_mangle)]
pub static _ctype_: [u8; TABLE_LEN] = SOURCE_CTYPE_TABLE;
