//! Shared internal utilities for ABI adapters.

use std::ffi::{CStr, c_char};

/// Bytes of a C string, or `None` for a null pointer.
///
/// # Safety
///
/// A non-null `ptr` must point to a NUL-terminated string that outlives `'a`.
pub(crate) unsafe fn c_str_bytes<'a>(ptr: *const c_char) -> Option<&'a [u8]> {
    if ptr.is_null() {
        None
    } else {
        // SAFETY: caller guarantees a valid NUL-terminated string.
        Some(unsafe { CStr::from_ptr(ptr) }.to_bytes())
    }
}

/// Store an empty C string into `dst` when it is non-null.
///
/// # Safety
///
/// A non-null `dst` must be writable for at least one byte.
pub(crate) unsafe fn write_empty(dst: *mut c_char) {
    if !dst.is_null() {
        // SAFETY: caller guarantees one writable byte.
        unsafe { *dst = 0 };
    }
}
