//! ABI layer for bionic's `__errno`.
//!
//! Bionic spells the errno accessor `__errno`; glibc spells it
//! `__errno_location`. Returning glibc's cell keeps a single errno per
//! thread, so failures set by host calls are what the module reads.

use std::ffi::c_int;

/// `int* __errno(void)`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __errno() -> *mut c_int {
    // SAFETY: always valid for the calling thread.
    unsafe { libc::__errno_location() }
}
