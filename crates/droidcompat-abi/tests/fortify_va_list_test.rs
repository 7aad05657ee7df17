//! `va_list` forms of the fortified family, driven through a variadic
//! trampoline so the list is built by the compiler.

#![feature(c_variadic)]

use std::ffi::{CStr, c_char, c_int, c_void};

use bionic_compat::fortify_abi::{__vsnprintf_chk, __vsprintf_chk};

unsafe extern "C" fn snprintf_via_chk(
    dst: *mut c_char,
    size: usize,
    fmt: *const c_char,
    mut args: ...
) -> c_int {
    // SAFETY: args is this frame's live list; the callee only reads it.
    unsafe { __vsnprintf_chk(dst, size, 0, usize::MAX, fmt, (&raw mut args).cast::<c_void>()) }
}

unsafe extern "C" fn sprintf_via_chk(dst: *mut c_char, fmt: *const c_char, mut args: ...) -> c_int {
    // SAFETY: as above.
    unsafe { __vsprintf_chk(dst, 0, usize::MAX, fmt, (&raw mut args).cast::<c_void>()) }
}

#[test]
fn vsnprintf_chk_formats_like_snprintf() {
    let mut ours = [0u8; 64];
    let mut host = [0u8; 64];
    // SAFETY: buffers hold 64 bytes; arguments match the format.
    let (n_ours, n_host) = unsafe {
        (
            snprintf_via_chk(ours.as_mut_ptr().cast(), 64, c"%s=%d %.3f".as_ptr(), c"gain".as_ptr(), -3 as c_int, 0.5f64),
            libc::snprintf(host.as_mut_ptr().cast(), 64, c"%s=%d %.3f".as_ptr(), c"gain".as_ptr(), -3 as c_int, 0.5f64),
        )
    };
    assert_eq!(n_ours, n_host);
    assert_eq!(ours, host);
    assert_eq!(CStr::from_bytes_until_nul(&ours).unwrap(), c"gain=-3 0.500");
}

#[test]
fn vsnprintf_chk_truncates_to_size() {
    let mut buf = [0xFFu8; 8];
    // SAFETY: buf holds 8 bytes; size is 4.
    let n = unsafe { snprintf_via_chk(buf.as_mut_ptr().cast(), 4, c"%d".as_ptr(), 123_456 as c_int) };
    assert_eq!(n, 6);
    assert_eq!(&buf[..4], b"123\0");
    assert_eq!(buf[4], 0xFF);
}

#[test]
fn vsprintf_chk_writes_whole_string() {
    let mut buf = [0u8; 32];
    // SAFETY: output fits in 32 bytes.
    let n = unsafe { sprintf_via_chk(buf.as_mut_ptr().cast(), c"[%5x]".as_ptr(), 0xbeef as c_int) };
    assert_eq!(n, 7);
    assert_eq!(CStr::from_bytes_until_nul(&buf).unwrap(), c"[ beef]");
}
