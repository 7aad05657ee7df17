//! Android `liblog` for a glibc host.
//!
//! Every entry point renders its message, frames it as `[prio/tag] msg\n`
//! and writes the line to standard error with one `write`. Log buffers and
//! priorities are not filtered: everything is loggable. The caller's `errno`
//! is unchanged on return.
//!
//! Built as `liblog.so` so a prebuilt module's `DT_NEEDED` entry resolves to
//! it unchanged.

#![feature(c_variadic)]
#![allow(clippy::missing_safety_doc)]

mod render;
mod sink;

use std::ffi::{CStr, c_char, c_int, c_void};

use droidcompat_core::log::LOG_BUF_SIZE;

pub use render::{HostArg, render};

/// C `va_list` as received by a callee: one pointer on both 64-bit targets.
pub type RawVaList = *mut c_void;

unsafe extern "C" {
    #[link_name = "vsnprintf"]
    fn host_vsnprintf(dst: *mut c_char, size: usize, fmt: *const c_char, ap: RawVaList) -> c_int;
}

/// # Safety
///
/// A non-null `ptr` must point to a NUL-terminated string.
unsafe fn text_bytes<'a>(ptr: *const c_char) -> &'a [u8] {
    if ptr.is_null() {
        b""
    } else {
        // SAFETY: caller guarantees a valid NUL-terminated string.
        unsafe { CStr::from_ptr(ptr) }.to_bytes()
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __android_log_write(
    prio: c_int,
    tag: *const c_char,
    text: *const c_char,
) -> c_int {
    let _errno = sink::SavedErrno::new();
    // SAFETY: tag and text are C strings or null.
    unsafe { sink::emit(prio, tag, text_bytes(text)) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __android_log_buf_write(
    _buf_id: c_int,
    prio: c_int,
    tag: *const c_char,
    text: *const c_char,
) -> c_int {
    // SAFETY: forwarded.
    unsafe { __android_log_write(prio, tag, text) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __android_log_print(
    prio: c_int,
    tag: *const c_char,
    fmt: *const c_char,
    mut args: ...
) -> c_int {
    let _errno = sink::SavedErrno::new();
    // SAFETY: fmt is a C string or null.
    let fmt = unsafe { text_bytes(fmt) };
    // SAFETY: the caller passed arguments matching fmt.
    let message = render(fmt, |class| unsafe { render::next_arg!(args, class) });
    // SAFETY: tag is a C string or null.
    unsafe { sink::emit(prio, tag, message.as_bytes()) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __android_log_buf_print(
    _buf_id: c_int,
    prio: c_int,
    tag: *const c_char,
    fmt: *const c_char,
    mut args: ...
) -> c_int {
    let _errno = sink::SavedErrno::new();
    // SAFETY: as in __android_log_print.
    let fmt = unsafe { text_bytes(fmt) };
    let message = render(fmt, |class| unsafe { render::next_arg!(args, class) });
    unsafe { sink::emit(prio, tag, message.as_bytes()) }
}

/// `va_list` form: the host formats directly into a fixed buffer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __android_log_vprint(
    prio: c_int,
    tag: *const c_char,
    fmt: *const c_char,
    ap: RawVaList,
) -> c_int {
    let _errno = sink::SavedErrno::new();
    if fmt.is_null() {
        // SAFETY: tag is a C string or null.
        return unsafe { sink::emit(prio, tag, b"") };
    }
    let mut buf = [0u8; LOG_BUF_SIZE];
    // SAFETY: buf is writable for its length; fmt and ap come from the caller.
    let n = unsafe { host_vsnprintf(buf.as_mut_ptr().cast(), buf.len(), fmt, ap) };
    let len = usize::try_from(n).map_or(0, |n| n.min(LOG_BUF_SIZE - 1));
    // SAFETY: tag is a C string or null.
    unsafe { sink::emit(prio, tag, &buf[..len]) }
}

#[unsafe(no_mangle)]
pub extern "C" fn __android_log_is_loggable(
    _prio: c_int,
    _tag: *const c_char,
    _default_prio: c_int,
) -> c_int {
    1
}
