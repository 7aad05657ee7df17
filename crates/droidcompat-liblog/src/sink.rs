//! Where framed log lines go: the host's standard-error descriptor.

use std::ffi::{CStr, c_char, c_int};

use droidcompat_core::config::fallback_log_tag;
use droidcompat_core::log::frame_line;

const STDERR_FD: c_int = 2;

/// Restores the caller's `errno` when dropped. Host formatting and a failed
/// write may both clobber it; the caller must not observe either.
pub(crate) struct SavedErrno(c_int);

impl SavedErrno {
    pub(crate) fn new() -> Self {
        // SAFETY: this thread's errno cell is always valid.
        Self(unsafe { *libc::__errno_location() })
    }
}

impl Drop for SavedErrno {
    fn drop(&mut self) {
        // SAFETY: as in `new`.
        unsafe { *libc::__errno_location() = self.0 };
    }
}

/// Resolve a caller tag, substituting the configured fallback for null.
///
/// # Safety
///
/// A non-null `tag` must point to a NUL-terminated string.
pub(crate) unsafe fn resolve_tag<'a>(tag: *const c_char) -> &'a [u8] {
    if tag.is_null() {
        fallback_log_tag().to_bytes()
    } else {
        // SAFETY: caller guarantees a valid NUL-terminated string.
        unsafe { CStr::from_ptr(tag) }.to_bytes()
    }
}

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
fn write_stderr(line: &[u8]) -> Option<usize> {
    droidcompat_core::syscall::sys_write(STDERR_FD, line).ok()
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn write_stderr(line: &[u8]) -> Option<usize> {
    // SAFETY: line is a valid buffer of line.len() bytes.
    let n = unsafe { libc::write(STDERR_FD, line.as_ptr().cast(), line.len()) };
    usize::try_from(n).ok()
}

/// Frame one message and write it to stderr in a single `write`.
///
/// Returns the number of bytes written, or 0 when the write fails.
///
/// # Safety
///
/// A non-null `tag` must point to a NUL-terminated string.
pub(crate) unsafe fn emit(prio: c_int, tag: *const c_char, msg: &[u8]) -> c_int {
    // SAFETY: forwarded from the caller.
    let tag = unsafe { resolve_tag(tag) };
    let line = frame_line(prio, tag, msg);
    write_stderr(&line)
        .and_then(|n| c_int::try_from(n).ok())
        .unwrap_or(0)
}
