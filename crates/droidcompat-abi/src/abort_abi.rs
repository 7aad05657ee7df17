//! ABI layer for `android_set_abort_message`.
//!
//! The module calls this right before `abort()`. The message is written to
//! stderr with a single `writev`, no stdio lock, no allocation. The first
//! message is also retained, as bionic does, for [`droidcompat_abort_message`].
//! It is copied into a fixed static buffer under a try-lock, so a racing or
//! reentrant caller skips retention rather than waiting, and a corrupted heap
//! is never touched.

use std::ffi::{c_char, c_void};

use parking_lot::Mutex;

use crate::util::c_str_bytes;

const PREFIX: &[u8] = b"[bionic_compat] abort message: ";

/// Capacity of the retained copy, terminating NUL included.
pub const ABORT_MESSAGE_MAX: usize = 1024;

struct Retained {
    bytes: [u8; ABORT_MESSAGE_MAX],
    set: bool,
}

static RETAINED: Mutex<Retained> = Mutex::new(Retained {
    bytes: [0; ABORT_MESSAGE_MAX],
    set: false,
});

fn iov(bytes: &[u8]) -> libc::iovec {
    libc::iovec {
        iov_base: bytes.as_ptr() as *mut c_void,
        iov_len: bytes.len(),
    }
}

fn retain(message: &[u8]) {
    let Some(mut slot) = RETAINED.try_lock() else {
        return;
    };
    if slot.set {
        return;
    }
    let len = message.len().min(ABORT_MESSAGE_MAX - 1);
    slot.bytes[..len].copy_from_slice(&message[..len]);
    slot.bytes[len] = 0;
    slot.set = true;
}

/// `void android_set_abort_message(const char* msg)`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn android_set_abort_message(msg: *const c_char) {
    // SAFETY: a non-null msg is a C string per the bionic contract.
    let Some(message) = (unsafe { c_str_bytes(msg) }) else {
        return;
    };
    let parts = [iov(PREFIX), iov(message), iov(b"\n")];
    // SAFETY: every iovec points into a live slice. The result is ignored:
    // nothing useful can be done about a failed diagnostic write here.
    let _ = unsafe { libc::writev(libc::STDERR_FILENO, parts.as_ptr(), parts.len() as i32) };
    retain(message);
}

/// The first message passed to `android_set_abort_message`, or null.
///
/// The pointer stays valid for the life of the process. The copy holds at most
/// `ABORT_MESSAGE_MAX - 1` bytes of the message.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn droidcompat_abort_message() -> *const c_char {
    match RETAINED.try_lock() {
        Some(slot) if slot.set => slot.bytes.as_ptr().cast(),
        _ => std::ptr::null(),
    }
}
