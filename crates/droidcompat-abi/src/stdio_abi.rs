//! ABI layer for bionic's `__sF` standard-stream array.
//!
//! Bionic defines `stdin`, `stdout`, `stderr` as `&__sF[0..3]`. The module
//! therefore references `__sF` as data, and the loader copies nothing: the
//! symbol must be a real array of stream objects a host stdio call accepts.
//! Each slot is a byte image of the host's `_IO_FILE_plus`, taken at load
//! time once the host streams are initialized.
//!
//! Under [`StreamSync::Coherent`] the host output streams are flushed and
//! switched to unbuffered first. A mirrored stream then shares the host's
//! descriptor, lock, and jump table but holds no pending bytes of its own,
//! so mirrored and direct writes reach the descriptor in call order.

use std::cell::UnsafeCell;
use std::sync::Once;

use droidcompat_core::config::{StreamSync, stream_sync};
use droidcompat_core::stdio::{HOST_STREAM_SIZE, STANDARD_STREAMS};

unsafe extern "C" {
    static mut stdin: *mut libc::FILE;
    static mut stdout: *mut libc::FILE;
    static mut stderr: *mut libc::FILE;
}

/// One mirrored stream object.
#[repr(C, align(8))]
pub struct StreamSlot([u8; HOST_STREAM_SIZE]);

/// Storage behind `__sF`.
#[repr(transparent)]
pub struct StreamMirror(UnsafeCell<[StreamSlot; STANDARD_STREAMS]>);

// SAFETY: written once by `__init_sF` under `Once`; afterwards the bytes are
// only touched through host stdio calls, which take the stream's own lock.
unsafe impl Sync for StreamMirror {}

impl StreamMirror {
    /// Stream pointer for slot `index` (0 = stdin, 1 = stdout, 2 = stderr).
    #[must_use]
    pub fn stream(&self, index: usize) -> Option<*mut libc::FILE> {
        (index < STANDARD_STREAMS).then(|| {
            // SAFETY: index is in bounds; no reference is formed.
            unsafe { (&raw mut (*self.0.get())[index]).cast::<libc::FILE>() }
        })
    }
}

/// `FILE __sF[3]`
#[allow(non_upper_case_globals)]
#[unsafe(no_mangle)]
pub static __sF: StreamMirror = StreamMirror(UnsafeCell::new(
    [const { StreamSlot([0; HOST_STREAM_SIZE]) }; STANDARD_STREAMS],
));

static INIT: Once = Once::new();

/// Copy one host stream into its slot.
///
/// # Safety
///
/// `host` must be a live host stream; must only run inside `INIT`.
unsafe fn mirror(index: usize, host: *mut libc::FILE, sync: StreamSync, output: bool) {
    if host.is_null() {
        return;
    }
    if output && sync == StreamSync::Coherent {
        // SAFETY: host is a live stream.
        unsafe {
            libc::fflush(host);
            libc::setvbuf(host, std::ptr::null_mut(), libc::_IONBF, 0);
        }
    }
    if let Some(slot) = __sF.stream(index) {
        // SAFETY: the host object is an `_IO_FILE_plus` of HOST_STREAM_SIZE
        // bytes and the slot is exactly that large.
        unsafe {
            std::ptr::copy_nonoverlapping(host.cast::<u8>(), slot.cast::<u8>(), HOST_STREAM_SIZE);
        }
    }
}

/// Populate `__sF`. Runs from `.init_array` at load time; later calls,
/// including explicit ones from an embedding application, do nothing.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __init_sF() {
    INIT.call_once(|| {
        let sync = stream_sync();
        // SAFETY: the host's standard streams are initialized before any
        // shared-object constructor runs.
        unsafe {
            mirror(0, stdin, sync, false);
            mirror(1, stdout, sync, true);
            mirror(2, stderr, sync, true);
        }
    });
}

extern "C" fn run_init_sf() {
    // SAFETY: loader constructor context; the host's stdio is ready.
    unsafe { __init_sF() }
}

#[used]
#[unsafe(link_section = ".init_array")]
static INIT_SF_CTOR: extern "C" fn() = run_init_sf;
