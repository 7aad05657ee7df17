//! Stream-object sizes for the `__sF` mirror.
//!
//! glibc's standard streams are `struct _IO_FILE_plus`: the public `FILE`
//! followed by a pointer to the stream's jump table. A copy that stops at
//! `sizeof(FILE)` loses the jump table, so each mirrored slot holds the whole
//! `_IO_FILE_plus`.
//!
//! These values match the `struct _IO_FILE` layout glibc has kept since the
//! libio rewrite. They are host-version constants: re-derive them before
//! targeting another C runtime.
//!
//! Bionic's `FILE` is smaller than glibc's. A source module addressing
//! `&__sF[n]` strides by [`SOURCE_FILE_SIZE`], so only slot 0 lines up with a
//! mirrored host stream; see DESIGN.md for the decision record.

/// Number of mirrored standard streams (stdin, stdout, stderr).
pub const STANDARD_STREAMS: usize = 3;

/// `sizeof(FILE)` on the glibc host.
#[cfg(target_pointer_width = "64")]
pub const HOST_FILE_SIZE: usize = 216;
#[cfg(target_pointer_width = "32")]
pub const HOST_FILE_SIZE: usize = 148;

/// `sizeof(struct _IO_FILE_plus)` on the glibc host: `FILE` plus its vtable pointer.
pub const HOST_STREAM_SIZE: usize = HOST_FILE_SIZE + core::mem::size_of::<usize>();

/// `sizeof(FILE)` in bionic.
#[cfg(target_pointer_width = "64")]
pub const SOURCE_FILE_SIZE: usize = 152;
#[cfg(target_pointer_width = "32")]
pub const SOURCE_FILE_SIZE: usize = 84;

/// Total bytes exported under `__sF`.
pub const MIRROR_BYTES: usize = HOST_STREAM_SIZE * STANDARD_STREAMS;

// A source-side `&__sF[2]` plus one bionic FILE must stay inside the mirror.
const _: () = assert!(HOST_STREAM_SIZE >= SOURCE_FILE_SIZE);
const _: () = assert!(MIRROR_BYTES >= SOURCE_FILE_SIZE * STANDARD_STREAMS);
const _: () = assert!(HOST_STREAM_SIZE % core::mem::align_of::<usize>() == 0);
