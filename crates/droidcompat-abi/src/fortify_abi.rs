//! ABI layer for bionic's `_FORTIFY_SOURCE` entry points.
//!
//! Bionic's headers rewrite `memcpy(d, s, n)` into
//! `__memcpy_chk(d, s, n, __builtin_object_size(d, 0))` and similar. The
//! capacity parameters are accepted and discarded; each call forwards to the
//! unchecked host function. Results, including undefined behavior on a
//! violated bound, are those of the plain call.

#![allow(non_snake_case)]

use std::ffi::{c_char, c_int, c_void};

use libc::{fd_set, off_t, size_t, ssize_t};

use crate::macros::fortified;

/// C `va_list` as it crosses a call boundary.
///
/// x86_64 passes `va_list` as a pointer to its `__va_list_tag`. On aarch64 the
/// 32-byte `va_list` struct is a composite larger than 16 bytes and is passed
/// by reference. Either way the callee receives one pointer, which is handed
/// on to the host unchanged.
pub type RawVaList = *mut c_void;

mod host {
    use super::RawVaList;
    use std::ffi::{c_char, c_int, c_void};

    unsafe extern "C" {
        pub fn stpcpy(dst: *mut c_char, src: *const c_char) -> *mut c_char;
        pub fn stpncpy(dst: *mut c_char, src: *const c_char, n: libc::size_t) -> *mut c_char;
        pub fn memrchr(s: *const c_void, c: c_int, n: libc::size_t) -> *mut c_void;
        pub fn vsnprintf(
            dst: *mut c_char,
            size: libc::size_t,
            fmt: *const c_char,
            ap: RawVaList,
        ) -> c_int;
        pub fn vsprintf(dst: *mut c_char, fmt: *const c_char, ap: RawVaList) -> c_int;
    }
}

fortified! {
    fn __memcpy_chk(dst: *mut c_void, src: *const c_void, n: size_t, _dst_len: size_t)
        -> *mut c_void => { libc::memcpy(dst, src, n) }

    fn __memmove_chk(dst: *mut c_void, src: *const c_void, n: size_t, _dst_len: size_t)
        -> *mut c_void => { libc::memmove(dst, src, n) }

    fn __memset_chk(dst: *mut c_void, c: c_int, n: size_t, _dst_len: size_t)
        -> *mut c_void => { libc::memset(dst, c, n) }

    fn __memchr_chk(s: *const c_void, c: c_int, n: size_t, _buf_len: size_t)
        -> *mut c_void => { libc::memchr(s, c, n) }

    fn __memrchr_chk(s: *const c_void, c: c_int, n: size_t, _buf_len: size_t)
        -> *mut c_void => { host::memrchr(s, c, n) }

    fn __strlen_chk(s: *const c_char, _s_len: size_t) -> size_t => { libc::strlen(s) }

    fn __strchr_chk(s: *const c_char, c: c_int, _s_len: size_t)
        -> *mut c_char => { libc::strchr(s, c) }

    fn __strrchr_chk(s: *const c_char, c: c_int, _s_len: size_t)
        -> *mut c_char => { libc::strrchr(s, c) }

    fn __strcpy_chk(dst: *mut c_char, src: *const c_char, _dst_len: size_t)
        -> *mut c_char => { libc::strcpy(dst, src) }

    fn __stpcpy_chk(dst: *mut c_char, src: *const c_char, _dst_len: size_t)
        -> *mut c_char => { host::stpcpy(dst, src) }

    fn __strncpy_chk(dst: *mut c_char, src: *const c_char, n: size_t, _dst_len: size_t)
        -> *mut c_char => { libc::strncpy(dst, src, n) }

    fn __strncpy_chk2(
        dst: *mut c_char,
        src: *const c_char,
        n: size_t,
        _dst_len: size_t,
        _src_len: size_t,
    ) -> *mut c_char => { libc::strncpy(dst, src, n) }

    fn __stpncpy_chk(dst: *mut c_char, src: *const c_char, n: size_t, _dst_len: size_t)
        -> *mut c_char => { host::stpncpy(dst, src, n) }

    fn __stpncpy_chk2(
        dst: *mut c_char,
        src: *const c_char,
        n: size_t,
        _dst_len: size_t,
        _src_len: size_t,
    ) -> *mut c_char => { host::stpncpy(dst, src, n) }

    fn __strcat_chk(dst: *mut c_char, src: *const c_char, _dst_buf_size: size_t)
        -> *mut c_char => { libc::strcat(dst, src) }

    fn __strncat_chk(dst: *mut c_char, src: *const c_char, n: size_t, _dst_buf_size: size_t)
        -> *mut c_char => { libc::strncat(dst, src, n) }

    fn __vsnprintf_chk(
        dst: *mut c_char,
        size: size_t,
        _flags: c_int,
        _dst_len: size_t,
        fmt: *const c_char,
        ap: RawVaList,
    ) -> c_int => { host::vsnprintf(dst, size, fmt, ap) }

    fn __vsprintf_chk(
        dst: *mut c_char,
        _flags: c_int,
        _dst_len: size_t,
        fmt: *const c_char,
        ap: RawVaList,
    ) -> c_int => { host::vsprintf(dst, fmt, ap) }

    fn __read_chk(fd: c_int, buf: *mut c_void, count: size_t, _buf_size: size_t)
        -> ssize_t => { libc::read(fd, buf, count) }

    fn __write_chk(fd: c_int, buf: *const c_void, count: size_t, _buf_size: size_t)
        -> ssize_t => { libc::write(fd, buf, count) }

    fn __pread_chk(
        fd: c_int,
        buf: *mut c_void,
        count: size_t,
        offset: off_t,
        _buf_size: size_t,
    ) -> ssize_t => { libc::pread(fd, buf, count, offset) }

    /// `open` without `O_CREAT`, so no mode argument follows.
    fn __open_2(path: *const c_char, flags: c_int) -> c_int => { libc::open(path, flags) }

    fn __openat_2(dirfd: c_int, path: *const c_char, flags: c_int)
        -> c_int => { libc::openat(dirfd, path, flags) }

    fn __FD_ISSET_chk(fd: c_int, set: *const fd_set, _set_size: size_t)
        -> c_int => { c_int::from(libc::FD_ISSET(fd, set)) }
}

/// `void __FD_SET_chk(int, fd_set*, size_t)`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __FD_SET_chk(fd: c_int, set: *mut fd_set, _set_size: size_t) {
    // SAFETY: same contract as FD_SET.
    unsafe { libc::FD_SET(fd, set) }
}

/// `void __FD_CLR_chk(int, fd_set*, size_t)`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __FD_CLR_chk(fd: c_int, set: *mut fd_set, _set_size: size_t) {
    // SAFETY: same contract as FD_CLR.
    unsafe { libc::FD_CLR(fd, set) }
}
