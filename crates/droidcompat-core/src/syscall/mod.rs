//! Minimal raw syscall veneer.
//!
//! The shims need the kernel directly in two places: `gettid`, which older
//! glibc releases do not export at all, and the abort-message path, which
//! must not take any stdio lock. Everything else delegates to the host libc.

mod raw;

pub use raw::{syscall0, syscall3};

#[cfg(target_arch = "x86_64")]
pub const SYS_WRITE: usize = 1;
#[cfg(target_arch = "x86_64")]
pub const SYS_GETTID: usize = 186;

#[cfg(target_arch = "aarch64")]
pub const SYS_WRITE: usize = 64;
#[cfg(target_arch = "aarch64")]
pub const SYS_GETTID: usize = 178;

/// Decode a raw kernel return into `Ok(value)` or `Err(errno)`.
#[inline]
#[must_use]
pub fn decode(ret: usize) -> Result<usize, i32> {
    let signed = ret as isize;
    if (-4095..0).contains(&signed) {
        Err((-signed) as i32)
    } else {
        Ok(ret)
    }
}

/// `gettid()`: kernel thread id of the caller.
#[inline]
#[must_use]
pub fn sys_gettid() -> i32 {
    // SAFETY: gettid has no preconditions and cannot fail.
    let ret = unsafe { raw::syscall0(SYS_GETTID) };
    ret as i32
}

/// `write(fd, buf)`, one attempt, no retry on `EINTR` or short write.
#[inline]
pub fn sys_write(fd: i32, buf: &[u8]) -> Result<usize, i32> {
    // SAFETY: buf is a live slice for the duration of the call.
    let ret = unsafe { raw::syscall3(SYS_WRITE, fd as usize, buf.as_ptr() as usize, buf.len()) };
    decode(ret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gettid_is_positive_and_stable() {
        let a = sys_gettid();
        let b = sys_gettid();
        assert!(a > 0);
        assert_eq!(a, b);
    }

    #[test]
    fn gettid_differs_across_threads() {
        let here = sys_gettid();
        let there = std::thread::spawn(sys_gettid).join().unwrap();
        assert_ne!(here, there);
    }

    #[test]
    fn write_to_bad_fd_reports_ebadf() {
        // EBADF is 9 on both supported architectures.
        assert_eq!(sys_write(-1, b"x"), Err(9));
    }

    #[test]
    fn empty_write_succeeds() {
        assert_eq!(sys_write(2, b""), Ok(0));
    }

    #[test]
    fn decode_boundaries() {
        assert_eq!(decode(0), Ok(0));
        assert_eq!(decode((-1isize) as usize), Err(1));
        assert_eq!(decode((-4095isize) as usize), Err(4095));
        assert!(decode((-4096isize) as usize).is_ok());
    }
}
