//! ABI layer for `gettid`.
//!
//! glibc only exports `gettid` since 2.30. The definition is weak so a host
//! that provides it keeps its own when linked statically; for dynamic
//! lookup, load order decides.

/// `pid_t gettid(void)`
#[unsafe(no_mangle)]
#[linkage = "weak"]
pub unsafe extern "C" fn gettid() -> libc::pid_t {
    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
    {
        droidcompat_core::syscall::sys_gettid()
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        // SAFETY: SYS_gettid takes no arguments and cannot fail.
        unsafe { libc::syscall(libc::SYS_gettid) as libc::pid_t }
    }
}
