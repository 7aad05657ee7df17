//! Raw Linux syscall primitives.
//!
//! Each function issues a single trap instruction. The return value is the
//! raw kernel return: negative values in `[-4095, -1]` are `-errno`.
//!
//! ```text
//!            x86_64        aarch64
//! number     rax           x8
//! arg1..3    rdi rsi rdx   x0 x1 x2
//! return     rax           x0
//! clobbered  rcx r11       -
//! ```

use core::arch::asm;

/// Issue a syscall with no arguments.
///
/// # Safety
///
/// The caller must supply a valid syscall number and accept the kernel's
/// return value semantics.
#[cfg(target_arch = "x86_64")]
#[inline]
pub unsafe fn syscall0(nr: usize) -> usize {
    let ret: usize;
    // SAFETY: single syscall instruction; caller guarantees nr is valid.
    unsafe {
        asm!(
            "syscall",
            inlateout("rax") nr => ret,
            lateout("rcx") _,
            lateout("r11") _,
            options(nostack, preserves_flags),
        );
    }
    ret
}

/// Issue a syscall with three arguments.
///
/// # Safety
///
/// The caller must supply a valid syscall number and arguments; pointer
/// arguments must be valid for the kernel's access.
#[cfg(target_arch = "x86_64")]
#[inline]
pub unsafe fn syscall3(nr: usize, a1: usize, a2: usize, a3: usize) -> usize {
    let ret: usize;
    // SAFETY: single syscall instruction; caller guarantees validity.
    unsafe {
        asm!(
            "syscall",
            inlateout("rax") nr => ret,
            in("rdi") a1,
            in("rsi") a2,
            in("rdx") a3,
            lateout("rcx") _,
            lateout("r11") _,
            options(nostack, preserves_flags),
        );
    }
    ret
}

/// Issue a syscall with no arguments.
///
/// # Safety
///
/// The caller must supply a valid syscall number.
#[cfg(target_arch = "aarch64")]
#[inline]
pub unsafe fn syscall0(nr: usize) -> usize {
    let ret: usize;
    // SAFETY: single svc instruction; caller guarantees nr is valid.
    unsafe {
        asm!(
            "svc 0",
            in("x8") nr,
            lateout("x0") ret,
            options(nostack, preserves_flags),
        );
    }
    ret
}

/// Issue a syscall with three arguments.
///
/// # Safety
///
/// The caller must supply a valid syscall number and arguments.
#[cfg(target_arch = "aarch64")]
#[inline]
pub unsafe fn syscall3(nr: usize, a1: usize, a2: usize, a3: usize) -> usize {
    let ret: usize;
    // SAFETY: single svc instruction; caller guarantees validity.
    unsafe {
        asm!(
            "svc 0",
            in("x8") nr,
            inlateout("x0") a1 => ret,
            in("x1") a2,
            in("x2") a3,
            options(nostack, preserves_flags),
        );
    }
    ret
}
