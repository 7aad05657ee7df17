//! Integration tests for the weak `gettid`.

use bionic_compat::unistd_abi::gettid;

fn kernel_tid() -> libc::pid_t {
    // SAFETY: SYS_gettid takes no arguments.
    unsafe { libc::syscall(libc::SYS_gettid) as libc::pid_t }
}

#[test]
fn matches_kernel_thread_id() {
    // SAFETY: no preconditions.
    assert_eq!(unsafe { gettid() }, kernel_tid());
}

#[test]
fn worker_thread_has_its_own_id() {
    let worker = std::thread::spawn(|| {
        // SAFETY: no preconditions.
        (unsafe { gettid() }, kernel_tid())
    })
    .join()
    .unwrap();
    assert_eq!(worker.0, worker.1);
    // SAFETY: no preconditions.
    assert_ne!(worker.0, unsafe { libc::getpid() });
}
