//! Integration tests for `android_set_abort_message`.
//!
//! Output checks re-run this test binary as a child with stderr piped.

use std::ffi::CStr;
use std::process::Command;
use std::ptr;

use bionic_compat::abort_abi::{
    ABORT_MESSAGE_MAX, android_set_abort_message, droidcompat_abort_message,
};

const CHILD_ENV: &str = "DROIDCOMPAT_ABORT_CHILD";

fn run_child(test: &str) -> std::process::Output {
    Command::new(std::env::current_exe().unwrap())
        .args(["--exact", test, "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .output()
        .unwrap()
}

#[test]
fn message_reaches_stderr() {
    if std::env::var_os(CHILD_ENV).is_some() {
        // SAFETY: valid C strings and a null, all permitted.
        unsafe {
            android_set_abort_message(c"heap corruption detected".as_ptr());
            android_set_abort_message(ptr::null());
            android_set_abort_message(c"second".as_ptr());
        }
        return;
    }
    let out = run_child("message_reaches_stderr");
    assert!(out.status.success(), "{out:?}");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("[bionic_compat] abort message: heap corruption detected\n[bionic_compat] abort message: second\n"),
        "stderr was: {stderr}"
    );
}

#[test]
fn first_message_is_retained() {
    // SAFETY: valid C strings; the accessor returns a stable pointer or null.
    unsafe {
        android_set_abort_message(c"first failure".as_ptr());
        android_set_abort_message(c"later failure".as_ptr());
        let kept = droidcompat_abort_message();
        assert!(!kept.is_null());
        assert_eq!(CStr::from_ptr(kept), c"first failure");
    }
}

#[test]
fn long_message_is_truncated_in_the_retained_copy() {
    if std::env::var_os(CHILD_ENV).is_some() {
        let mut long = vec![b'x'; ABORT_MESSAGE_MAX * 2];
        long.push(0);
        // SAFETY: long is NUL-terminated; the accessor returns a stable pointer.
        unsafe {
            android_set_abort_message(long.as_ptr().cast());
            let kept = CStr::from_ptr(droidcompat_abort_message());
            assert_eq!(kept.to_bytes().len(), ABORT_MESSAGE_MAX - 1);
            assert!(kept.to_bytes().iter().all(|&b| b == b'x'));
        }
        return;
    }
    let out = run_child("long_message_is_truncated_in_the_retained_copy");
    assert!(out.status.success(), "{out:?}");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains(&"x".repeat(ABORT_MESSAGE_MAX * 2)), "full message goes to stderr");
}
