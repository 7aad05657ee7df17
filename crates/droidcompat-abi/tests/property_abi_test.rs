//! Integration tests for the system-property stubs.

use std::ffi::{CStr, c_char, c_void};
use std::ptr;

use bionic_compat::property_abi::*;
use droidcompat_core::property::{PROP_VALUE_MAX, SET_REJECTED};

fn get(name: &CStr) -> (i32, Vec<u8>) {
    let mut value = [b'#' as c_char; PROP_VALUE_MAX];
    // SAFETY: value holds PROP_VALUE_MAX bytes.
    let len = unsafe { __system_property_get(name.as_ptr(), value.as_mut_ptr()) };
    // SAFETY: the stub always terminates the buffer.
    let bytes = unsafe { CStr::from_ptr(value.as_ptr()) }.to_bytes().to_vec();
    (len, bytes)
}

#[test]
fn get_is_empty_every_time() {
    for _ in 0..3 {
        for name in [c"ro.product.model", c"ro.build.version.sdk", c""] {
            assert_eq!(get(name), (0, Vec::new()));
        }
    }
}

#[test]
fn get_tolerates_null_buffers() {
    // SAFETY: null pointers are explicitly allowed.
    unsafe {
        assert_eq!(__system_property_get(ptr::null(), ptr::null_mut()), 0);
        assert_eq!(__system_property_get(c"x".as_ptr(), ptr::null_mut()), 0);
    }
}

#[test]
fn find_is_absent() {
    // SAFETY: arguments are valid or null.
    unsafe {
        assert!(__system_property_find(c"ro.hardware".as_ptr()).is_null());
        assert!(__system_property_find(ptr::null()).is_null());
        assert!(__system_property_find_nth(0).is_null());
        assert!(__system_property_find_nth(99).is_null());
    }
}

#[test]
fn set_is_rejected_and_invisible() {
    // SAFETY: arguments are C strings or null.
    unsafe {
        assert_eq!(__system_property_set(c"debug.gme.trace".as_ptr(), c"1".as_ptr()), SET_REJECTED);
        assert_eq!(__system_property_set(ptr::null(), ptr::null()), SET_REJECTED);
    }
    assert_eq!(get(c"debug.gme.trace"), (0, Vec::new()));
}

#[test]
fn read_writes_empty_name_and_value() {
    let mut name = [b'n' as c_char; 32];
    let mut value = [b'v' as c_char; PROP_VALUE_MAX];
    // SAFETY: both buffers are writable.
    unsafe {
        assert_eq!(
            __system_property_read(ptr::null(), name.as_mut_ptr(), value.as_mut_ptr()),
            0
        );
        assert_eq!(__system_property_read(ptr::null(), ptr::null_mut(), ptr::null_mut()), 0);
    }
    assert_eq!(name[0], 0);
    assert_eq!(value[0], 0);
}

#[derive(Default)]
struct Seen {
    calls: u32,
    name: Vec<u8>,
    value: Vec<u8>,
    serial: u32,
}

unsafe extern "C" fn record(cookie: *mut c_void, name: *const c_char, value: *const c_char, serial: u32) {
    // SAFETY: cookie is the &mut Seen passed below; strings come from the stub.
    unsafe {
        let seen = &mut *cookie.cast::<Seen>();
        seen.calls += 1;
        seen.name = CStr::from_ptr(name).to_bytes().to_vec();
        seen.value = CStr::from_ptr(value).to_bytes().to_vec();
        seen.serial = serial;
    }
}

#[test]
fn read_callback_reports_empty_once() {
    let mut seen = Seen {
        serial: 77,
        ..Seen::default()
    };
    // SAFETY: record matches the callback shape; cookie outlives the call.
    unsafe {
        __system_property_read_callback(ptr::null(), Some(record), (&raw mut seen).cast());
        __system_property_read_callback(ptr::null(), None, ptr::null_mut());
    }
    assert_eq!(seen.calls, 1);
    assert!(seen.name.is_empty());
    assert!(seen.value.is_empty());
    assert_eq!(seen.serial, 0);
}

unsafe extern "C" fn count(_pi: *const PropInfo, cookie: *mut c_void) {
    // SAFETY: cookie is the counter passed below.
    unsafe { *cookie.cast::<u32>() += 1 };
}

#[test]
fn foreach_visits_nothing_and_serials_are_zero() {
    let mut visits = 0u32;
    // SAFETY: count matches the callback shape; cookie outlives the call.
    unsafe {
        assert_eq!(__system_property_foreach(Some(count), (&raw mut visits).cast()), 0);
        assert_eq!(__system_property_serial(ptr::null()), 0);
        assert_eq!(__system_property_area_serial(), 0);
    }
    assert_eq!(visits, 0);
}
