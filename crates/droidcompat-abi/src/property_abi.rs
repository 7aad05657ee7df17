//! ABI layer for bionic's `__system_property_*` family.
//!
//! There is no property service on the host. Every property is absent with
//! an empty value; writes are rejected. Output buffers are written only when
//! non-null, and callbacks only invoked when non-null.

use std::ffi::{c_char, c_int, c_uint, c_void};

use droidcompat_core::property::{EMPTY_VALUE, SERIAL, lookup, store};

use crate::util::{c_str_bytes, write_empty};

/// Opaque `prop_info`. Never instantiated: every handle handed out is null.
#[repr(C)]
pub struct PropInfo {
    _private: [u8; 0],
}

pub type ReadCallback =
    Option<unsafe extern "C" fn(cookie: *mut c_void, name: *const c_char, value: *const c_char, serial: u32)>;

pub type ForeachCallback = Option<unsafe extern "C" fn(pi: *const PropInfo, cookie: *mut c_void)>;

/// `int __system_property_get(const char* name, char* value)`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __system_property_get(name: *const c_char, value: *mut c_char) -> c_int {
    // SAFETY: a non-null name is a C string.
    let answer = lookup(unsafe { c_str_bytes(name) }.unwrap_or_default());
    // SAFETY: a non-null value is PROP_VALUE_MAX bytes per the bionic contract.
    unsafe { write_empty(value) };
    answer.value_len()
}

/// `const prop_info* __system_property_find(const char* name)`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __system_property_find(_name: *const c_char) -> *const PropInfo {
    std::ptr::null()
}

/// `const prop_info* __system_property_find_nth(unsigned n)`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __system_property_find_nth(_n: c_uint) -> *const PropInfo {
    std::ptr::null()
}

/// `int __system_property_set(const char* key, const char* value)`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __system_property_set(key: *const c_char, value: *const c_char) -> c_int {
    // SAFETY: non-null arguments are C strings.
    let (key, value) = unsafe { (c_str_bytes(key), c_str_bytes(value)) };
    store(key.unwrap_or_default(), value.unwrap_or_default())
}

/// `int __system_property_read(const prop_info* pi, char* name, char* value)`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __system_property_read(
    _pi: *const PropInfo,
    name: *mut c_char,
    value: *mut c_char,
) -> c_int {
    // SAFETY: non-null buffers are writable per the bionic contract.
    unsafe {
        write_empty(name);
        write_empty(value);
    }
    0
}

/// `void __system_property_read_callback(const prop_info*, callback, void* cookie)`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __system_property_read_callback(
    _pi: *const PropInfo,
    callback: ReadCallback,
    cookie: *mut c_void,
) {
    if let Some(callback) = callback {
        // SAFETY: the caller supplied the callback for exactly this call shape.
        unsafe { callback(cookie, EMPTY_VALUE.as_ptr(), EMPTY_VALUE.as_ptr(), SERIAL) };
    }
}

/// `int __system_property_foreach(callback, void* cookie)`: visits nothing.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __system_property_foreach(
    _callback: ForeachCallback,
    _cookie: *mut c_void,
) -> c_int {
    0
}

/// `uint32_t __system_property_serial(const prop_info* pi)`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __system_property_serial(_pi: *const PropInfo) -> u32 {
    SERIAL
}

/// `uint32_t __system_property_area_serial(void)`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __system_property_area_serial() -> u32 {
    SERIAL
}
