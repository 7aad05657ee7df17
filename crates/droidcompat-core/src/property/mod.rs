//! System property answers.
//!
//! The host has no property service. Every lookup reports "absent" with an
//! empty value and every write is rejected, so the module takes its default
//! path. Nothing is stored: each call is independent of every other.

use std::ffi::CStr;

/// Maximum property value length in the source runtime, NUL included.
pub const PROP_VALUE_MAX: usize = 92;

/// Return code of a rejected `__system_property_set`.
pub const SET_REJECTED: i32 = -1;

/// Value reported for every property.
pub const EMPTY_VALUE: &CStr = c"";

/// Serial reported for every property and for the property area.
pub const SERIAL: u32 = 0;

/// Outcome of a property read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    pub value: &'static CStr,
}

impl Lookup {
    /// Length returned by `__system_property_get`.
    #[must_use]
    pub fn value_len(&self) -> i32 {
        self.value.to_bytes().len() as i32
    }
}

/// Read `name`. The name is never inspected.
#[must_use]
pub fn lookup(_name: &[u8]) -> Lookup {
    Lookup { value: EMPTY_VALUE }
}

/// Write `name = value`. Always rejected; nothing changes.
#[must_use]
pub fn store(_name: &[u8], _value: &[u8]) -> i32 {
    SET_REJECTED
}
