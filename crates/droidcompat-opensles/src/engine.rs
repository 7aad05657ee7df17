//! The engine object and its five-slot dispatch table.

#![allow(non_snake_case)]

use std::ffi::c_void;
use std::ptr;

use droidcompat_core::config::trace_level;
use droidcompat_core::opensl::{
    EngineOp, REPORTED_STATE, SL_RESULT_FEATURE_UNSUPPORTED, SL_RESULT_SUCCESS,
    SUPPORTED_ENGINE_INTERFACES, SlResult, notice, respond,
};

use crate::iid::InterfaceId;

/// `SLboolean`.
pub type SlBoolean = u32;
/// `SLuint32`.
pub type SlUint32 = u32;

/// `SLObjectItf`: a pointer to a pointer to the dispatch table.
pub type ObjectItf = *const *const ObjectVtable;

/// Dispatch table behind every [`ObjectItf`] this library hands out.
#[repr(C)]
pub struct ObjectVtable {
    pub realize: unsafe extern "C" fn(ObjectItf, SlBoolean) -> SlResult,
    pub resume: unsafe extern "C" fn(ObjectItf, SlBoolean) -> SlResult,
    pub get_state: unsafe extern "C" fn(ObjectItf, *mut SlUint32) -> SlResult,
    pub get_interface: unsafe extern "C" fn(ObjectItf, InterfaceId, *mut c_void) -> SlResult,
    pub destroy: unsafe extern "C" fn(ObjectItf),
}

static VTABLE: ObjectVtable = ObjectVtable {
    realize,
    resume,
    get_state,
    get_interface,
    destroy,
};

#[repr(transparent)]
struct EngineObject(*const ObjectVtable);

// SAFETY: holds only the address of an immutable static.
unsafe impl Sync for EngineObject {}

static ENGINE_OBJECT: EngineObject = EngineObject(&VTABLE);

/// The shared engine handle.
#[must_use]
pub fn engine_handle() -> ObjectItf {
    (&raw const ENGINE_OBJECT).cast()
}

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
fn write_stderr(line: &[u8]) {
    let _ = droidcompat_core::syscall::sys_write(2, line);
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn write_stderr(line: &[u8]) {
    // SAFETY: line is a valid buffer of line.len() bytes.
    let _ = unsafe { libc::write(2, line.as_ptr().cast(), line.len()) };
}

/// Announce `op` if tracing is on and return its fixed answer.
fn dispatch(op: EngineOp) -> Option<SlResult> {
    if trace_level().enabled()
        && let Some(line) = notice(op)
    {
        write_stderr(line.as_bytes());
    }
    respond(op)
}

fn unsupported(op: EngineOp) -> SlResult {
    dispatch(op).unwrap_or(SL_RESULT_FEATURE_UNSUPPORTED)
}

unsafe extern "C" fn realize(_self: ObjectItf, _async: SlBoolean) -> SlResult {
    unsupported(EngineOp::Realize)
}

unsafe extern "C" fn resume(_self: ObjectItf, _async: SlBoolean) -> SlResult {
    unsupported(EngineOp::Resume)
}

unsafe extern "C" fn get_state(_self: ObjectItf, p_state: *mut SlUint32) -> SlResult {
    if !p_state.is_null() {
        // SAFETY: caller passes a writable SLuint32.
        unsafe { *p_state = REPORTED_STATE };
    }
    unsupported(EngineOp::GetState)
}

unsafe extern "C" fn get_interface(
    _self: ObjectItf,
    _iid: InterfaceId,
    p_interface: *mut c_void,
) -> SlResult {
    if !p_interface.is_null() {
        // SAFETY: caller passes a writable interface pointer slot.
        unsafe { *p_interface.cast::<*mut c_void>() = ptr::null_mut() };
    }
    unsupported(EngineOp::GetInterface)
}

unsafe extern "C" fn destroy(_self: ObjectItf) {
    dispatch(EngineOp::Destroy);
}

/// Create the engine. Always succeeds; a null `p_engine` is left alone.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slCreateEngine(
    p_engine: *mut ObjectItf,
    _num_options: SlUint32,
    _engine_options: *const c_void,
    _num_interfaces: SlUint32,
    _interface_ids: *const InterfaceId,
    _interface_required: *const SlBoolean,
) -> SlResult {
    let result = dispatch(EngineOp::Create).unwrap_or(SL_RESULT_SUCCESS);
    if !p_engine.is_null() {
        // SAFETY: caller passes a writable SLObjectItf slot.
        unsafe { *p_engine = engine_handle() };
    }
    result
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn slQueryNumSupportedEngineInterfaces(
    p_num_supported: *mut SlUint32,
) -> SlResult {
    if !p_num_supported.is_null() {
        // SAFETY: caller passes a writable SLuint32.
        unsafe { *p_num_supported = SUPPORTED_ENGINE_INTERFACES };
    }
    SL_RESULT_SUCCESS
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn slQuerySupportedEngineInterfaces(
    _index: SlUint32,
    p_interface_id: *mut InterfaceId,
) -> SlResult {
    if !p_interface_id.is_null() {
        // SAFETY: caller passes a writable SLInterfaceID slot.
        unsafe { *p_interface_id = ptr::null() };
    }
    SL_RESULT_FEATURE_UNSUPPORTED
}
