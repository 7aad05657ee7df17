//! OpenSL ES for a host without an audio stack.
//!
//! `slCreateEngine` succeeds and hands out one shared static engine object.
//! Every operation on that object reports `SL_RESULT_FEATURE_UNSUPPORTED`,
//! which is the module's cue to carry on without audio output.

#![allow(clippy::missing_safety_doc)]

pub mod engine;
pub mod iid;

pub use engine::{
    ObjectItf, ObjectVtable, SlBoolean, SlUint32, engine_handle, slCreateEngine,
    slQueryNumSupportedEngineInterfaces, slQuerySupportedEngineInterfaces,
};
pub use iid::{InterfaceId, InterfaceIdData, InterfaceIdRef};
