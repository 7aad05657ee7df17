//! Tooling that prepares a bionic-linked module for the glibc loader.
//!
//! This crate provides:
//! - Version neutralization: rewrite a module's symbol-version tables so the
//!   host loader stops matching bionic version names
//! - Export checks: confirm a built shim defines every symbol it promises
//! - Coverage: classify a module's undefined symbols by which shim supplies them
//! - Staging: lay out a loader directory with each shim under its soname
//! - Structured JSONL logging of every step

#![forbid(unsafe_code)]

pub mod coverage;
pub mod error;
pub mod exports;
pub mod manifest;
pub mod patch;
pub mod stage;
pub mod structured_log;

pub use error::{HarnessError, HarnessResult};
pub use manifest::ShimLibrary;
