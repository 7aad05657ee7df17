//! # droidcompat-core
//!
//! Safe Rust building blocks shared by the droidcompat shim libraries.
//!
//! The shims let a prebuilt Android (bionic-linked) module run on a glibc host.
//! Everything that can be expressed without touching foreign memory lives here:
//! the bionic character-classification table, printf directive parsing for the
//! log bridge, log-line framing, OpenSL ES result codes, stream layout
//! constants, environment configuration, and the ELF inspection used by the
//! loader-preparation tooling.
//!
//! No `unsafe` code is permitted at the crate level. The raw system-call module
//! is the single exception.

#![deny(unsafe_code)]

pub mod config;
pub mod ctype;
pub mod elf;
pub mod log;
pub mod opensl;
pub mod property;
pub mod stdio;
#[allow(unsafe_code)]
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
pub mod syscall;
