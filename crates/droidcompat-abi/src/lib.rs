#![feature(linkage)]
// Every export takes raw pointers from C callers with the C contract of the
// symbol it stands in for; per-function safety sections would repeat it.
#![allow(clippy::missing_safety_doc)]
//! # droidcompat-abi
//!
//! `libbionic_compat.so`: definitions for the bionic-only symbols a prebuilt
//! Android module references, built for a glibc host.
//!
//! ```text
//! module (bionic ABI) -> dynamic loader -> this library -> host glibc / kernel
//! ```
//!
//! Each export keeps the exact bionic name, signature, and data layout and
//! delegates to the glibc facility with the same meaning. No export calls
//! another; they are independent symbol providers composed only through the
//! loader's global symbol table.

#[macro_use]
mod macros;

mod util;

pub mod abort_abi;
pub mod ctype_abi;
pub mod errno_abi;
pub mod fortify_abi;
pub mod property_abi;
pub mod stdio_abi;
pub mod unistd_abi;
