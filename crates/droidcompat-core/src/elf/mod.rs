//! ELF64 inspection and patching for loader preparation.
//!
//! A bionic-linked module carries symbol-version requirements (`LIBC`,
//! `LIBC_N`, ...) that glibc's loader cannot satisfy. The tooling reads the
//! module's dynamic symbol table to check what the shims must provide, and
//! rewrites its version data in place so glibc resolves by name alone.
//!
//! Little-endian ELF64 only: the modules in question are x86_64 or aarch64
//! Android shared objects.

pub mod dynamic;
pub mod header;
pub mod image;
pub mod section;
pub mod symbol;
#[cfg(any(test, feature = "test-support"))]
pub mod synth;
pub mod version;

pub use dynamic::{DynTag, Elf64Dyn};
pub use header::{Elf64Header, ElfMachine, ElfType};
pub use image::{DynamicSymbol, ElfImage};
pub use section::{Elf64SectionHeader, SectionType};
pub use symbol::{Elf64Symbol, SymbolBinding};
pub use version::{VersionPatchReport, neutralize_versions};

/// ELF magic bytes: "\x7fELF"
pub const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// Size of the ELF identification array.
pub const EI_NIDENT: usize = 16;

/// Error type for ELF inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElfError {
    /// Invalid ELF magic bytes
    InvalidMagic,
    /// Not ELF64
    UnsupportedClass(u8),
    /// Not little-endian
    UnsupportedEncoding(u8),
    /// A table or section lies outside the file
    InvalidOffset { kind: &'static str, offset: u64 },
    /// Buffer too small for the requested read
    BufferTooSmall { needed: usize, available: usize },
    /// String table index past the end of the table
    InvalidStringIndex(u32),
    /// Section header index out of range
    InvalidSectionIndex(u32),
}

impl core::fmt::Display for ElfError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidMagic => write!(f, "invalid ELF magic"),
            Self::UnsupportedClass(c) => write!(f, "unsupported ELF class: {c}"),
            Self::UnsupportedEncoding(e) => write!(f, "unsupported data encoding: {e}"),
            Self::InvalidOffset { kind, offset } => {
                write!(f, "invalid {kind} offset: {offset:#x}")
            }
            Self::BufferTooSmall { needed, available } => {
                write!(f, "buffer too small: need {needed}, have {available}")
            }
            Self::InvalidStringIndex(idx) => write!(f, "invalid string index: {idx}"),
            Self::InvalidSectionIndex(idx) => write!(f, "invalid section index: {idx}"),
        }
    }
}

impl std::error::Error for ElfError {}

/// Result type for ELF operations.
pub type ElfResult<T> = Result<T, ElfError>;

/// Read `N` bytes at `offset`.
pub(crate) fn bytes_at<const N: usize>(data: &[u8], offset: usize) -> ElfResult<[u8; N]> {
    let end = offset.checked_add(N).ok_or(ElfError::InvalidOffset {
        kind: "field",
        offset: offset as u64,
    })?;
    data.get(offset..end)
        .and_then(|s| s.try_into().ok())
        .ok_or(ElfError::BufferTooSmall {
            needed: end,
            available: data.len(),
        })
}

pub(crate) fn u16_at(data: &[u8], offset: usize) -> ElfResult<u16> {
    bytes_at::<2>(data, offset).map(u16::from_le_bytes)
}

pub(crate) fn u32_at(data: &[u8], offset: usize) -> ElfResult<u32> {
    bytes_at::<4>(data, offset).map(u32::from_le_bytes)
}

pub(crate) fn u64_at(data: &[u8], offset: usize) -> ElfResult<u64> {
    bytes_at::<8>(data, offset).map(u64::from_le_bytes)
}

/// Byte range `offset..offset + size`, checked against `len`.
pub(crate) fn checked_range(
    kind: &'static str,
    offset: u64,
    size: u64,
    len: usize,
) -> ElfResult<core::ops::Range<usize>> {
    let start = usize::try_from(offset).map_err(|_| ElfError::InvalidOffset { kind, offset })?;
    let size = usize::try_from(size).map_err(|_| ElfError::InvalidOffset { kind, offset })?;
    let end = start
        .checked_add(size)
        .ok_or(ElfError::InvalidOffset { kind, offset })?;
    if end > len {
        return Err(ElfError::BufferTooSmall {
            needed: end,
            available: len,
        });
    }
    Ok(start..end)
}
