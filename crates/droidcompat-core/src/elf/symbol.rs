//! ELF64 symbol table entries.

use super::{ElfError, ElfResult, u16_at, u32_at, u64_at};

/// Symbol binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolBinding {
    Local,
    Global,
    Weak,
    Other(u8),
}

impl From<u8> for SymbolBinding {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Local,
            1 => Self::Global,
            2 => Self::Weak,
            other => Self::Other(other),
        }
    }
}

/// `SHN_UNDEF`
pub const SHN_UNDEF: u16 = 0;

/// ELF64 symbol table entry.
#[derive(Debug, Clone, Copy)]
pub struct Elf64Symbol {
    pub st_name: u32,
    pub st_info: u8,
    pub st_other: u8,
    pub st_shndx: u16,
    pub st_value: u64,
    pub st_size: u64,
}

impl Elf64Symbol {
    /// Size of an ELF64 symbol entry in bytes.
    pub const SIZE: usize = 24;

    pub fn parse(data: &[u8]) -> ElfResult<Self> {
        if data.len() < Self::SIZE {
            return Err(ElfError::BufferTooSmall {
                needed: Self::SIZE,
                available: data.len(),
            });
        }
        Ok(Self {
            st_name: u32_at(data, 0)?,
            st_info: data[4],
            st_other: data[5],
            st_shndx: u16_at(data, 6)?,
            st_value: u64_at(data, 8)?,
            st_size: u64_at(data, 16)?,
        })
    }

    #[must_use]
    pub fn binding(&self) -> SymbolBinding {
        SymbolBinding::from(self.st_info >> 4)
    }

    /// Referenced here, defined elsewhere.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.st_shndx == SHN_UNDEF
    }

    /// Visible to the dynamic linker as a definition this object exports.
    #[must_use]
    pub fn is_exported(&self) -> bool {
        !self.is_undefined()
            && matches!(self.binding(), SymbolBinding::Global | SymbolBinding::Weak)
            && self.st_other & 0x3 == 0
    }
}
