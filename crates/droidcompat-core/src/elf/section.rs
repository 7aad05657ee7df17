//! ELF64 section headers.

use super::{ElfError, ElfResult, checked_range, u32_at, u64_at};

/// Section types the tooling cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionType {
    Null,
    Progbits,
    Symtab,
    Strtab,
    Dynamic,
    Nobits,
    Dynsym,
    /// `.gnu.version_d`
    GnuVerdef,
    /// `.gnu.version_r`
    GnuVerneed,
    /// `.gnu.version`
    GnuVersym,
    Other(u32),
}

impl From<u32> for SectionType {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Null,
            1 => Self::Progbits,
            2 => Self::Symtab,
            3 => Self::Strtab,
            6 => Self::Dynamic,
            8 => Self::Nobits,
            11 => Self::Dynsym,
            0x6fff_fffd => Self::GnuVerdef,
            0x6fff_fffe => Self::GnuVerneed,
            0x6fff_ffff => Self::GnuVersym,
            other => Self::Other(other),
        }
    }
}

impl SectionType {
    #[must_use]
    pub fn to_u32(self) -> u32 {
        match self {
            Self::Null => 0,
            Self::Progbits => 1,
            Self::Symtab => 2,
            Self::Strtab => 3,
            Self::Dynamic => 6,
            Self::Nobits => 8,
            Self::Dynsym => 11,
            Self::GnuVerdef => 0x6fff_fffd,
            Self::GnuVerneed => 0x6fff_fffe,
            Self::GnuVersym => 0x6fff_ffff,
            Self::Other(v) => v,
        }
    }
}

/// ELF64 section header.
#[derive(Debug, Clone, Copy)]
pub struct Elf64SectionHeader {
    /// Name (index into the section-name string table)
    pub sh_name: u32,
    pub sh_type: SectionType,
    /// File offset
    pub sh_offset: u64,
    pub sh_size: u64,
    /// Linked section (string table for symbol and dynamic sections)
    pub sh_link: u32,
    /// Entry size if the section holds a table
    pub sh_entsize: u64,
}

impl Elf64SectionHeader {
    /// Size of an ELF64 section header in bytes.
    pub const SIZE: usize = 64;

    /// Parse a section header at the start of `data`.
    pub fn parse(data: &[u8]) -> ElfResult<Self> {
        if data.len() < Self::SIZE {
            return Err(ElfError::BufferTooSmall {
                needed: Self::SIZE,
                available: data.len(),
            });
        }
        Ok(Self {
            sh_name: u32_at(data, 0)?,
            sh_type: SectionType::from(u32_at(data, 4)?),
            sh_offset: u64_at(data, 24)?,
            sh_size: u64_at(data, 32)?,
            sh_link: u32_at(data, 40)?,
            sh_entsize: u64_at(data, 56)?,
        })
    }

    /// File byte range of the section contents. `SHT_NOBITS` occupies none.
    pub fn file_range(&self, file_len: usize) -> ElfResult<core::ops::Range<usize>> {
        let size = if self.sh_type == SectionType::Nobits {
            0
        } else {
            self.sh_size
        };
        checked_range("section", self.sh_offset, size, file_len)
    }
}

/// Parse the section header table.
pub fn parse_section_headers(
    data: &[u8],
    shoff: u64,
    shentsize: u16,
    shnum: u16,
) -> ElfResult<Vec<Elf64SectionHeader>> {
    let entsize = usize::from(shentsize);
    if shnum > 0 && entsize < Elf64SectionHeader::SIZE {
        return Err(ElfError::InvalidOffset {
            kind: "section header entry size",
            offset: u64::from(shentsize),
        });
    }
    let table = checked_range(
        "section header table",
        shoff,
        (entsize as u64).saturating_mul(u64::from(shnum)),
        data.len(),
    )?;

    data[table]
        .chunks_exact(entsize.max(1))
        .take(usize::from(shnum))
        .map(Elf64SectionHeader::parse)
        .collect()
}
