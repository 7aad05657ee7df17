//! `.dynamic` section entries.

use super::{ElfResult, u64_at};

/// Dynamic tags the tooling reads or rewrites.
pub struct DynTag;

impl DynTag {
    pub const NULL: i64 = 0;
    pub const NEEDED: i64 = 1;
    pub const SONAME: i64 = 14;
    pub const VERSYM: i64 = 0x6fff_fff0;
    pub const VERNEED: i64 = 0x6fff_fffe;
    pub const VERNEEDNUM: i64 = 0x6fff_ffff;
    /// OS-specific tags glibc records but never acts on. `VERNEED` and
    /// `VERNEEDNUM` are retagged to these so the loader finds no version
    /// requirements.
    pub const VERNEED_IGNORED: i64 = 0x6000_000d;
    pub const VERNEEDNUM_IGNORED: i64 = 0x6000_000e;
}

/// One `Elf64_Dyn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elf64Dyn {
    pub d_tag: i64,
    pub d_val: u64,
}

impl Elf64Dyn {
    pub const SIZE: usize = 16;

    pub fn parse(data: &[u8]) -> ElfResult<Self> {
        Ok(Self {
            d_tag: u64_at(data, 0)? as i64,
            d_val: u64_at(data, 8)?,
        })
    }
}

/// Entries of a `.dynamic` section up to (not including) `DT_NULL`.
pub fn parse_dynamic(section: &[u8]) -> ElfResult<Vec<Elf64Dyn>> {
    let mut entries = Vec::new();
    for raw in section.chunks_exact(Elf64Dyn::SIZE) {
        let entry = Elf64Dyn::parse(raw)?;
        if entry.d_tag == DynTag::NULL {
            break;
        }
        entries.push(entry);
    }
    Ok(entries)
}
