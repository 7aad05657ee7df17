//! Symbol-version neutralization.
//!
//! glibc's loader rejects a module whose version requirements name bionic
//! version nodes. Two in-place rewrites remove them without changing the
//! file's size or layout:
//!
//! 1. every `.gnu.version` entry above `VER_NDX_GLOBAL` becomes
//!    `VER_NDX_GLOBAL`, so each symbol binds by name alone;
//! 2. the `DT_VERNEED`/`DT_VERNEEDNUM` tags in `.dynamic` are retagged to
//!    OS-specific values the loader ignores. The loader keys on the presence
//!    of `DT_VERNEED`, so zeroing its value is not enough.
//!
//! Applying the patch twice is a no-op the second time.

use super::dynamic::{DynTag, Elf64Dyn};
use super::header::Elf64Header;
use super::section::{SectionType, parse_section_headers};
use super::{ElfResult, u16_at, u64_at};

/// `VER_NDX_LOCAL`
pub const VER_NDX_LOCAL: u16 = 0;
/// `VER_NDX_GLOBAL`
pub const VER_NDX_GLOBAL: u16 = 1;

/// What [`neutralize_versions`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionPatchReport {
    /// Entries in `.gnu.version`.
    pub versym_entries: usize,
    /// Entries rewritten to `VER_NDX_GLOBAL`.
    pub versym_rewritten: usize,
    pub verneed_retagged: bool,
    pub verneednum_retagged: bool,
}

impl VersionPatchReport {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.versym_rewritten > 0 || self.verneed_retagged || self.verneednum_retagged
    }
}

/// Rewrite the version data of the ELF64 image in `data`.
///
/// # Errors
///
/// Fails without modifying anything when the header or section table is
/// malformed. Section contents are only written after every range is checked.
pub fn neutralize_versions(data: &mut [u8]) -> ElfResult<VersionPatchReport> {
    let header = Elf64Header::parse(data)?;
    let sections =
        parse_section_headers(data, header.e_shoff, header.e_shentsize, header.e_shnum)?;

    let mut versym_ranges = Vec::new();
    let mut dynamic_ranges = Vec::new();
    for section in &sections {
        match section.sh_type {
            SectionType::GnuVersym => versym_ranges.push(section.file_range(data.len())?),
            SectionType::Dynamic => dynamic_ranges.push(section.file_range(data.len())?),
            _ => {}
        }
    }

    let mut report = VersionPatchReport::default();

    for range in versym_ranges {
        let table = &mut data[range];
        let entries = table.len() / 2;
        report.versym_entries += entries;
        for i in 0..entries {
            let at = i * 2;
            if u16_at(table, at)? > VER_NDX_GLOBAL {
                table[at..at + 2].copy_from_slice(&VER_NDX_GLOBAL.to_le_bytes());
                report.versym_rewritten += 1;
            }
        }
    }

    for range in dynamic_ranges {
        let table = &mut data[range];
        for i in 0..table.len() / Elf64Dyn::SIZE {
            let at = i * Elf64Dyn::SIZE;
            let retag = match u64_at(table, at)? as i64 {
                DynTag::NULL => break,
                DynTag::VERNEED => {
                    report.verneed_retagged = true;
                    DynTag::VERNEED_IGNORED
                }
                DynTag::VERNEEDNUM => {
                    report.verneednum_retagged = true;
                    DynTag::VERNEEDNUM_IGNORED
                }
                _ => continue,
            };
            table[at..at + 8].copy_from_slice(&retag.to_le_bytes());
        }
    }

    Ok(report)
}
