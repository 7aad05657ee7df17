//! A parsed view over a whole ELF64 file.

use super::dynamic::{DynTag, parse_dynamic};
use super::header::Elf64Header;
use super::section::{Elf64SectionHeader, SectionType, parse_section_headers};
use super::symbol::Elf64Symbol;
use super::{ElfError, ElfResult};

/// A dynamic symbol with its resolved name.
#[derive(Debug, Clone)]
pub struct DynamicSymbol {
    pub name: String,
    pub symbol: Elf64Symbol,
}

/// Borrowed ELF64 file with its section table parsed.
#[derive(Debug)]
pub struct ElfImage<'a> {
    data: &'a [u8],
    pub header: Elf64Header,
    pub sections: Vec<Elf64SectionHeader>,
}

/// NUL-terminated string at `index` in a string table.
fn string_at(table: &[u8], index: u32) -> ElfResult<String> {
    let start = index as usize;
    let tail = table
        .get(start..)
        .ok_or(ElfError::InvalidStringIndex(index))?;
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    Ok(String::from_utf8_lossy(&tail[..end]).into_owned())
}

impl<'a> ElfImage<'a> {
    pub fn parse(data: &'a [u8]) -> ElfResult<Self> {
        let header = Elf64Header::parse(data)?;
        let sections =
            parse_section_headers(data, header.e_shoff, header.e_shentsize, header.e_shnum)?;
        Ok(Self {
            data,
            header,
            sections,
        })
    }

    /// Contents of `section`.
    pub fn section_data(&self, section: &Elf64SectionHeader) -> ElfResult<&'a [u8]> {
        Ok(&self.data[section.file_range(self.data.len())?])
    }

    fn section_at(&self, index: u32) -> ElfResult<&Elf64SectionHeader> {
        self.sections
            .get(index as usize)
            .ok_or(ElfError::InvalidSectionIndex(index))
    }

    /// First section of type `kind`.
    #[must_use]
    pub fn find_section(&self, kind: SectionType) -> Option<&Elf64SectionHeader> {
        self.sections.iter().find(|s| s.sh_type == kind)
    }

    /// Every `.dynsym` entry except the null symbol at index 0.
    pub fn dynamic_symbols(&self) -> ElfResult<Vec<DynamicSymbol>> {
        let Some(dynsym) = self.find_section(SectionType::Dynsym) else {
            return Ok(Vec::new());
        };
        let strtab = self.section_data(self.section_at(dynsym.sh_link)?)?;
        self.section_data(dynsym)?
            .chunks_exact(Elf64Symbol::SIZE)
            .skip(1)
            .map(|raw| {
                let symbol = Elf64Symbol::parse(raw)?;
                Ok(DynamicSymbol {
                    name: string_at(strtab, symbol.st_name)?,
                    symbol,
                })
            })
            .collect()
    }

    fn dynamic_strings(&self, tag: i64) -> ElfResult<Vec<String>> {
        let Some(dynamic) = self.find_section(SectionType::Dynamic) else {
            return Ok(Vec::new());
        };
        let strtab = self.section_data(self.section_at(dynamic.sh_link)?)?;
        parse_dynamic(self.section_data(dynamic)?)?
            .into_iter()
            .filter(|e| e.d_tag == tag)
            .map(|e| {
                let index = u32::try_from(e.d_val)
                    .map_err(|_| ElfError::InvalidStringIndex(u32::MAX))?;
                string_at(strtab, index)
            })
            .collect()
    }

    /// `DT_NEEDED` library names in file order.
    pub fn needed(&self) -> ElfResult<Vec<String>> {
        self.dynamic_strings(DynTag::NEEDED)
    }

    /// `DT_SONAME`, if present.
    pub fn soname(&self) -> ElfResult<Option<String>> {
        Ok(self.dynamic_strings(DynTag::SONAME)?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elf::synth::SynthElf;

    #[test]
    fn string_table_lookup() {
        let table = b"\0abc\0de";
        assert_eq!(string_at(table, 1).unwrap(), "abc");
        assert_eq!(string_at(table, 5).unwrap(), "de");
        assert_eq!(string_at(table, 0).unwrap(), "");
        assert_eq!(string_at(table, 99), Err(ElfError::InvalidStringIndex(99)));
    }

    #[test]
    fn reads_symbols_and_dynamic_strings() {
        let bytes = SynthElf::new()
            .soname("libgmesdk.so")
            .needed("liblog.so")
            .needed("libOpenSLES.so")
            .import("__errno", 2)
            .import("slCreateEngine", 3)
            .export("gme_init")
            .build();
        let image = ElfImage::parse(&bytes).unwrap();

        let syms = image.dynamic_symbols().unwrap();
        let names: Vec<_> = syms.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["__errno", "slCreateEngine", "gme_init"]);
        assert!(syms[0].symbol.is_undefined());
        assert!(syms[2].symbol.is_exported());

        assert_eq!(image.needed().unwrap(), ["liblog.so", "libOpenSLES.so"]);
        assert_eq!(image.soname().unwrap().as_deref(), Some("libgmesdk.so"));
    }
}
