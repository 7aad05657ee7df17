//! In-memory ELF64 shared-object builder for tests.
//!
//! Produces the minimal section set the tooling reads: `.dynstr`, `.dynsym`,
//! `.gnu.version`, `.dynamic`, `.shstrtab`. No program headers, no code.

use super::dynamic::DynTag;
use super::section::SectionType;
use super::ELF_MAGIC;

#[derive(Debug, Clone)]
struct SynthSymbol {
    name: String,
    version: u16,
    defined: bool,
}

/// Builder for a synthetic little-endian ELF64 `ET_DYN` image.
#[derive(Debug, Clone, Default)]
pub struct SynthElf {
    symbols: Vec<SynthSymbol>,
    needed: Vec<String>,
    soname: Option<String>,
    verneed: bool,
}

struct Strtab(Vec<u8>);

impl Strtab {
    fn new() -> Self {
        Self(vec![0])
    }

    fn add(&mut self, s: &str) -> u32 {
        let at = self.0.len() as u32;
        self.0.extend_from_slice(s.as_bytes());
        self.0.push(0);
        at
    }
}

struct Section {
    name: u32,
    kind: SectionType,
    link: u32,
    entsize: u64,
    bytes: Vec<u8>,
}

impl SynthElf {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Undefined function reference carrying version index `version`.
    #[must_use]
    pub fn import(mut self, name: &str, version: u16) -> Self {
        self.symbols.push(SynthSymbol {
            name: name.to_owned(),
            version,
            defined: false,
        });
        self
    }

    /// Defined, unversioned global function.
    #[must_use]
    pub fn export(mut self, name: &str) -> Self {
        self.symbols.push(SynthSymbol {
            name: name.to_owned(),
            version: 1,
            defined: true,
        });
        self
    }

    #[must_use]
    pub fn needed(mut self, lib: &str) -> Self {
        self.needed.push(lib.to_owned());
        self
    }

    #[must_use]
    pub fn soname(mut self, name: &str) -> Self {
        self.soname = Some(name.to_owned());
        self
    }

    /// Add `DT_VERNEED`/`DT_VERNEEDNUM` entries.
    #[must_use]
    pub fn with_verneed(mut self) -> Self {
        self.verneed = true;
        self
    }

    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let mut dynstr = Strtab::new();

        let mut dynsym = vec![0u8; 24];
        let mut versym = 0u16.to_le_bytes().to_vec();
        for sym in &self.symbols {
            let name = dynstr.add(&sym.name);
            let mut entry = [0u8; 24];
            entry[0..4].copy_from_slice(&name.to_le_bytes());
            entry[4] = 0x12; // STB_GLOBAL | STT_FUNC
            let (shndx, value) = if sym.defined { (7u16, 0x1000u64) } else { (0, 0) };
            entry[6..8].copy_from_slice(&shndx.to_le_bytes());
            entry[8..16].copy_from_slice(&value.to_le_bytes());
            dynsym.extend_from_slice(&entry);
            versym.extend_from_slice(&sym.version.to_le_bytes());
        }

        let mut dyn_entries: Vec<(i64, u64)> = self
            .needed
            .iter()
            .map(|lib| (DynTag::NEEDED, u64::from(dynstr.add(lib))))
            .collect();
        if let Some(soname) = &self.soname {
            dyn_entries.push((DynTag::SONAME, u64::from(dynstr.add(soname))));
        }
        if self.verneed {
            dyn_entries.push((DynTag::VERNEED, 0));
            dyn_entries.push((DynTag::VERNEEDNUM, 1));
        }
        dyn_entries.push((DynTag::NULL, 0));
        let dynamic: Vec<u8> = dyn_entries
            .iter()
            .flat_map(|(t, v)| t.to_le_bytes().into_iter().chain(v.to_le_bytes()))
            .collect();

        let mut shstrtab = Strtab::new();
        let sections = vec![
            Section {
                name: shstrtab.add(".dynstr"),
                kind: SectionType::Strtab,
                link: 0,
                entsize: 0,
                bytes: dynstr.0,
            },
            Section {
                name: shstrtab.add(".dynsym"),
                kind: SectionType::Dynsym,
                link: 1,
                entsize: 24,
                bytes: dynsym,
            },
            Section {
                name: shstrtab.add(".gnu.version"),
                kind: SectionType::GnuVersym,
                link: 2,
                entsize: 2,
                bytes: versym,
            },
            Section {
                name: shstrtab.add(".dynamic"),
                kind: SectionType::Dynamic,
                link: 1,
                entsize: 16,
                bytes: dynamic,
            },
        ];
        let shstrtab_name = shstrtab.add(".shstrtab");
        let mut sections = sections;
        sections.push(Section {
            name: shstrtab_name,
            kind: SectionType::Strtab,
            link: 0,
            entsize: 0,
            bytes: shstrtab.0,
        });

        let mut out = vec![0u8; 64];
        let mut placed = Vec::with_capacity(sections.len());
        for section in &sections {
            while out.len() % 8 != 0 {
                out.push(0);
            }
            placed.push(out.len() as u64);
            out.extend_from_slice(&section.bytes);
        }
        while out.len() % 8 != 0 {
            out.push(0);
        }
        let shoff = out.len() as u64;

        out.extend_from_slice(&[0u8; 64]); // SHN_UNDEF
        for (section, offset) in sections.iter().zip(&placed) {
            let mut sh = [0u8; 64];
            sh[0..4].copy_from_slice(&section.name.to_le_bytes());
            sh[4..8].copy_from_slice(&section.kind.to_u32().to_le_bytes());
            sh[24..32].copy_from_slice(&offset.to_le_bytes());
            sh[32..40].copy_from_slice(&(section.bytes.len() as u64).to_le_bytes());
            sh[40..44].copy_from_slice(&section.link.to_le_bytes());
            sh[48..56].copy_from_slice(&8u64.to_le_bytes());
            sh[56..64].copy_from_slice(&section.entsize.to_le_bytes());
            out.extend_from_slice(&sh);
        }

        let shnum = (sections.len() + 1) as u16;
        out[0..4].copy_from_slice(&ELF_MAGIC);
        out[4] = 2; // ELFCLASS64
        out[5] = 1; // ELFDATA2LSB
        out[6] = 1; // EV_CURRENT
        out[16..18].copy_from_slice(&3u16.to_le_bytes()); // ET_DYN
        out[18..20].copy_from_slice(&62u16.to_le_bytes()); // EM_X86_64
        out[20..24].copy_from_slice(&1u32.to_le_bytes());
        out[40..48].copy_from_slice(&shoff.to_le_bytes());
        out[52..54].copy_from_slice(&64u16.to_le_bytes());
        out[58..60].copy_from_slice(&64u16.to_le_bytes());
        out[60..62].copy_from_slice(&shnum.to_le_bytes());
        out[62..64].copy_from_slice(&(shnum - 1).to_le_bytes());
        out
    }
}
