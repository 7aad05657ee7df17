//! ELF64 file header.

use super::{EI_NIDENT, ELF_MAGIC, ElfError, ElfResult, u16_at, u64_at};

const EI_CLASS: usize = 4;
const EI_DATA: usize = 5;
const ELFCLASS64: u8 = 2;
const ELFDATA2LSB: u8 = 1;

/// ELF object file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfType {
    None,
    Rel,
    Exec,
    Dyn,
    Core,
    Unknown(u16),
}

impl From<u16> for ElfType {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Rel,
            2 => Self::Exec,
            3 => Self::Dyn,
            4 => Self::Core,
            other => Self::Unknown(other),
        }
    }
}

/// Machine architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfMachine {
    I386,
    Arm,
    X86_64,
    Aarch64,
    Unknown(u16),
}

impl From<u16> for ElfMachine {
    fn from(value: u16) -> Self {
        match value {
            3 => Self::I386,
            40 => Self::Arm,
            62 => Self::X86_64,
            183 => Self::Aarch64,
            other => Self::Unknown(other),
        }
    }
}

impl ElfMachine {
    #[must_use]
    pub fn name(self) -> String {
        match self {
            Self::I386 => "i386".to_owned(),
            Self::Arm => "arm".to_owned(),
            Self::X86_64 => "x86_64".to_owned(),
            Self::Aarch64 => "aarch64".to_owned(),
            Self::Unknown(v) => format!("machine-{v}"),
        }
    }
}

/// The parts of the ELF64 header the tooling reads.
#[derive(Debug, Clone, Copy)]
pub struct Elf64Header {
    pub e_type: ElfType,
    pub e_machine: ElfMachine,
    /// Section header table file offset
    pub e_shoff: u64,
    /// Section header table entry size
    pub e_shentsize: u16,
    /// Section header table entry count
    pub e_shnum: u16,
    /// Section header string table index
    pub e_shstrndx: u16,
}

impl Elf64Header {
    /// Size of an ELF64 header in bytes.
    pub const SIZE: usize = 64;

    /// Parse and validate the header.
    ///
    /// # Errors
    ///
    /// Fails when the buffer is short, the magic is wrong, or the file is not
    /// little-endian ELF64.
    pub fn parse(data: &[u8]) -> ElfResult<Self> {
        let too_small = ElfError::BufferTooSmall {
            needed: Self::SIZE,
            available: data.len(),
        };
        match data.get(0..4) {
            Some(magic) if magic != ELF_MAGIC => return Err(ElfError::InvalidMagic),
            Some(_) if data.len() >= EI_NIDENT => {}
            _ => return Err(too_small),
        }
        if data[EI_CLASS] != ELFCLASS64 {
            return Err(ElfError::UnsupportedClass(data[EI_CLASS]));
        }
        if data[EI_DATA] != ELFDATA2LSB {
            return Err(ElfError::UnsupportedEncoding(data[EI_DATA]));
        }
        if data.len() < Self::SIZE {
            return Err(too_small);
        }

        Ok(Self {
            e_type: ElfType::from(u16_at(data, 16)?),
            e_machine: ElfMachine::from(u16_at(data, 18)?),
            e_shoff: u64_at(data, 40)?,
            e_shentsize: u16_at(data, 58)?,
            e_shnum: u16_at(data, 60)?,
            e_shstrndx: u16_at(data, 62)?,
        })
    }

    #[must_use]
    pub fn is_shared_object(&self) -> bool {
        matches!(self.e_type, ElfType::Dyn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_valid_header() -> [u8; 64] {
        let mut header = [0u8; 64];
        header[0..4].copy_from_slice(&ELF_MAGIC);
        header[4] = 2; // ELF64
        header[5] = 1; // LSB
        header[6] = 1;
        header[16] = 3; // ET_DYN
        header[18] = 183; // aarch64
        header[20] = 1;
        header[52] = 64;
        header[58] = 64; // e_shentsize
        header[60] = 7; // e_shnum
        header[62] = 6; // e_shstrndx
        header
    }

    #[test]
    fn parses_valid_header() {
        let header = Elf64Header::parse(&make_valid_header()).unwrap();
        assert!(header.is_shared_object());
        assert_eq!(header.e_machine, ElfMachine::Aarch64);
        assert_eq!(header.e_shentsize, 64);
        assert_eq!(header.e_shnum, 7);
        assert_eq!(header.e_shstrndx, 6);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = make_valid_header();
        data[1] = b'X';
        assert_eq!(Elf64Header::parse(&data).unwrap_err(), ElfError::InvalidMagic);
        assert_eq!(
            Elf64Header::parse(b"#!/bin/sh\necho hi\n").unwrap_err(),
            ElfError::InvalidMagic
        );
    }

    #[test]
    fn rejects_elf32_and_big_endian() {
        let mut data = make_valid_header();
        data[4] = 1;
        assert_eq!(
            Elf64Header::parse(&data).unwrap_err(),
            ElfError::UnsupportedClass(1)
        );
        let mut data = make_valid_header();
        data[5] = 2;
        assert_eq!(
            Elf64Header::parse(&data).unwrap_err(),
            ElfError::UnsupportedEncoding(2)
        );
    }

    #[test]
    fn rejects_truncated_header() {
        let data = make_valid_header();
        assert!(matches!(
            Elf64Header::parse(&data[..40]),
            Err(ElfError::BufferTooSmall {
                needed: 64,
                available: 40
            })
        ));
    }

    #[test]
    fn machine_names() {
        assert_eq!(ElfMachine::from(62).name(), "x86_64");
        assert_eq!(ElfMachine::from(999).name(), "machine-999");
    }
}
