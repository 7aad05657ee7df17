//! Error type shared by every harness operation.

use std::path::PathBuf;

use droidcompat_core::elf::ElfError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("{}: {source}", path.display())]
    Elf { path: PathBuf, source: ElfError },
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{library} is missing {} required symbol(s): {}", .missing.len(), .missing.join(", "))]
    MissingSymbols {
        library: String,
        missing: Vec<String>,
    },
    #[error("unknown shim library '{0}', expected bionic-compat|log|opensles")]
    UnknownLibrary(String),
    #[error("{}: not a 64-bit ELF file", .0.display())]
    NotElf64(PathBuf),
    #[error("{}: not a shared object", .0.display())]
    NotSharedObject(PathBuf),
    #[error("{}: build artifact not found", .0.display())]
    MissingArtifact(PathBuf),
    #[error("no host runtime library matching '{0}' found")]
    HostLibraryNotFound(String),
}

impl HarnessError {
    pub(crate) fn elf(path: impl Into<PathBuf>, source: ElfError) -> Self {
        Self::Elf {
            path: path.into(),
            source,
        }
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
