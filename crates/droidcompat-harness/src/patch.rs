//! In-place symbol-version neutralization of module files.

use std::path::{Path, PathBuf};

use droidcompat_core::elf::{ELF_MAGIC, VersionPatchReport, neutralize_versions};
use serde::Serialize;

use crate::error::{HarnessError, HarnessResult};
use crate::structured_log::ArtifactRef;

const EI_CLASS: usize = 4;
const ELFCLASS64: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PatchStatus {
    Patched {
        versym_entries: usize,
        versym_rewritten: usize,
        verneed_retagged: bool,
        verneednum_retagged: bool,
    },
    /// Already neutral; the file was not rewritten.
    Unchanged,
    Skipped {
        reason: String,
    },
}

impl From<VersionPatchReport> for PatchStatus {
    fn from(report: VersionPatchReport) -> Self {
        if !report.changed() {
            return Self::Unchanged;
        }
        Self::Patched {
            versym_entries: report.versym_entries,
            versym_rewritten: report.versym_rewritten,
            verneed_retagged: report.verneed_retagged,
            verneednum_retagged: report.verneednum_retagged,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PatchOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: PatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<ArtifactRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<ArtifactRef>,
}

/// Why `data` is not a patch candidate, if it isn't.
fn skip_reason(path: &Path, data: &[u8]) -> Option<String> {
    if !data.starts_with(&ELF_MAGIC) {
        return Some("not an ELF file".to_owned());
    }
    if data.get(EI_CLASS) != Some(&ELFCLASS64) {
        return Some(HarnessError::NotElf64(path.to_path_buf()).to_string());
    }
    None
}

/// Patch an in-memory image. `data` is modified only when the outcome is
/// [`PatchStatus::Patched`].
pub fn patch_bytes(path: &Path, data: &mut [u8]) -> HarnessResult<PatchOutcome> {
    if let Some(reason) = skip_reason(path, data) {
        return Ok(PatchOutcome {
            path: path.to_path_buf(),
            status: PatchStatus::Skipped { reason },
            before: None,
            after: None,
        });
    }
    let before = ArtifactRef::from_bytes(path, data);
    let report = neutralize_versions(data).map_err(|e| HarnessError::elf(path, e))?;
    let status = PatchStatus::from(report);
    let after = matches!(status, PatchStatus::Patched { .. })
        .then(|| ArtifactRef::from_bytes(path, data));
    Ok(PatchOutcome {
        path: path.to_path_buf(),
        status,
        before: Some(before),
        after,
    })
}

/// Patch a file on disk, rewriting it only when something changed.
pub fn patch_file(path: &Path) -> HarnessResult<PatchOutcome> {
    let mut data = std::fs::read(path)?;
    let outcome = patch_bytes(path, &mut data)?;
    if matches!(outcome.status, PatchStatus::Patched { .. }) {
        std::fs::write(path, &data)?;
    }
    Ok(outcome)
}
