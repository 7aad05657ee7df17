//! Check a built shim against the symbols it must export.

use std::collections::BTreeSet;
use std::path::Path;

use droidcompat_core::elf::{ElfImage, ElfResult};
use serde::Serialize;

use crate::error::{HarnessError, HarnessResult};
use crate::manifest::ShimLibrary;

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub library: String,
    pub soname: Option<String>,
    pub defined: Vec<String>,
    pub missing: Vec<String>,
}

impl ExportReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Turn an incomplete report into [`HarnessError::MissingSymbols`].
    pub fn into_result(self) -> HarnessResult<Self> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(HarnessError::MissingSymbols {
                library: self.library,
                missing: self.missing,
            })
        }
    }
}

/// Names of every symbol `image` exports through `.dynsym`.
pub fn exported_names(image: &ElfImage<'_>) -> ElfResult<BTreeSet<String>> {
    Ok(image
        .dynamic_symbols()?
        .into_iter()
        .filter(|s| s.symbol.is_exported())
        .map(|s| s.name)
        .collect())
}

/// Compare the exports of an in-memory shared object against `library`.
/// Executables and relocatable objects are rejected.
pub fn check_exports(
    library: ShimLibrary,
    path: &Path,
    data: &[u8],
) -> HarnessResult<ExportReport> {
    let image = ElfImage::parse(data).map_err(|e| HarnessError::elf(path, e))?;
    if !image.header.is_shared_object() {
        return Err(HarnessError::NotSharedObject(path.to_path_buf()));
    }
    let exported = exported_names(&image).map_err(|e| HarnessError::elf(path, e))?;
    let (defined, missing): (Vec<String>, Vec<String>) = library
        .required_symbols()
        .iter()
        .map(|s| (*s).to_owned())
        .partition(|s| exported.contains(s));
    Ok(ExportReport {
        library: library.name().to_owned(),
        soname: image.soname().map_err(|e| HarnessError::elf(path, e))?,
        defined,
        missing,
    })
}

/// Read `path` and check its exports.
pub fn check_exports_file(library: ShimLibrary, path: &Path) -> HarnessResult<ExportReport> {
    let data = std::fs::read(path)?;
    check_exports(library, path, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidcompat_core::elf::synth::SynthElf;

    #[test]
    fn complete_library_has_nothing_missing() {
        let mut elf = SynthElf::new().soname("liblog.so");
        for sym in ShimLibrary::Log.required_symbols() {
            elf = elf.export(sym);
        }
        let report = check_exports(ShimLibrary::Log, Path::new("liblog.so"), &elf.build()).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.defined.len(), ShimLibrary::Log.required_symbols().len());
        assert_eq!(report.soname.as_deref(), Some("liblog.so"));
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn imports_do_not_count_as_exports() {
        let data = SynthElf::new()
            .export("__android_log_write")
            .import("__android_log_print", 2)
            .build();
        let report = check_exports(ShimLibrary::Log, Path::new("x.so"), &data).unwrap();
        assert_eq!(report.defined, ["__android_log_write"]);
        assert!(report.missing.contains(&"__android_log_print".to_owned()));
        assert!(matches!(
            report.into_result(),
            Err(HarnessError::MissingSymbols { missing, .. }) if missing.len() == 5
        ));
    }

    #[test]
    fn non_elf_input_is_an_error() {
        let err = check_exports(ShimLibrary::OpenSles, Path::new("notes.txt"), b"plain text here")
            .unwrap_err();
        assert!(matches!(err, HarnessError::Elf { .. }));
    }

    #[test]
    fn executable_is_not_a_shim() {
        let mut data = SynthElf::new().export("slCreateEngine").build();
        data[16..18].copy_from_slice(&2u16.to_le_bytes());
        let err = check_exports(ShimLibrary::OpenSles, Path::new("a.out"), &data).unwrap_err();
        assert!(matches!(err, HarnessError::NotSharedObject(p) if p == Path::new("a.out")));
    }
}
