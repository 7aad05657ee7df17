//! Which provider satisfies each undefined symbol of a module.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use droidcompat_core::elf::ElfImage;
use serde::Serialize;

use crate::error::{HarnessError, HarnessResult};
use crate::exports::exported_names;

/// A shared object whose exports can satisfy module imports.
#[derive(Debug, Clone)]
pub struct Provider {
    pub name: String,
    pub exports: BTreeSet<String>,
}

impl Provider {
    /// Load a provider from a shared object on disk. Its name is the soname
    /// when present, otherwise the file name.
    pub fn from_file(path: &Path) -> HarnessResult<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(path, &data)
    }

    pub fn from_bytes(path: &Path, data: &[u8]) -> HarnessResult<Self> {
        let image = ElfImage::parse(data).map_err(|e| HarnessError::elf(path, e))?;
        let exports = exported_names(&image).map_err(|e| HarnessError::elf(path, e))?;
        let soname = image.soname().map_err(|e| HarnessError::elf(path, e))?;
        let name = soname.unwrap_or_else(|| {
            path.file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
        });
        Ok(Self { name, exports })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolCoverage {
    pub symbol: String,
    /// First provider, in command-line order, that exports the symbol.
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub module: PathBuf,
    pub needed: Vec<String>,
    pub symbols: Vec<SymbolCoverage>,
}

impl CoverageReport {
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.symbols
            .iter()
            .filter(|s| s.provider.is_none())
            .map(|s| s.symbol.as_str())
    }

    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.symbols.iter().filter(|s| s.provider.is_some()).count()
    }
}

/// Classify every undefined dynamic symbol of `data` against `providers`.
pub fn classify(path: &Path, data: &[u8], providers: &[Provider]) -> HarnessResult<CoverageReport> {
    let image = ElfImage::parse(data).map_err(|e| HarnessError::elf(path, e))?;
    let undefined: BTreeSet<String> = image
        .dynamic_symbols()
        .map_err(|e| HarnessError::elf(path, e))?
        .into_iter()
        .filter(|s| s.symbol.is_undefined() && !s.name.is_empty())
        .map(|s| s.name)
        .collect();
    let symbols = undefined
        .into_iter()
        .map(|symbol| {
            let provider = providers
                .iter()
                .find(|p| p.exports.contains(&symbol))
                .map(|p| p.name.clone());
            SymbolCoverage { symbol, provider }
        })
        .collect();
    Ok(CoverageReport {
        module: path.to_path_buf(),
        needed: image.needed().map_err(|e| HarnessError::elf(path, e))?,
        symbols,
    })
}

pub fn classify_file(path: &Path, providers: &[Provider]) -> HarnessResult<CoverageReport> {
    let data = std::fs::read(path)?;
    classify(path, &data, providers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidcompat_core::elf::synth::SynthElf;

    fn provider(soname: &str, exports: &[&str]) -> Provider {
        let mut elf = SynthElf::new().soname(soname);
        for e in exports {
            elf = elf.export(e);
        }
        Provider::from_bytes(Path::new("ignored.so"), &elf.build()).unwrap()
    }

    #[test]
    fn provider_named_by_soname() {
        let p = provider("liblog.so", &["__android_log_print"]);
        assert_eq!(p.name, "liblog.so");
        assert!(p.exports.contains("__android_log_print"));
    }

    #[test]
    fn provider_without_soname_uses_file_name() {
        let data = SynthElf::new().export("f").build();
        let p = Provider::from_bytes(Path::new("/tmp/libfoo.so"), &data).unwrap();
        assert_eq!(p.name, "libfoo.so");
    }

    #[test]
    fn symbols_are_attributed_to_first_provider() {
        let module = SynthElf::new()
            .needed("liblog.so")
            .needed("libOpenSLES.so")
            .import("__android_log_print", 2)
            .import("slCreateEngine", 3)
            .import("__errno", 2)
            .import("pthread_create", 2)
            .export("JNI_OnLoad")
            .build();
        let providers = [
            provider("libbionic_compat.so", &["__errno", "_ctype_"]),
            provider("liblog.so", &["__android_log_print", "__errno"]),
            provider("libOpenSLES.so", &["slCreateEngine"]),
        ];
        let report = classify(Path::new("libgme.so"), &module, &providers).unwrap();

        assert_eq!(report.needed, ["liblog.so", "libOpenSLES.so"]);
        assert_eq!(report.symbols.len(), 4);
        assert_eq!(report.resolved_count(), 3);
        assert_eq!(report.unresolved().collect::<Vec<_>>(), ["pthread_create"]);
        let errno = report.symbols.iter().find(|s| s.symbol == "__errno").unwrap();
        assert_eq!(errno.provider.as_deref(), Some("libbionic_compat.so"));
    }
}
