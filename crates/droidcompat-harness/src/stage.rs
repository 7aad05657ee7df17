//! Loader directory layout.
//!
//! A staged directory holds each shim under the soname a bionic-linked
//! module asks for, plus `libc.so`, `libm.so` and `libdl.so` symlinks to the
//! host runtime. Point `LD_LIBRARY_PATH` at it and the module's `DT_NEEDED`
//! entries resolve unchanged.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{HarnessError, HarnessResult};
use crate::manifest::ShimLibrary;
use crate::structured_log::ArtifactRef;

/// Directories searched for the host runtime, most specific first.
pub const HOST_LIBRARY_DIRS: &[&str] = &[
    "/lib/x86_64-linux-gnu",
    "/usr/lib/x86_64-linux-gnu",
    "/lib/aarch64-linux-gnu",
    "/usr/lib/aarch64-linux-gnu",
    "/lib64",
    "/usr/lib64",
    "/lib",
    "/usr/lib",
];

/// Bionic name and host file name of each runtime library a module links.
pub const HOST_RUNTIME: &[(&str, &str)] = &[
    ("libc.so", "libc.so.6"),
    ("libm.so", "libm.so.6"),
    ("libdl.so", "libdl.so.2"),
];

/// Resolved host runtime libraries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRuntime {
    /// `(bionic name, host path)` pairs.
    pub links: Vec<(String, PathBuf)>,
}

impl HostRuntime {
    /// Find every [`HOST_RUNTIME`] library in the first of `dirs` holding it.
    pub fn discover_in<P: AsRef<Path>>(dirs: &[P]) -> HarnessResult<Self> {
        let links = HOST_RUNTIME
            .iter()
            .map(|(bionic, host)| {
                dirs.iter()
                    .map(|d| d.as_ref().join(host))
                    .find(|p| p.exists())
                    .map(|p| ((*bionic).to_owned(), p))
                    .ok_or_else(|| HarnessError::HostLibraryNotFound((*host).to_owned()))
            })
            .collect::<HarnessResult<_>>()?;
        Ok(Self { links })
    }

    pub fn discover() -> HarnessResult<Self> {
        Self::discover_in(HOST_LIBRARY_DIRS)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StagedShim {
    pub library: String,
    pub soname: String,
    pub artifact: ArtifactRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub out_dir: PathBuf,
    pub shims: Vec<StagedShim>,
    pub links: Vec<(String, PathBuf)>,
}

fn replace_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    if link.symlink_metadata().is_ok() {
        std::fs::remove_file(link)?;
    }
    std::os::unix::fs::symlink(target, link)
}

/// Copy every shim from `artifacts` into `out` under its soname and link
/// the host runtime next to them.
pub fn stage(out: &Path, artifacts: &Path, host: &HostRuntime) -> HarnessResult<StageReport> {
    let sources: Vec<(ShimLibrary, PathBuf)> = ShimLibrary::ALL
        .iter()
        .map(|lib| (*lib, artifacts.join(lib.artifact_name())))
        .collect();
    if let Some((_, missing)) = sources.iter().find(|(_, p)| !p.is_file()) {
        return Err(HarnessError::MissingArtifact(missing.clone()));
    }

    std::fs::create_dir_all(out)?;
    let mut shims = Vec::with_capacity(sources.len());
    for (lib, src) in sources {
        let dest = out.join(lib.soname());
        if dest.symlink_metadata().is_ok() {
            std::fs::remove_file(&dest)?;
        }
        std::fs::copy(&src, &dest)?;
        shims.push(StagedShim {
            library: lib.name().to_owned(),
            soname: lib.soname().to_owned(),
            artifact: ArtifactRef::from_file(&dest)?,
        });
    }
    for (name, target) in &host.links {
        replace_symlink(target, &out.join(name))?;
    }

    Ok(StageReport {
        out_dir: out.to_path_buf(),
        shims,
        links: host.links.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "droidcompat-stage-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn fake_host(root: &Path) -> HostRuntime {
        let lib = root.join("hostlib");
        std::fs::create_dir_all(&lib).unwrap();
        for (_, host) in HOST_RUNTIME {
            std::fs::write(lib.join(host), b"host").unwrap();
        }
        HostRuntime::discover_in(&[root.join("missing"), lib]).unwrap()
    }

    fn fake_artifacts(root: &Path) -> PathBuf {
        let dir = root.join("target");
        std::fs::create_dir_all(&dir).unwrap();
        for lib in ShimLibrary::ALL {
            std::fs::write(dir.join(lib.artifact_name()), lib.name()).unwrap();
        }
        dir
    }

    #[test]
    fn discovery_reports_missing_library() {
        let root = scratch("discover");
        let err = HostRuntime::discover_in(&[&root]).unwrap_err();
        assert!(matches!(err, HarnessError::HostLibraryNotFound(name) if name == "libc.so.6"));
    }

    #[test]
    fn stages_shims_under_sonames() {
        let root = scratch("layout");
        let host = fake_host(&root);
        let artifacts = fake_artifacts(&root);
        let out = root.join("stage");

        let report = stage(&out, &artifacts, &host).unwrap();
        assert_eq!(report.shims.len(), 3);
        assert_eq!(
            std::fs::read_to_string(out.join("libOpenSLES.so")).unwrap(),
            "opensles"
        );
        assert_eq!(std::fs::read_to_string(out.join("liblog.so")).unwrap(), "log");
        for name in ["libc.so", "libm.so", "libdl.so"] {
            let link = out.join(name);
            assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
            assert_eq!(std::fs::read(&link).unwrap(), b"host");
        }

        // Restaging over an existing layout succeeds.
        stage(&out, &artifacts, &host).unwrap();
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_artifact_stops_before_writing() {
        let root = scratch("missing");
        let host = fake_host(&root);
        let artifacts = fake_artifacts(&root);
        std::fs::remove_file(artifacts.join(ShimLibrary::Log.artifact_name())).unwrap();
        let out = root.join("stage");

        let err = stage(&out, &artifacts, &host).unwrap_err();
        assert!(matches!(err, HarnessError::MissingArtifact(_)));
        assert!(!out.exists());
        let _ = std::fs::remove_dir_all(&root);
    }
}
