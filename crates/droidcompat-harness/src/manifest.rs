//! What each shim library promises to export.

use std::fmt;

use crate::error::{HarnessError, HarnessResult};

/// One of the shared objects this workspace builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShimLibrary {
    BionicCompat,
    Log,
    OpenSles,
}

const BIONIC_COMPAT_SYMBOLS: &[&str] = &[
    "_ctype_",
    "__sF",
    "__init_sF",
    "__errno",
    "__memcpy_chk",
    "__memmove_chk",
    "__memset_chk",
    "__memchr_chk",
    "__memrchr_chk",
    "__strlen_chk",
    "__strchr_chk",
    "__strrchr_chk",
    "__strcpy_chk",
    "__stpcpy_chk",
    "__strncpy_chk",
    "__strncpy_chk2",
    "__stpncpy_chk",
    "__stpncpy_chk2",
    "__strcat_chk",
    "__strncat_chk",
    "__vsnprintf_chk",
    "__vsprintf_chk",
    "__read_chk",
    "__write_chk",
    "__pread_chk",
    "__open_2",
    "__openat_2",
    "__FD_SET_chk",
    "__FD_CLR_chk",
    "__FD_ISSET_chk",
    "android_set_abort_message",
    "gettid",
    "__system_property_get",
    "__system_property_find",
    "__system_property_set",
    "__system_property_read",
    "__system_property_read_callback",
    "__system_property_foreach",
    "__system_property_find_nth",
    "__system_property_serial",
    "__system_property_area_serial",
];

const LOG_SYMBOLS: &[&str] = &[
    "__android_log_write",
    "__android_log_buf_write",
    "__android_log_print",
    "__android_log_buf_print",
    "__android_log_vprint",
    "__android_log_is_loggable",
];

const OPENSLES_SYMBOLS: &[&str] = &[
    "slCreateEngine",
    "slQueryNumSupportedEngineInterfaces",
    "slQuerySupportedEngineInterfaces",
    "SL_IID_NULL",
    "SL_IID_OBJECT",
    "SL_IID_ENGINE",
    "SL_IID_PLAY",
    "SL_IID_RECORD",
    "SL_IID_BUFFERQUEUE",
    "SL_IID_VOLUME",
    "SL_IID_OUTPUTMIX",
    "SL_IID_ANDROIDSIMPLEBUFFERQUEUE",
    "SL_IID_ANDROIDBUFFERQUEUESOURCE",
    "SL_IID_ANDROIDCONFIGURATION",
];

impl ShimLibrary {
    pub const ALL: [ShimLibrary; 3] = [Self::BionicCompat, Self::Log, Self::OpenSles];

    /// Parse the command-line name.
    pub fn from_name(name: &str) -> HarnessResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bionic-compat" | "bionic_compat" | "libbionic_compat.so" => Ok(Self::BionicCompat),
            "log" | "liblog" | "liblog.so" => Ok(Self::Log),
            "opensles" | "libopensles" | "libopensles.so" => Ok(Self::OpenSles),
            _ => Err(HarnessError::UnknownLibrary(name.to_owned())),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BionicCompat => "bionic-compat",
            Self::Log => "log",
            Self::OpenSles => "opensles",
        }
    }

    /// The soname a bionic-linked module asks for.
    #[must_use]
    pub const fn soname(self) -> &'static str {
        match self {
            Self::BionicCompat => "libbionic_compat.so",
            Self::Log => "liblog.so",
            Self::OpenSles => "libOpenSLES.so",
        }
    }

    /// File name cargo gives the built `cdylib`.
    #[must_use]
    pub const fn artifact_name(self) -> &'static str {
        match self {
            Self::BionicCompat => "libbionic_compat.so",
            Self::Log => "libdroidcompat_liblog.so",
            Self::OpenSles => "libdroidcompat_opensles.so",
        }
    }

    #[must_use]
    pub const fn required_symbols(self) -> &'static [&'static str] {
        match self {
            Self::BionicCompat => BIONIC_COMPAT_SYMBOLS,
            Self::Log => LOG_SYMBOLS,
            Self::OpenSles => OPENSLES_SYMBOLS,
        }
    }
}

impl fmt::Display for ShimLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_parse_back() {
        for lib in ShimLibrary::ALL {
            assert_eq!(ShimLibrary::from_name(lib.name()).unwrap(), lib);
            assert_eq!(ShimLibrary::from_name(lib.soname()).unwrap(), lib);
        }
        assert!(matches!(
            ShimLibrary::from_name("libc"),
            Err(HarnessError::UnknownLibrary(name)) if name == "libc"
        ));
    }

    #[test]
    fn symbol_lists_have_no_duplicates() {
        for lib in ShimLibrary::ALL {
            let syms = lib.required_symbols();
            let unique: HashSet<_> = syms.iter().collect();
            assert_eq!(unique.len(), syms.len(), "{lib}");
        }
    }

    #[test]
    fn fortified_family_is_complete() {
        let chk = BIONIC_COMPAT_SYMBOLS
            .iter()
            .filter(|s| s.ends_with("_chk") || s.ends_with("_chk2") || s.ends_with("_2"))
            .count();
        assert_eq!(chk, 26);
    }

    #[test]
    fn audio_ids_match_the_engine_model() {
        for id in droidcompat_core::opensl::INTERFACE_IDS {
            assert!(OPENSLES_SYMBOLS.contains(&id), "{id}");
        }
    }
}
