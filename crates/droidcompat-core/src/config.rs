//! Environment configuration for the shim libraries.
//!
//! Three knobs, each read once on first use and cached:
//! - `DROIDCOMPAT_TRACE`: `on` (default) or `off`. Controls the one-line
//!   notices the audio stub prints when the module reaches it.
//! - `DROIDCOMPAT_STDIO`: `coherent` (default) or `snapshot`. Stream-mirror
//!   population policy, see [`StreamSync`].
//! - `DROIDCOMPAT_LOG_TAG`: tag substituted by the log bridge when a caller
//!   passes a null tag. Defaults to [`DEFAULT_LOG_TAG`].
//!
//! None of these changes the signature or result code of an exported symbol.

use std::ffi::{CStr, CString};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable selecting [`TraceLevel`].
pub const TRACE_ENV: &str = "DROIDCOMPAT_TRACE";
/// Environment variable selecting [`StreamSync`].
pub const STDIO_ENV: &str = "DROIDCOMPAT_STDIO";
/// Environment variable overriding the fallback log tag.
pub const LOG_TAG_ENV: &str = "DROIDCOMPAT_LOG_TAG";

/// Tag used when the caller passes a null tag and no override is set.
pub const DEFAULT_LOG_TAG: &CStr = c"GME";

/// Whether stub entry points announce themselves on stderr.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceLevel {
    /// Print a notice when the module reaches a stubbed capability.
    #[default]
    On,
    /// Stay silent.
    Off,
}

impl TraceLevel {
    /// Parse from string (case-insensitive). Unknown values fall back to the default.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "0" | "false" | "no" | "quiet" => Self::Off,
            _ => Self::On,
        }
    }

    #[must_use]
    pub const fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

/// How the standard-stream mirror is populated at load time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamSync {
    /// Flush each host output stream and make it unbuffered before copying it.
    /// Mirrored and host writes then reach the file descriptor in call order.
    #[default]
    Coherent,
    /// Plain byte copy of the host stream state.
    Snapshot,
}

impl StreamSync {
    /// Parse from string (case-insensitive). Unknown values fall back to the default.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "snapshot" | "copy" | "raw" => Self::Snapshot,
            _ => Self::Coherent,
        }
    }
}

// Cache states: 0 = unresolved, 255 = resolving, anything else = value + 1.
const UNRESOLVED: u8 = 0;
const RESOLVING: u8 = 255;

/// Resolve a cached enum through a non-blocking state machine. A reentrant or
/// racing caller that observes `RESOLVING` gets `fallback` instead of waiting.
fn resolve_cached(
    cache: &AtomicU8,
    fallback: u8,
    read: impl FnOnce() -> u8,
) -> u8 {
    let cached = cache.load(Ordering::Acquire);
    if cached != UNRESOLVED && cached != RESOLVING {
        return cached - 1;
    }
    if cached == RESOLVING {
        return fallback;
    }
    if cache
        .compare_exchange(UNRESOLVED, RESOLVING, Ordering::SeqCst, Ordering::Relaxed)
        .is_err()
    {
        let v = cache.load(Ordering::Acquire);
        return if v != UNRESOLVED && v != RESOLVING {
            v - 1
        } else {
            fallback
        };
    }
    let value = read();
    cache.store(value + 1, Ordering::Release);
    value
}

static TRACE_CACHE: AtomicU8 = AtomicU8::new(UNRESOLVED);
static STDIO_CACHE: AtomicU8 = AtomicU8::new(UNRESOLVED);

fn trace_to_u8(level: TraceLevel) -> u8 {
    match level {
        TraceLevel::On => 0,
        TraceLevel::Off => 1,
    }
}

fn u8_to_trace(v: u8) -> TraceLevel {
    if v == 1 { TraceLevel::Off } else { TraceLevel::On }
}

fn sync_to_u8(sync: StreamSync) -> u8 {
    match sync {
        StreamSync::Coherent => 0,
        StreamSync::Snapshot => 1,
    }
}

fn u8_to_sync(v: u8) -> StreamSync {
    if v == 1 {
        StreamSync::Snapshot
    } else {
        StreamSync::Coherent
    }
}

/// Configured trace level (reads the environment on first call).
#[must_use]
pub fn trace_level() -> TraceLevel {
    u8_to_trace(resolve_cached(&TRACE_CACHE, trace_to_u8(TraceLevel::On), || {
        trace_to_u8(
            std::env::var(TRACE_ENV)
                .map(|v| TraceLevel::from_str_loose(&v))
                .unwrap_or_default(),
        )
    }))
}

/// Configured stream-mirror policy (reads the environment on first call).
#[must_use]
pub fn stream_sync() -> StreamSync {
    u8_to_sync(resolve_cached(
        &STDIO_CACHE,
        sync_to_u8(StreamSync::Coherent),
        || {
            sync_to_u8(
                std::env::var(STDIO_ENV)
                    .map(|v| StreamSync::from_str_loose(&v))
                    .unwrap_or_default(),
            )
        },
    ))
}

/// Tag substituted for a null caller tag.
///
/// An override containing an interior NUL, or an empty override, is ignored.
#[must_use]
pub fn fallback_log_tag() -> &'static CStr {
    static TAG: OnceLock<Option<CString>> = OnceLock::new();
    TAG.get_or_init(|| {
        std::env::var(LOG_TAG_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .and_then(|v| CString::new(v).ok())
    })
    .as_deref()
    .unwrap_or(DEFAULT_LOG_TAG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_level_parsing() {
        assert_eq!(TraceLevel::from_str_loose("off"), TraceLevel::Off);
        assert_eq!(TraceLevel::from_str_loose(" OFF "), TraceLevel::Off);
        assert_eq!(TraceLevel::from_str_loose("0"), TraceLevel::Off);
        assert_eq!(TraceLevel::from_str_loose("on"), TraceLevel::On);
        assert_eq!(TraceLevel::from_str_loose("whatever"), TraceLevel::On);
        assert!(TraceLevel::default().enabled());
    }

    #[test]
    fn stream_sync_parsing() {
        assert_eq!(StreamSync::from_str_loose("snapshot"), StreamSync::Snapshot);
        assert_eq!(StreamSync::from_str_loose("Copy"), StreamSync::Snapshot);
        assert_eq!(StreamSync::from_str_loose("coherent"), StreamSync::Coherent);
        assert_eq!(StreamSync::from_str_loose(""), StreamSync::Coherent);
    }

    #[test]
    fn cache_round_trips_and_sticks() {
        let cache = AtomicU8::new(UNRESOLVED);
        assert_eq!(resolve_cached(&cache, 0, || 1), 1);
        // Second resolution must not re-read.
        assert_eq!(resolve_cached(&cache, 0, || panic!("re-read")), 1);
    }

    #[test]
    fn resolving_state_returns_fallback() {
        let cache = AtomicU8::new(RESOLVING);
        assert_eq!(resolve_cached(&cache, 7, || panic!("must not read")), 7);
    }

    #[test]
    fn default_tag_is_gme() {
        assert_eq!(DEFAULT_LOG_TAG.to_bytes(), b"GME");
    }
}
