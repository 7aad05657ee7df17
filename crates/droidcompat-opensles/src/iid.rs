//! `SL_IID_*` interface identifiers.
//!
//! Each identifier is an exported pointer to its own static record. Callers
//! only compare the pointers, so the record contents carry no meaning here
//! beyond a sequence number.

/// `struct SLInterfaceID_`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceIdData {
    pub time_low: u32,
    pub time_mid: u16,
    pub time_hi_and_version: u16,
    pub clock_seq: u16,
    pub node: [u8; 6],
}

impl InterfaceIdData {
    const fn numbered(seq: u32) -> Self {
        Self {
            time_low: seq,
            time_mid: 0,
            time_hi_and_version: 0,
            clock_seq: 0,
            node: *b"droid\0",
        }
    }
}

/// `SLInterfaceID`.
pub type InterfaceId = *const InterfaceIdData;

/// Exported `SL_IID_*` value: a pointer to immutable static data.
#[repr(transparent)]
#[derive(Debug)]
pub struct InterfaceIdRef(pub InterfaceId);

// SAFETY: points at immutable statics.
unsafe impl Sync for InterfaceIdRef {}

macro_rules! interface_ids {
    ($($name:ident = $seq:literal;)*) => {
        $(
            #[unsafe(no_mangle)]
            pub static $name: InterfaceIdRef = {
                static DATA: InterfaceIdData = InterfaceIdData::numbered($seq);
                InterfaceIdRef(&DATA)
            };
        )*

        /// Every exported identifier with its symbol name.
        #[must_use]
        pub fn exported() -> Vec<(&'static str, InterfaceId)> {
            vec![$((stringify!($name), $name.0)),*]
        }
    };
}

interface_ids! {
    SL_IID_NULL = 0;
    SL_IID_OBJECT = 1;
    SL_IID_ENGINE = 2;
    SL_IID_PLAY = 3;
    SL_IID_RECORD = 4;
    SL_IID_BUFFERQUEUE = 5;
    SL_IID_VOLUME = 6;
    SL_IID_OUTPUTMIX = 7;
    SL_IID_ANDROIDSIMPLEBUFFERQUEUE = 8;
    SL_IID_ANDROIDBUFFERQUEUESOURCE = 9;
    SL_IID_ANDROIDCONFIGURATION = 10;
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidcompat_core::opensl::INTERFACE_IDS;
    use std::collections::HashSet;

    #[test]
    fn names_match_the_model() {
        let names: Vec<_> = exported().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, INTERFACE_IDS);
    }

    #[test]
    fn addresses_are_distinct_and_non_null() {
        let ids = exported();
        let unique: HashSet<usize> = ids.iter().map(|(_, p)| *p as usize).collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.iter().all(|(_, p)| !p.is_null()));
    }

    #[test]
    fn records_are_readable() {
        // SAFETY: every identifier points at a static record.
        let engine = unsafe { *SL_IID_ENGINE.0 };
        assert_eq!(engine.time_low, 2);
    }
}
