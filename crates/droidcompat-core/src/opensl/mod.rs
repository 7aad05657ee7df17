//! OpenSL ES engine model.
//!
//! The host has no audio stack. `slCreateEngine` hands out one shared static
//! object; every operation past construction reports
//! [`SL_RESULT_FEATURE_UNSUPPORTED`] so the module falls back to its
//! network-only path. This module is the pure answer table the exported
//! dispatch entries consult.

/// `SLresult`.
pub type SlResult = u32;

pub const SL_RESULT_SUCCESS: SlResult = 0x00;
pub const SL_RESULT_FEATURE_UNSUPPORTED: SlResult = 0x0C;

/// Value written through `GetState`'s out-parameter. Zero is not a valid
/// OpenSL state, which keeps callers off the "realized" path.
pub const REPORTED_STATE: u32 = 0;

/// Number of engine interfaces `slQueryNumSupportedEngineInterfaces` reports.
pub const SUPPORTED_ENGINE_INTERFACES: u32 = 0;

/// Operations reachable through the engine handle, in dispatch-table order
/// after `Create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOp {
    Create,
    Realize,
    Resume,
    GetState,
    GetInterface,
    Destroy,
}

impl EngineOp {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Create => "slCreateEngine",
            Self::Realize => "Realize",
            Self::Resume => "Resume",
            Self::GetState => "GetState",
            Self::GetInterface => "GetInterface",
            Self::Destroy => "Destroy",
        }
    }

    /// Whether the entry point announces itself when tracing is enabled.
    #[must_use]
    pub const fn traced(self) -> bool {
        matches!(self, Self::Create | Self::Realize | Self::GetInterface)
    }
}

/// Answer for `op`. The engine holds no resource, so every call is
/// independent of what any caller did before it. `None` for `Destroy`,
/// which returns `void`.
#[must_use]
pub const fn respond(op: EngineOp) -> Option<SlResult> {
    match op {
        EngineOp::Create => Some(SL_RESULT_SUCCESS),
        EngineOp::Destroy => None,
        EngineOp::Realize | EngineOp::Resume | EngineOp::GetState | EngineOp::GetInterface => {
            Some(SL_RESULT_FEATURE_UNSUPPORTED)
        }
    }
}

/// One-line stderr notice for a traced entry point.
#[must_use]
pub fn notice(op: EngineOp) -> Option<String> {
    if !op.traced() {
        return None;
    }
    Some(match op {
        EngineOp::Create => "[OpenSL stub] slCreateEngine called - returning stub object\n".to_owned(),
        other => format!("[OpenSL stub] {} called - returning unsupported\n", other.name()),
    })
}

/// Interface identifiers exported as `SL_IID_*`.
pub const INTERFACE_IDS: [&str; 11] = [
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

#[cfg(test)]
mod tests {
    use super::*;

    const SLOTS: [EngineOp; 5] = [
        EngineOp::Realize,
        EngineOp::Resume,
        EngineOp::GetState,
        EngineOp::GetInterface,
        EngineOp::Destroy,
    ];

    #[test]
    fn create_succeeds() {
        assert_eq!(respond(EngineOp::Create), Some(SL_RESULT_SUCCESS));
    }

    #[test]
    fn every_slot_past_create_is_unsupported_except_destroy() {
        for op in SLOTS {
            if op == EngineOp::Destroy {
                assert_eq!(respond(op), None);
            } else {
                assert_eq!(respond(op), Some(SL_RESULT_FEATURE_UNSUPPORTED), "{}", op.name());
            }
        }
    }

    #[test]
    fn answers_do_not_depend_on_earlier_calls() {
        let before = SLOTS.map(respond);
        let _ = respond(EngineOp::Destroy);
        let _ = respond(EngineOp::Create);
        assert_eq!(SLOTS.map(respond), before);
    }

    #[test]
    fn unsupported_code_is_0x0c() {
        assert_eq!(SL_RESULT_FEATURE_UNSUPPORTED, 0x0C);
    }

    #[test]
    fn notices_match_traced_ops() {
        assert_eq!(
            notice(EngineOp::Realize).as_deref(),
            Some("[OpenSL stub] Realize called - returning unsupported\n")
        );
        assert!(notice(EngineOp::Create).unwrap().contains("stub object"));
        assert!(notice(EngineOp::Resume).is_none());
        assert!(notice(EngineOp::Destroy).is_none());
    }

    #[test]
    fn interface_names_are_unique() {
        let mut names = INTERFACE_IDS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), INTERFACE_IDS.len());
    }
}
