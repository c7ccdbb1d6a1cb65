use serde::{Deserialize, Serialize};

/// Submission gating dial.
///
/// The applicant review page historically let a financials section with no entries through
/// as a warning while broker pages blocked it; the strict reading is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessPolicy {
    pub allow_warning_sections: bool,
}

impl CompletenessPolicy {
    pub const fn strict() -> Self {
        Self {
            allow_warning_sections: false,
        }
    }

    pub const fn lenient() -> Self {
        Self {
            allow_warning_sections: true,
        }
    }
}
