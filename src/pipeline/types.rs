//! Shared status type for stage payloads.

use serde::Serialize;
use std::fmt;

/// Outcome of one pipeline stage as recorded in its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Success,
    /// The input was blank; the payload holds placeholders.
    EmptyInput,
    /// The stage failed; the payload holds defaults plus the error message.
    Error,
}

impl StageStatus {
    pub fn is_success(self) -> bool {
        self == StageStatus::Success
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StageStatus::Success => "success",
            StageStatus::EmptyInput => "empty_input",
            StageStatus::Error => "error",
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
