use serde::{Deserialize, Serialize};
use std::fmt;

/// The subset of error conditions surfaced to the client itself. Other
/// rejected-input cases are silent on the wire — they show up only in
/// metrics and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidName,
    Banned,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidName => "invalid_name",
            Self::Banned => "banned",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_snake_case_string() {
        let json = serde_json::to_string(&ErrorCode::InvalidName).unwrap();
        assert_eq!(json, "\"invalid_name\"");
    }
}
