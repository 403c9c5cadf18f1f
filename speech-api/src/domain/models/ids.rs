use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a persisted speech.
///
/// Wraps i64 to match the database BIGSERIAL type. Assigned by the
/// repository on first save and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeechId(i64);

impl SpeechId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SpeechId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SpeechId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<SpeechId> for i64 {
    fn from(id: SpeechId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_number() {
        let id = SpeechId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");

        let parsed: SpeechId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, SpeechId::new(7));
    }
}
