use serde::{Deserialize, Serialize};

/// A name/value configuration pair forwarded verbatim to the engine at load
/// time. The session layer never interprets option semantics; names such as
/// `skip_transcription` are engine conventions, not part of this crate's
/// contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriberOption {
    pub name: String,
    pub value: String,
}

impl TranscriberOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
