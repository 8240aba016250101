use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

const READY: &str = "Ready";
const NOT_READY: &str = "Not Ready";

/// Agent availability as exchanged with the presence system. Only `Ready`
/// accepts new calls; any other label is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Presence {
    Ready,
    #[default]
    NotReady,
    Other(String),
}

impl Presence {
    pub fn parse(label: &str) -> Result<Self, CoreError> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidPresence);
        }
        let folded = trimmed.to_ascii_lowercase().replace(['-', '_'], " ");
        Ok(match folded.as_str() {
            "ready" => Presence::Ready,
            "not ready" | "notready" => Presence::NotReady,
            _ => Presence::Other(trimmed.to_string()),
        })
    }

    pub fn label(&self) -> &str {
        match self {
            Presence::Ready => READY,
            Presence::NotReady => NOT_READY,
            Presence::Other(label) => label,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Presence::Ready)
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Presence> for String {
    fn from(value: Presence) -> Self {
        value.label().to_string()
    }
}

impl TryFrom<String> for Presence {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Presence::parse(&value)
    }
}
