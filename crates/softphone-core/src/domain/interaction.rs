use crate::domain::ids::InteractionId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionDirection {
    Inbound,
    Outbound,
}

impl InteractionDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            InteractionDirection::Inbound => "inbound",
            InteractionDirection::Outbound => "outbound",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    #[default]
    Telephony,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    Alerting,
    Connected,
    OnHold,
    Disconnected,
}

impl InteractionState {
    pub const fn label(self) -> &'static str {
        match self {
            InteractionState::Alerting => "Alerting",
            InteractionState::Connected => "Connected",
            InteractionState::OnHold => "OnHold",
            InteractionState::Disconnected => "Disconnected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, InteractionState::Disconnected)
    }
}

impl fmt::Display for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A user-facing request against one interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallAction {
    Answer,
    Hold,
    Unhold,
    End,
}

impl CallAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            CallAction::Answer => "answer",
            CallAction::Hold => "hold",
            CallAction::Unhold => "unhold",
            CallAction::End => "end",
        }
    }

    /// Target state when `action` is legal from `from`.
    pub const fn target(self, from: InteractionState) -> Option<InteractionState> {
        match (self, from) {
            (CallAction::Answer, InteractionState::Alerting) => Some(InteractionState::Connected),
            (CallAction::Hold, InteractionState::Connected) => Some(InteractionState::OnHold),
            (CallAction::Unhold, InteractionState::OnHold) => Some(InteractionState::Connected),
            (CallAction::End, InteractionState::Disconnected) => None,
            (CallAction::End, _) => Some(InteractionState::Disconnected),
            _ => None,
        }
    }
}

impl fmt::Display for CallAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionDetails {
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,
    pub direction: InteractionDirection,
    pub channel_type: ChannelType,
    pub state: InteractionState,
    pub details: InteractionDetails,
}

impl Interaction {
    pub fn phone_number(&self) -> &str {
        &self.details.phone_number
    }
}
