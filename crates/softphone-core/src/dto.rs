use crate::clock::HoldInterval;
use crate::domain::{
    ChannelType, InteractionDetails, InteractionDirection, InteractionId, InteractionState,
    Presence,
};
use serde::{Deserialize, Serialize};

/// Full interaction state as forwarded to the presence/telephony system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionSnapshot {
    pub interaction_id: InteractionId,
    pub direction: InteractionDirection,
    pub state: InteractionState,
    pub channel_type: ChannelType,
    pub details: InteractionDetails,
    pub elapsed_seconds: u64,
    pub total_hold_seconds: u64,
}

/// Display projection of a live call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallView {
    pub id: InteractionId,
    pub phone_number: String,
    pub direction: InteractionDirection,
    pub state: String,
    pub elapsed: String,
    pub hold: String,
    pub elapsed_seconds: u64,
    pub total_hold_seconds: u64,
    pub hold_intervals: Vec<HoldInterval>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskView {
    pub presence: Presence,
    pub presence_reason: Option<String>,
    pub clock: u64,
    pub calls: Vec<CallView>,
}
