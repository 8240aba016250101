use crate::domain::{InteractionId, Presence};
use crate::dto::InteractionSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChannelEvent {
    InteractionChanged(InteractionSnapshot),
    CallEnded {
        interaction_id: InteractionId,
    },
    PresenceChanged {
        presence: Presence,
        reason: Option<String>,
    },
}

/// Receiver for everything the core reports outward.
pub trait EventSink {
    fn emit(&mut self, event: ChannelEvent);
}

impl EventSink for Vec<ChannelEvent> {
    fn emit(&mut self, event: ChannelEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: ChannelEvent) {
        (**self).emit(event);
    }
}
