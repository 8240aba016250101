use crate::domain::{
    CallAction, ChannelType, Interaction, InteractionDetails, InteractionDirection,
    InteractionId, InteractionState,
};
use crate::error::CoreError;
use tracing::{debug, warn};

/// Guards and records the state of one interaction. Disallowed transitions
/// are reported and leave the state untouched.
#[derive(Debug, Clone)]
pub struct InteractionStateMachine {
    interaction: Interaction,
}

impl InteractionStateMachine {
    pub fn create(
        id: InteractionId,
        direction: InteractionDirection,
        channel_type: ChannelType,
        phone_number: impl Into<String>,
    ) -> Self {
        let phone_number = phone_number.into();
        if phone_number.trim().is_empty() {
            warn!(interaction = %id, "interaction created without a phone number");
        }
        Self {
            interaction: Interaction {
                id,
                direction,
                channel_type,
                state: InteractionState::Alerting,
                details: InteractionDetails { phone_number },
            },
        }
    }

    pub fn answer(&mut self) -> Result<InteractionState, CoreError> {
        self.apply(CallAction::Answer)
    }

    pub fn hold(&mut self) -> Result<InteractionState, CoreError> {
        self.apply(CallAction::Hold)
    }

    pub fn unhold(&mut self) -> Result<InteractionState, CoreError> {
        self.apply(CallAction::Unhold)
    }

    pub fn end(&mut self) -> Result<InteractionState, CoreError> {
        self.apply(CallAction::End)
    }

    /// Checks `action` against the current state without applying it.
    pub fn check(&self, action: CallAction) -> Result<InteractionState, CoreError> {
        let from = self.interaction.state;
        match action.target(from) {
            Some(to) => Ok(to),
            None => {
                warn!(
                    interaction = %self.interaction.id,
                    action = %action,
                    state = %from,
                    "transition rejected"
                );
                Err(CoreError::InvalidTransition { action, from })
            }
        }
    }

    /// Applies `action` and returns the new state.
    pub fn apply(&mut self, action: CallAction) -> Result<InteractionState, CoreError> {
        let to = self.check(action)?;
        debug!(
            interaction = %self.interaction.id,
            from = %self.interaction.state,
            to = %to,
            "transition"
        );
        self.interaction.state = to;
        Ok(to)
    }

    pub fn state(&self) -> InteractionState {
        self.interaction.state
    }

    pub fn state_label(&self) -> &'static str {
        self.interaction.state.label()
    }

    pub fn is_terminal(&self) -> bool {
        self.interaction.state.is_terminal()
    }

    pub fn id(&self) -> &InteractionId {
        &self.interaction.id
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }
}

#[cfg(test)]
mod tests {
    use super::InteractionStateMachine;
    use crate::domain::{
        CallAction, ChannelType, InteractionDirection, InteractionId, InteractionState,
    };
    use crate::error::CoreError;

    fn machine() -> InteractionStateMachine {
        InteractionStateMachine::create(
            InteractionId::new("Call-1"),
            InteractionDirection::Inbound,
            ChannelType::Telephony,
            "1234567890",
        )
    }

    #[test]
    fn create_starts_alerting() {
        let machine = machine();
        assert_eq!(machine.state(), InteractionState::Alerting);
        assert_eq!(machine.state_label(), "Alerting");
        assert_eq!(machine.interaction().phone_number(), "1234567890");
    }

    #[test]
    fn empty_phone_number_is_allowed() {
        let machine = InteractionStateMachine::create(
            InteractionId::new("Call-2"),
            InteractionDirection::Outbound,
            ChannelType::Telephony,
            "",
        );
        assert_eq!(machine.state(), InteractionState::Alerting);
    }

    #[test]
    fn full_lifecycle_follows_edges() {
        let mut machine = machine();
        assert_eq!(machine.answer().unwrap(), InteractionState::Connected);
        assert_eq!(machine.hold().unwrap(), InteractionState::OnHold);
        assert_eq!(machine.unhold().unwrap(), InteractionState::Connected);
        assert_eq!(machine.end().unwrap(), InteractionState::Disconnected);
        assert!(machine.is_terminal());
    }

    #[test]
    fn alerting_can_end_directly() {
        let mut machine = machine();
        assert_eq!(machine.end().unwrap(), InteractionState::Disconnected);
    }

    #[test]
    fn double_hold_is_inert() {
        let mut machine = machine();
        machine.answer().unwrap();
        machine.hold().unwrap();
        let err = machine.hold().unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidTransition {
                action: CallAction::Hold,
                from: InteractionState::OnHold,
            }
        );
        assert_eq!(machine.state(), InteractionState::OnHold);
    }

    #[test]
    fn answer_is_not_a_resume() {
        let mut machine = machine();
        machine.answer().unwrap();
        machine.hold().unwrap();
        assert!(machine.answer().is_err());
        assert_eq!(machine.state(), InteractionState::OnHold);
    }

    #[test]
    fn disconnected_absorbs_every_action() {
        let mut machine = machine();
        machine.end().unwrap();
        for action in [
            CallAction::Answer,
            CallAction::Hold,
            CallAction::Unhold,
            CallAction::End,
        ] {
            assert!(machine.apply(action).is_err());
            assert_eq!(machine.state(), InteractionState::Disconnected);
        }
    }
}
