use crate::clock::{format_duration, CallClock, HoldInterval};
use crate::domain::{
    CallAction, ChannelType, InteractionDirection, InteractionId, InteractionState,
};
use crate::dto::{CallView, InteractionSnapshot};
use crate::error::CoreError;
use crate::event::{ChannelEvent, EventSink};
use crate::machine::InteractionStateMachine;
use crate::timer::{Tick, TimerService, TimerToken};

/// One interaction paired with its clock. Every transition is validated by
/// the state machine before the clock is touched, so a rejected action never
/// changes either half.
#[derive(Debug, Clone)]
pub struct Call {
    machine: InteractionStateMachine,
    clock: CallClock,
}

impl Call {
    pub fn create(
        id: InteractionId,
        direction: InteractionDirection,
        phone_number: impl Into<String>,
        timers: &mut dyn TimerService,
        sink: &mut dyn EventSink,
    ) -> Result<Self, CoreError> {
        let machine =
            InteractionStateMachine::create(id, direction, ChannelType::Telephony, phone_number);
        let mut clock = CallClock::new();
        clock.start(timers)?;
        let call = Self { machine, clock };
        call.notify_changed(sink);
        Ok(call)
    }

    pub fn answer(&mut self, sink: &mut dyn EventSink) -> Result<(), CoreError> {
        self.machine.answer()?;
        self.notify_changed(sink);
        Ok(())
    }

    pub fn hold(
        &mut self,
        timers: &mut dyn TimerService,
        sink: &mut dyn EventSink,
    ) -> Result<(), CoreError> {
        self.machine.check(CallAction::Hold)?;
        self.clock.open_hold(timers)?;
        self.machine.hold()?;
        self.notify_changed(sink);
        Ok(())
    }

    pub fn unhold(
        &mut self,
        timers: &mut dyn TimerService,
        sink: &mut dyn EventSink,
    ) -> Result<HoldInterval, CoreError> {
        self.machine.check(CallAction::Unhold)?;
        let interval = self.clock.close_hold(timers)?;
        self.machine.unhold()?;
        self.notify_changed(sink);
        Ok(interval)
    }

    /// Disconnects the call, freezes the clock and announces the end.
    pub fn end(
        &mut self,
        timers: &mut dyn TimerService,
        sink: &mut dyn EventSink,
    ) -> Result<(), CoreError> {
        self.machine.check(CallAction::End)?;
        match self.clock.stop(timers) {
            Ok(()) | Err(CoreError::ClockNotRunning) => {}
            Err(err) => return Err(err),
        }
        self.machine.end()?;
        self.notify_changed(sink);
        sink.emit(ChannelEvent::CallEnded {
            interaction_id: self.id().clone(),
        });
        Ok(())
    }

    pub fn perform(
        &mut self,
        action: CallAction,
        timers: &mut dyn TimerService,
        sink: &mut dyn EventSink,
    ) -> Result<(), CoreError> {
        match action {
            CallAction::Answer => self.answer(sink),
            CallAction::Hold => self.hold(timers, sink),
            CallAction::Unhold => self.unhold(timers, sink).map(|_| ()),
            CallAction::End => self.end(timers, sink),
        }
    }

    pub fn on_tick(&mut self, tick: Tick) -> bool {
        self.clock.on_tick(tick)
    }

    pub fn owns_timer(&self, token: TimerToken) -> bool {
        self.clock.owns(token)
    }

    pub fn id(&self) -> &InteractionId {
        self.machine.id()
    }

    pub fn state(&self) -> InteractionState {
        self.machine.state()
    }

    pub fn state_label(&self) -> &'static str {
        self.machine.state_label()
    }

    pub fn machine(&self) -> &InteractionStateMachine {
        &self.machine
    }

    pub fn clock(&self) -> &CallClock {
        &self.clock
    }

    pub fn elapsed_display(&self) -> String {
        format_duration(self.clock.elapsed_seconds())
    }

    /// Live hold total while held, otherwise the completed total.
    pub fn hold_display(&self) -> String {
        if self.clock.is_holding() {
            format_duration(self.clock.running_hold_seconds())
        } else {
            format_duration(self.clock.total_hold_seconds())
        }
    }

    pub fn snapshot(&self) -> InteractionSnapshot {
        let interaction = self.machine.interaction();
        InteractionSnapshot {
            interaction_id: interaction.id.clone(),
            direction: interaction.direction,
            state: interaction.state,
            channel_type: interaction.channel_type,
            details: interaction.details.clone(),
            elapsed_seconds: self.clock.elapsed_seconds(),
            total_hold_seconds: self.clock.total_hold_seconds(),
        }
    }

    pub fn view(&self) -> CallView {
        let interaction = self.machine.interaction();
        CallView {
            id: interaction.id.clone(),
            phone_number: interaction.phone_number().to_string(),
            direction: interaction.direction,
            state: self.state_label().to_string(),
            elapsed: self.elapsed_display(),
            hold: self.hold_display(),
            elapsed_seconds: self.clock.elapsed_seconds(),
            total_hold_seconds: self.clock.total_hold_seconds(),
            hold_intervals: self.clock.hold_intervals().to_vec(),
        }
    }

    fn notify_changed(&self, sink: &mut dyn EventSink) {
        sink.emit(ChannelEvent::InteractionChanged(self.snapshot()));
    }
}
