use crate::call::Call;
use crate::domain::{normalize_dialstring, CallAction, InteractionDirection, InteractionId, Presence};
use crate::dto::DeskView;
use crate::error::CoreError;
use crate::event::{ChannelEvent, EventSink};
use crate::simulator::CallSimulator;
use crate::timer::ManualScheduler;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, trace};

pub const REASON_RECEIVING: &str = "Receiving a Call";
pub const REASON_DIALING: &str = "Making a Call";
pub const REASON_DROPPED: &str = "Call Dropped";

/// How a user action picks its call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CallRef {
    /// The most recently created call still on the desk.
    #[default]
    Latest,
    /// 1-based position in creation order, written `#2`.
    Position(usize),
    Id(InteractionId),
}

impl FromStr for CallRef {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(CallRef::Latest);
        }
        if let Some(rest) = trimmed.strip_prefix('#') {
            return match rest.parse::<usize>() {
                Ok(n) if n > 0 => Ok(CallRef::Position(n)),
                _ => Err(CoreError::CallNotFound(trimmed.to_string())),
            };
        }
        Ok(CallRef::Id(InteractionId::new(trimmed)))
    }
}

impl fmt::Display for CallRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallRef::Latest => f.write_str("latest call"),
            CallRef::Position(n) => write!(f, "#{n}"),
            CallRef::Id(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SoftphoneOptions {
    pub initial_presence: Presence,
    pub phone_numbers: Vec<String>,
}

/// The hosting desk: agent presence, the list of live calls, the shared
/// scheduler and the outbound event sink. Each call keeps its own state and
/// clock; the desk only routes actions and ticks to the right one.
pub struct Softphone<S: EventSink> {
    presence: Presence,
    presence_reason: Option<String>,
    calls: Vec<Call>,
    scheduler: ManualScheduler,
    simulator: CallSimulator,
    sink: S,
}

impl<S: EventSink> Softphone<S> {
    pub fn new(options: SoftphoneOptions, sink: S) -> Self {
        Self {
            presence: options.initial_presence,
            presence_reason: None,
            calls: Vec::new(),
            scheduler: ManualScheduler::new(),
            simulator: CallSimulator::new(options.phone_numbers),
            sink,
        }
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn presence_reason(&self) -> Option<&str> {
        self.presence_reason.as_deref()
    }

    /// Records a presence pushed by the presence system. Not echoed back.
    pub fn presence_changed(&mut self, presence: Presence, reason: Option<String>) {
        match &reason {
            Some(reason) => info!(presence = %presence, reason = %reason, "presence changed"),
            None => info!(presence = %presence, "presence changed"),
        }
        self.presence = presence;
        self.presence_reason = reason;
    }

    /// Changes presence locally and publishes it.
    pub fn set_presence(&mut self, presence: Presence, reason: Option<String>) {
        self.presence = presence.clone();
        self.presence_reason = reason.clone();
        self.sink
            .emit(ChannelEvent::PresenceChanged { presence, reason });
    }

    pub fn incoming_call(&mut self) -> Result<InteractionId, CoreError> {
        self.ensure_accepting()?;
        self.set_presence(Presence::NotReady, Some(REASON_RECEIVING.to_string()));
        let simulated = self.simulator.new_call();
        self.open_call(simulated.id, InteractionDirection::Inbound, simulated.number)
    }

    pub fn click_to_dial(&mut self, phone: &str) -> Result<InteractionId, CoreError> {
        self.ensure_accepting()?;
        let number = normalize_dialstring(phone)?;
        info!(number = %number, "calling");
        self.set_presence(Presence::NotReady, Some(REASON_DIALING.to_string()));
        let simulated = self.simulator.new_outbound_call(&number);
        self.open_call(simulated.id, InteractionDirection::Outbound, simulated.number)
    }

    pub fn next_phone_number(&mut self) -> String {
        let number = self.simulator.next_phone_number();
        debug!(skipped = %number, next = %self.simulator.peek_phone_number(), "next phone number");
        number
    }

    pub fn answer(&mut self, call: &CallRef) -> Result<InteractionId, CoreError> {
        self.perform(CallAction::Answer, call)
    }

    pub fn hold(&mut self, call: &CallRef) -> Result<InteractionId, CoreError> {
        self.perform(CallAction::Hold, call)
    }

    pub fn unhold(&mut self, call: &CallRef) -> Result<InteractionId, CoreError> {
        self.perform(CallAction::Unhold, call)
    }

    pub fn end(&mut self, call: &CallRef) -> Result<InteractionId, CoreError> {
        self.perform(CallAction::End, call)
    }

    /// Routes `action` to one call. Ending a call also drops it from the desk
    /// and puts the agent back to `Ready`.
    pub fn perform(&mut self, action: CallAction, call: &CallRef) -> Result<InteractionId, CoreError> {
        let idx = self.resolve(call)?;
        let target = &mut self.calls[idx];
        target.perform(action, &mut self.scheduler, &mut self.sink)?;
        let id = target.id().clone();
        if action == CallAction::End {
            self.drop_call(idx);
        }
        Ok(id)
    }

    /// Advances the shared clock and delivers each timer's firings to the
    /// call that owns it. Call timers only count seconds, so firings are
    /// batched per timer. Returns the number of firings applied.
    pub fn advance(&mut self, secs: u64) -> u64 {
        let calls = &mut self.calls;
        let mut applied = 0u64;
        self.scheduler.advance_coalesced(secs, |tick| {
            match calls.iter_mut().find(|call| call.owns_timer(tick.token)) {
                Some(call) => {
                    if call.on_tick(tick) {
                        applied = applied.saturating_add(tick.count);
                    }
                }
                None => trace!(timer = %tick.token, "tick without owner"),
            }
        });
        applied
    }

    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn active_timers(&self) -> usize {
        self.scheduler.active_count()
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn call(&self, call: &CallRef) -> Result<&Call, CoreError> {
        let idx = self.resolve(call)?;
        Ok(&self.calls[idx])
    }

    pub fn view(&self) -> DeskView {
        DeskView {
            presence: self.presence.clone(),
            presence_reason: self.presence_reason.clone(),
            clock: self.scheduler.now(),
            calls: self.calls.iter().map(Call::view).collect(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn ensure_accepting(&self) -> Result<(), CoreError> {
        if self.presence.is_ready() {
            return Ok(());
        }
        info!(presence = %self.presence, "agent is not accepting calls");
        Err(CoreError::NotAccepting(self.presence.clone()))
    }

    fn open_call(
        &mut self,
        mut id: InteractionId,
        direction: InteractionDirection,
        number: String,
    ) -> Result<InteractionId, CoreError> {
        while self.calls.iter().any(|call| call.id() == &id) {
            debug!(interaction = %id, "id already on the desk, regenerating");
            id = InteractionId::generate();
        }
        let call = Call::create(id, direction, number, &mut self.scheduler, &mut self.sink)?;
        let id = call.id().clone();
        debug!(interaction = %id, direction = direction.as_str(), "new call");
        self.calls.push(call);
        Ok(id)
    }

    fn drop_call(&mut self, idx: usize) {
        let call = self.calls.remove(idx);
        info!(interaction = %call.id(), "dropped call");
        self.set_presence(Presence::Ready, Some(REASON_DROPPED.to_string()));
    }

    fn resolve(&self, call: &CallRef) -> Result<usize, CoreError> {
        let found = match call {
            CallRef::Latest => self.calls.len().checked_sub(1),
            CallRef::Position(n) => n.checked_sub(1).filter(|idx| *idx < self.calls.len()),
            CallRef::Id(id) => self.calls.iter().position(|c| c.id() == id),
        };
        found.ok_or_else(|| CoreError::CallNotFound(call.to_string()))
    }
}
