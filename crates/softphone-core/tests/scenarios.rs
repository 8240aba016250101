use softphone_core::{
    Call, CallAction, ChannelEvent, CoreError, HoldInterval, InteractionDirection, InteractionId,
    InteractionState, ManualScheduler,
};

struct Harness {
    scheduler: ManualScheduler,
    events: Vec<ChannelEvent>,
    call: Call,
}

impl Harness {
    fn new() -> Self {
        let mut scheduler = ManualScheduler::new();
        let mut events = Vec::new();
        let call = Call::create(
            InteractionId::new("Call-100"),
            InteractionDirection::Inbound,
            "3456789012",
            &mut scheduler,
            &mut events,
        )
        .expect("create call");
        Self {
            scheduler,
            events,
            call,
        }
    }

    fn run_until(&mut self, t: u64) {
        let secs = t - self.scheduler.now();
        for tick in self.scheduler.advance(secs) {
            self.call.on_tick(tick);
        }
    }

    fn act(&mut self, action: CallAction) -> Result<(), CoreError> {
        self.call
            .perform(action, &mut self.scheduler, &mut self.events)
    }
}

#[test]
fn scenario_hold_accumulates_fifteen_seconds() {
    let mut h = Harness::new();
    h.act(CallAction::Answer).expect("answer");
    h.run_until(10);
    h.act(CallAction::Hold).expect("hold");
    h.run_until(25);
    h.act(CallAction::Unhold).expect("unhold");

    assert_eq!(h.call.clock().total_hold_seconds(), 15);
    assert_eq!(h.call.state(), InteractionState::Connected);
}

#[test]
fn scenario_hold_before_answer_is_rejected() {
    let mut h = Harness::new();
    let err = h.act(CallAction::Hold).unwrap_err();
    assert_eq!(
        err,
        CoreError::InvalidTransition {
            action: CallAction::Hold,
            from: InteractionState::Alerting,
        }
    );
    assert_eq!(h.call.state(), InteractionState::Alerting);
    assert_eq!(h.call.state_label(), "Alerting");
}

#[test]
fn scenario_end_freezes_clock_and_rejects_hold() {
    let mut h = Harness::new();
    h.act(CallAction::Answer).expect("answer");
    h.run_until(12);
    h.act(CallAction::End).expect("end");
    assert_eq!(h.call.state(), InteractionState::Disconnected);

    assert!(h.act(CallAction::Hold).is_err());
    h.run_until(40);
    assert_eq!(h.call.clock().elapsed_seconds(), 12);
    assert_eq!(h.scheduler.active_count(), 0);
}

#[test]
fn scenario_two_hold_cycles_record_two_intervals() {
    let mut h = Harness::new();
    h.act(CallAction::Answer).expect("answer");
    h.run_until(3);
    h.act(CallAction::Hold).expect("hold");
    h.run_until(8);
    h.act(CallAction::Unhold).expect("unhold");
    h.run_until(20);
    h.act(CallAction::Hold).expect("hold");
    h.run_until(21);
    h.act(CallAction::Unhold).expect("unhold");

    assert_eq!(
        h.call.clock().hold_intervals(),
        &[
            HoldInterval { start: 3, end: 8 },
            HoldInterval { start: 20, end: 21 },
        ]
    );
    assert_eq!(h.call.clock().total_hold_seconds(), 6);
}

#[test]
fn total_hold_is_sum_of_cycles() {
    let mut h = Harness::new();
    h.act(CallAction::Answer).expect("answer");
    let cycles = [(2, 9), (11, 12), (30, 95), (100, 160)];
    for (open, close) in cycles {
        h.run_until(open);
        h.act(CallAction::Hold).expect("hold");
        h.run_until(close);
        h.act(CallAction::Unhold).expect("unhold");
    }
    let expected: u64 = cycles.iter().map(|(open, close)| close - open).sum();
    assert_eq!(h.call.clock().total_hold_seconds(), expected);
    assert_eq!(h.call.clock().hold_intervals().len(), cycles.len());
    assert_eq!(h.call.hold_display(), "02m13s");
}

#[test]
fn every_action_sequence_stays_on_legal_edges() {
    let actions = [
        CallAction::Answer,
        CallAction::Hold,
        CallAction::Unhold,
        CallAction::End,
    ];
    // All sequences of length 4 over the four actions.
    for n in 0..actions.len().pow(4) {
        let mut h = Harness::new();
        let mut code = n;
        for _ in 0..4 {
            let action = actions[code % actions.len()];
            code /= actions.len();

            let before = h.call.state();
            let open_before = h.call.clock().is_holding();
            match h.act(action) {
                Ok(()) => assert_eq!(action.target(before), Some(h.call.state())),
                Err(err) => {
                    assert!(err.is_rejected_action());
                    assert_eq!(h.call.state(), before);
                    assert_eq!(h.call.clock().is_holding(), open_before);
                }
            }
            assert_eq!(
                h.call.clock().is_holding(),
                h.call.state() == InteractionState::OnHold
            );
            h.run_until(h.scheduler.now() + 2);
        }
    }
}

#[test]
fn every_accepted_transition_is_announced() {
    let mut h = Harness::new();
    h.act(CallAction::Answer).expect("answer");
    h.act(CallAction::Hold).expect("hold");
    let _ = h.act(CallAction::Hold);
    h.act(CallAction::End).expect("end");

    let states: Vec<InteractionState> = h
        .events
        .iter()
        .filter_map(|event| match event {
            ChannelEvent::InteractionChanged(snapshot) => Some(snapshot.state),
            _ => None,
        })
        .collect();
    assert_eq!(
        states,
        vec![
            InteractionState::Alerting,
            InteractionState::Connected,
            InteractionState::OnHold,
            InteractionState::Disconnected,
        ]
    );
    assert!(matches!(h.events.last(), Some(ChannelEvent::CallEnded { .. })));
}

#[test]
fn snapshot_serializes_for_the_presence_system() {
    let mut h = Harness::new();
    h.act(CallAction::Answer).expect("answer");
    let value = serde_json::to_value(ChannelEvent::InteractionChanged(h.call.snapshot()))
        .expect("serialize");
    assert_eq!(value["event"], "interaction_changed");
    assert_eq!(value["state"], "connected");
    assert_eq!(value["channel_type"], "telephony");
    assert_eq!(value["details"]["phone_number"], "3456789012");
}
