use softphone_core::{ChannelEvent, DeskView};

pub fn render_event(event: &ChannelEvent) -> String {
    match event {
        ChannelEvent::InteractionChanged(snapshot) => format!(
            "{} {} {} {}",
            snapshot.interaction_id,
            snapshot.direction.as_str(),
            snapshot.details.phone_number,
            snapshot.state.label()
        ),
        ChannelEvent::CallEnded { interaction_id } => format!("{interaction_id} ended"),
        ChannelEvent::PresenceChanged { presence, reason } => match reason {
            Some(reason) => format!("presence {presence} ({reason})"),
            None => format!("presence {presence}"),
        },
    }
}

pub fn render_status(view: &DeskView) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.calls.len() + 1);
    match &view.presence_reason {
        Some(reason) => lines.push(format!("presence: {} ({})", view.presence, reason)),
        None => lines.push(format!("presence: {}", view.presence)),
    }
    if view.calls.is_empty() {
        lines.push("no calls".to_string());
    }
    for (idx, call) in view.calls.iter().enumerate() {
        lines.push(format!(
            "#{} {} {} {} {} elapsed {} hold {}",
            idx + 1,
            call.id,
            call.direction.as_str(),
            call.phone_number,
            call.state,
            call.elapsed,
            call.hold
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{render_event, render_status};
    use softphone_core::{ChannelEvent, DeskView, InteractionId, Presence};

    #[test]
    fn render_event_describes_end() {
        let event = ChannelEvent::CallEnded {
            interaction_id: InteractionId::new("Call-9"),
        };
        assert_eq!(render_event(&event), "Call-9 ended");
    }

    #[test]
    fn render_status_handles_empty_desk() {
        let view = DeskView {
            presence: Presence::Ready,
            presence_reason: Some("Call Dropped".to_string()),
            clock: 0,
            calls: Vec::new(),
        };
        assert_eq!(
            render_status(&view),
            vec!["presence: Ready (Call Dropped)", "no calls"]
        );
    }
}
