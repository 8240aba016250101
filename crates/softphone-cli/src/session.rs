use crate::script::ScriptCommand;
use softphone_core::{ChannelEvent, CoreError, Softphone};
use std::mem;

pub type Desk = Softphone<Vec<ChannelEvent>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Note(String),
    Status,
    Quit,
}

/// Applies one command to the desk. Errors are recoverable rejections; the
/// desk is unchanged when one is returned.
pub fn execute(desk: &mut Desk, command: &ScriptCommand) -> Result<Outcome, CoreError> {
    match command {
        ScriptCommand::Presence(presence, reason) => {
            desk.presence_changed(presence.clone(), reason.clone());
            Ok(Outcome::Note(match reason {
                Some(reason) => format!("presence is {presence} ({reason})"),
                None => format!("presence is {presence}"),
            }))
        }
        ScriptCommand::Incoming => {
            let id = desk.incoming_call()?;
            Ok(Outcome::Note(format!("new call {id}")))
        }
        ScriptCommand::Dial(number) => {
            let id = desk.click_to_dial(number)?;
            Ok(Outcome::Note(format!("calling {number} as {id}")))
        }
        ScriptCommand::NextNumber => {
            let skipped = desk.next_phone_number();
            Ok(Outcome::Note(format!("skipped {skipped}")))
        }
        ScriptCommand::Action(action, call) => {
            desk.perform(*action, call)?;
            Ok(Outcome::Done)
        }
        ScriptCommand::Wait(secs) => {
            desk.advance(*secs);
            Ok(Outcome::Done)
        }
        ScriptCommand::Status => Ok(Outcome::Status),
        ScriptCommand::Quit => Ok(Outcome::Quit),
    }
}

pub fn drain_events(desk: &mut Desk) -> Vec<ChannelEvent> {
    mem::take(desk.sink_mut())
}

#[cfg(test)]
mod tests {
    use super::{drain_events, execute, Desk, Outcome};
    use crate::script::ScriptCommand;
    use softphone_core::{
        CallAction, CallRef, CoreError, InteractionState, Presence, Softphone, SoftphoneOptions,
    };

    fn desk() -> Desk {
        Softphone::new(SoftphoneOptions::default(), Vec::new())
    }

    #[test]
    fn presence_command_enables_calls() {
        let mut desk = desk();
        assert!(matches!(
            execute(&mut desk, &ScriptCommand::Incoming),
            Err(CoreError::NotAccepting(_))
        ));
        execute(&mut desk, &ScriptCommand::Presence(Presence::Ready, None)).unwrap();
        let outcome = execute(&mut desk, &ScriptCommand::Incoming).unwrap();
        assert!(matches!(outcome, Outcome::Note(note) if note.starts_with("new call Call-")));
        assert_eq!(desk.calls().len(), 1);
    }

    #[test]
    fn wait_advances_the_desk_clock() {
        let mut desk = desk();
        execute(&mut desk, &ScriptCommand::Presence(Presence::Ready, None)).unwrap();
        execute(&mut desk, &ScriptCommand::Incoming).unwrap();
        execute(
            &mut desk,
            &ScriptCommand::Action(CallAction::Answer, CallRef::Latest),
        )
        .unwrap();
        execute(&mut desk, &ScriptCommand::Wait(9)).unwrap();

        assert_eq!(desk.now(), 9);
        let call = &desk.calls()[0];
        assert_eq!(call.state(), InteractionState::Connected);
        assert_eq!(call.elapsed_display(), "00m09s");
    }

    #[test]
    fn drain_empties_the_sink() {
        let mut desk = desk();
        execute(&mut desk, &ScriptCommand::Presence(Presence::Ready, None)).unwrap();
        execute(&mut desk, &ScriptCommand::Incoming).unwrap();
        assert_eq!(drain_events(&mut desk).len(), 2);
        assert!(drain_events(&mut desk).is_empty());
    }
}
