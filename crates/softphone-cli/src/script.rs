use crate::error::invalid_input;
use anyhow::{anyhow, Result};
use softphone_core::{CallAction, CallRef, Presence};

/// One line of the softphone command language shared by `simulate` and `live`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Presence(Presence, Option<String>),
    Incoming,
    Dial(String),
    NextNumber,
    Action(CallAction, CallRef),
    Wait(u64),
    Status,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub text: String,
    pub command: ScriptCommand,
}

pub fn parse_script(input: &str) -> Result<Vec<ScriptLine>> {
    let mut out = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let command =
            parse_line(raw).map_err(|err| invalid_input(format!("line {line}: {err}")))?;
        if let Some(command) = command {
            out.push(ScriptLine {
                line,
                text: raw.trim().to_string(),
                command,
            });
        }
    }
    Ok(out)
}

/// Returns `None` for blank lines and `#` comments.
pub fn parse_line(raw: &str) -> Result<Option<ScriptCommand>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (trimmed, ""),
    };
    let rest_opt = (!rest.is_empty()).then(|| rest.to_string());

    let command = match verb.to_ascii_lowercase().as_str() {
        "ready" => ScriptCommand::Presence(Presence::Ready, rest_opt),
        "not-ready" => ScriptCommand::Presence(Presence::NotReady, rest_opt),
        "presence" => {
            if rest.is_empty() {
                return Err(anyhow!("presence requires a label"));
            }
            ScriptCommand::Presence(Presence::parse(rest)?, None)
        }
        "incoming" => ScriptCommand::Incoming,
        "dial" => {
            if rest.is_empty() {
                return Err(anyhow!("dial requires a phone number"));
            }
            ScriptCommand::Dial(rest.to_string())
        }
        "next-number" => ScriptCommand::NextNumber,
        "answer" => ScriptCommand::Action(CallAction::Answer, rest.parse()?),
        "hold" => ScriptCommand::Action(CallAction::Hold, rest.parse()?),
        "unhold" => ScriptCommand::Action(CallAction::Unhold, rest.parse()?),
        "end" | "hangup" => ScriptCommand::Action(CallAction::End, rest.parse()?),
        "wait" => {
            let secs = rest
                .parse::<u64>()
                .map_err(|_| anyhow!("wait requires a whole number of seconds"))?;
            ScriptCommand::Wait(secs)
        }
        "status" => ScriptCommand::Status,
        "quit" | "exit" => ScriptCommand::Quit,
        other => return Err(anyhow!("unknown command: {other}")),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::{parse_line, parse_script, ScriptCommand};
    use softphone_core::{CallAction, CallRef, InteractionId, Presence};

    #[test]
    fn parse_line_skips_blanks_and_comments() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# ring ring").unwrap(), None);
    }

    #[test]
    fn parse_line_reads_actions_with_call_refs() {
        assert_eq!(
            parse_line("hold").unwrap(),
            Some(ScriptCommand::Action(CallAction::Hold, CallRef::Latest))
        );
        assert_eq!(
            parse_line("answer #2").unwrap(),
            Some(ScriptCommand::Action(CallAction::Answer, CallRef::Position(2)))
        );
        assert_eq!(
            parse_line("end Call-42").unwrap(),
            Some(ScriptCommand::Action(
                CallAction::End,
                CallRef::Id(InteractionId::new("Call-42"))
            ))
        );
    }

    #[test]
    fn parse_line_reads_presence_with_reason() {
        assert_eq!(
            parse_line("not-ready Lunch break").unwrap(),
            Some(ScriptCommand::Presence(
                Presence::NotReady,
                Some("Lunch break".to_string())
            ))
        );
        assert_eq!(
            parse_line("presence Training").unwrap(),
            Some(ScriptCommand::Presence(
                Presence::Other("Training".to_string()),
                None
            ))
        );
    }

    #[test]
    fn parse_line_rejects_bad_wait() {
        assert!(parse_line("wait soon").is_err());
        assert!(parse_line("wait").is_err());
        assert_eq!(parse_line("WAIT 15").unwrap(), Some(ScriptCommand::Wait(15)));
    }

    #[test]
    fn parse_script_reports_line_numbers() {
        let err = parse_script("ready\n\nfrobnicate\n").unwrap_err();
        assert!(err.to_string().contains("line 3"));

        let lines = parse_script("ready\n# comment\nincoming\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].line, 3);
        assert_eq!(lines[1].command, ScriptCommand::Incoming);
    }
}
