use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::script::parse_script;
use crate::session::{drain_events, execute, Desk, Outcome};
use crate::util::{render_event, render_status};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use softphone_core::{format_duration, ChannelEvent, DeskView, Softphone};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Script file; read from stdin when omitted
    #[arg(long)]
    pub script: Option<PathBuf>,
    /// Stop at the first rejected action
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct TimedEvent {
    pub at: u64,
    #[serde(flatten)]
    pub event: ChannelEvent,
}

#[derive(Debug, Serialize)]
pub struct Rejection {
    pub line: usize,
    pub at: u64,
    pub command: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub events: Vec<TimedEvent>,
    pub rejections: Vec<Rejection>,
    pub final_state: DeskView,
}

pub fn simulate(ctx: &Context<'_>, args: SimulateArgs) -> Result<()> {
    let input = match &args.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("read script {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let lines = parse_script(&input)?;
    if lines.is_empty() {
        return Err(invalid_input("script has no commands"));
    }
    debug!(commands = lines.len(), "script parsed");

    let mut desk: Desk = Softphone::new(ctx.config.softphone_options(), Vec::new());
    let mut events = Vec::new();
    let mut rejections = Vec::new();

    for line in &lines {
        let outcome = execute(&mut desk, &line.command);
        let at = desk.now();
        for event in drain_events(&mut desk) {
            if !ctx.json {
                println!("[{}] {}", format_duration(at), render_event(&event));
            }
            events.push(TimedEvent { at, event });
        }

        match outcome {
            Ok(Outcome::Done) => {}
            Ok(Outcome::Note(note)) => {
                if !ctx.json {
                    println!("[{}] {}", format_duration(at), note);
                }
            }
            Ok(Outcome::Status) => {
                if !ctx.json {
                    for status in render_status(&desk.view()) {
                        println!("[{}] {}", format_duration(at), status);
                    }
                }
            }
            Ok(Outcome::Quit) => break,
            Err(err) => {
                if args.strict {
                    let message = format!("line {}: {}: {}", line.line, line.text, err);
                    return Err(anyhow::Error::new(err).context(message));
                }
                if !ctx.json {
                    println!(
                        "[{}] rejected {}: {}",
                        format_duration(at),
                        line.text,
                        err
                    );
                }
                rejections.push(Rejection {
                    line: line.line,
                    at,
                    command: line.text.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    let report = SimulationReport {
        events,
        rejections,
        final_state: desk.view(),
    };
    if ctx.json {
        print_json(&report)?;
    } else {
        for status in render_status(&report.final_state) {
            println!("[{}] {}", format_duration(report.final_state.clock), status);
        }
    }
    Ok(())
}
