use crate::commands::{print_json, Context};
use crate::script::{parse_line, ScriptCommand};
use crate::session::{drain_events, execute, Desk, Outcome};
use crate::util::{render_event, render_status};
use anyhow::Result;
use clap::Args;
use softphone_core::time::{format_timestamp_time, now_utc};
use softphone_core::Softphone;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Args)]
pub struct LiveArgs {
    /// Print the desk status after every second
    #[arg(long)]
    pub watch: bool,
}

/// Reads commands from stdin while a one-second ticker drives every call
/// clock in real time. Only the main thread touches the desk; the reader
/// thread just forwards lines.
pub fn live(ctx: &Context<'_>, args: LiveArgs) -> Result<()> {
    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut desk: Desk = Softphone::new(ctx.config.softphone_options(), Vec::new());
    let started = Instant::now();
    let mut applied_secs = 0u64;

    loop {
        let elapsed = started.elapsed().as_secs();
        if elapsed > applied_secs {
            desk.advance(elapsed - applied_secs);
            applied_secs = elapsed;
            if args.watch {
                print_status(ctx, &desk)?;
            }
        }

        let next_tick = Duration::from_secs(applied_secs + 1).saturating_sub(started.elapsed());
        let raw = match rx.recv_timeout(next_tick) {
            Ok(raw) => raw,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let command = match parse_line(&raw) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("error: {err}");
                continue;
            }
        };
        if let ScriptCommand::Wait(secs) = command {
            debug!(secs, "wait ignored in live mode");
            eprintln!("wait is only available in scripts; time passes on its own here");
            continue;
        }

        let outcome = execute(&mut desk, &command);
        for event in drain_events(&mut desk) {
            if ctx.json {
                print_json(&event)?;
            } else {
                println!("[{}] {}", format_timestamp_time(now_utc()), render_event(&event));
            }
        }
        match outcome {
            Ok(Outcome::Done) => {}
            Ok(Outcome::Note(note)) => {
                if !ctx.json {
                    println!("[{}] {}", format_timestamp_time(now_utc()), note);
                }
            }
            Ok(Outcome::Status) => print_status(ctx, &desk)?,
            Ok(Outcome::Quit) => break,
            Err(err) => eprintln!("rejected {}: {}", raw.trim(), err),
        }
    }

    Ok(())
}

fn print_status(ctx: &Context<'_>, desk: &Desk) -> Result<()> {
    let view = desk.view();
    if ctx.json {
        return print_json(&view);
    }
    let stamp = format_timestamp_time(now_utc());
    for line in render_status(&view) {
        println!("[{stamp}] {line}");
    }
    Ok(())
}
