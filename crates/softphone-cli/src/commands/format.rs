use crate::commands::print_json;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use softphone_core::format_duration;

#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Whole seconds to render as MMmSSs
    pub seconds: u64,
}

#[derive(Debug, Serialize)]
struct FormattedDuration {
    seconds: u64,
    formatted: String,
}

pub fn format(json: bool, args: FormatArgs) -> Result<()> {
    let formatted = format_duration(args.seconds);
    if json {
        print_json(&FormattedDuration {
            seconds: args.seconds,
            formatted,
        })?;
    } else {
        println!("{formatted}");
    }
    Ok(())
}
