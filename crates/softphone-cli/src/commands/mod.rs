use anyhow::Result;
use serde::Serialize;
use softphone_config::AppConfig;
use std::io::{self, Write};

pub mod format;
pub mod live;
pub mod simulate;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
