use anyhow::Result;
use phonefield_config::AppConfig;
use phonefield_core::PhoneEngine;
use serde::Serialize;
use std::io::{self, Write};

pub mod completions;
pub mod countries;
pub mod phone;
pub mod replay;

pub struct Context<'a> {
    pub engine: &'a PhoneEngine,
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
