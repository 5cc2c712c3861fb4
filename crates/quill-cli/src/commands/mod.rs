use anyhow::Result;
use quill_config::AppConfig;
use quill_store::Store;
use serde::Serialize;
use std::io::{self, Write};
use std::rc::Rc;

pub mod filters;
pub mod publishers;
pub mod queue;
pub mod submissions;
pub mod tags;
pub mod titles;

pub struct Context<'a> {
    pub store: &'a Rc<Store>,
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
