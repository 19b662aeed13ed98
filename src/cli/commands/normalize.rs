//! `normalize`: turn a raw model reply into the structured response format.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::read_input;
use crate::cli::output::{output, ResponseOutput};
use crate::services::ResponseNormalizer;

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// File holding the raw reply; standard input when omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

pub async fn execute(args: NormalizeArgs, json_mode: bool) -> Result<()> {
    let raw = read_input(args.input.as_deref())?;
    let normalized = ResponseNormalizer::new().normalize(&raw);
    output(&ResponseOutput::from(&normalized), json_mode);
    Ok(())
}
