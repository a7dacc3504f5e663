//! CLI module for curricula.
//!
//! Subcommands:
//! - `codes`: List selectable codes with their type
//! - `relate`: Print the basic and detailed tables for a selection
//! - `export`: Write both tables to disk
//! - `check`: Report data-quality issues in the workbook
//! - `mcp`: Run the MCP server (stdio transport)

mod check;
mod codes;
mod mcp;
mod relate;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;

pub use codes::CodesCommand;
pub use relate::{ExportCommand, RelateCommand};

/// Curricula - curriculum relationship mapper
#[derive(Parser)]
#[command(name = "curricula")]
#[command(about = "Relate SB, CE, CEv and DO curriculum codes and export the reports")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workbook: an .xlsx file or a directory of CSV sheets (overrides config)
    #[arg(short, long, global = true)]
    pub workbook: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List selectable codes with their type
    Codes(CodesCommand),

    /// Print the related-codes tables for a selection
    Relate(RelateCommand),

    /// Export the related-codes tables for a selection
    Export(ExportCommand),

    /// Check the workbook for data-quality issues
    Check,

    /// Run the MCP server (stdio transport for local use)
    Mcp,
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> Result<()> {
        let ctx = self.load_context()?;
        match self.command {
            Command::Codes(cmd) => cmd.run(&ctx),
            Command::Relate(cmd) => cmd.run(&ctx),
            Command::Export(cmd) => cmd.run(&ctx),
            Command::Check => check::run_check(&ctx),
            Command::Mcp => mcp::run_mcp(ctx).await,
        }
    }

    /// Load configuration, apply CLI overrides and load the workbook.
    fn load_context(&self) -> Result<Context> {
        let mut config = Config::load()?;
        if let Some(path) = &self.workbook {
            config = config.with_workbook(path);
        }
        tracing::debug!(
            file = ?config.workbook.file,
            dir = %config.workbook.dir.display(),
            "Loaded configuration"
        );

        Ok(Context::load(config)?)
    }
}
