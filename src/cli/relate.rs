//! Relate and export subcommands - generate the report tables for a selection.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::Result;

use crate::context::Context;
use crate::di::FromRef;
use crate::models::Reports;
use crate::services::{ExportFormat, ExportService, ExportTarget, ReportService};

use super::render;

/// Output format for `relate`.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum PrintFormat {
    /// Terminal tables.
    #[default]
    Table,
    /// JSON document with both tables.
    Json,
    /// TOON document with both tables.
    Toon,
}

/// Print the basic and detailed tables for a selection.
#[derive(Parser)]
pub struct RelateCommand {
    /// Selected codes (any mix of SB, CE, CEv, DO).
    #[arg(required = true)]
    pub codes: Vec<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = PrintFormat::Table)]
    pub format: PrintFormat,
}

impl RelateCommand {
    /// Run the relate command.
    pub fn run(self, ctx: &Context) -> Result<()> {
        let reports = generate(ctx, &self.codes)?;

        match self.format {
            PrintFormat::Table => {
                println!("Tabla básica de relaciones");
                println!("{}", render::basic_table(&reports.basic));
                println!();
                println!("Tabla detallada de descripciones");
                println!("{}", render::detailed_table(&reports.detailed));
            }
            PrintFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
            PrintFormat::Toon => {
                let toon = serde_toon::to_string(&reports)
                    .map_err(|e| color_eyre::eyre::eyre!("TOON serialization error: {}", e))?;
                println!("{}", toon);
            }
        }
        Ok(())
    }
}

/// Export the basic and detailed tables for a selection.
#[derive(Parser)]
pub struct ExportCommand {
    /// Selected codes (any mix of SB, CE, CEv, DO).
    #[arg(required = true)]
    pub codes: Vec<String>,

    /// Export format: xlsx (one sheet per table), csv (one file per table) or json.
    #[arg(short, long, default_value = "xlsx")]
    pub format: ExportFormat,

    /// Output directory (default: `export.dir` from config).
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Base file name (default: `export.name` from config).
    #[arg(short, long)]
    pub name: Option<String>,
}

impl ExportCommand {
    /// Run the export command.
    pub fn run(self, ctx: &Context) -> Result<()> {
        let reports = generate(ctx, &self.codes)?;
        let target = ExportTarget {
            dir: self.out,
            name: self.name,
        };

        let files = ExportService::from_ref(ctx).export(&reports, &target, self.format)?;
        for file in files {
            println!("{}", file.display());
        }
        Ok(())
    }
}

fn generate(ctx: &Context, codes: &[String]) -> Result<Reports> {
    ReportService::from_ref(ctx)
        .build(codes)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to generate tables: {}", e))
}
