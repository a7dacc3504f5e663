//! Codes subcommand - list selectable codes.

use clap::Parser;
use color_eyre::Result;

use crate::context::Context;
use crate::di::FromRef;
use crate::models::CodeKind;
use crate::services::ClassifierService;

use super::render;

/// List the codes a selection can be built from.
#[derive(Parser)]
pub struct CodesCommand {
    /// Only list codes of this type (SB, CE, CEv, DO).
    #[arg(short, long)]
    pub kind: Option<CodeKind>,
}

impl CodesCommand {
    /// Run the codes command.
    pub fn run(self, ctx: &Context) -> Result<()> {
        let codes = ClassifierService::from_ref(ctx).selectable(self.kind);
        println!("{}", render::codes_table(&codes));
        Ok(())
    }
}
