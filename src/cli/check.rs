//! Check command handler.

use color_eyre::Result;

use crate::context::Context;
use crate::di::FromRef;
use crate::services::ValidationService;

use super::render;

/// Print data-quality issues found in the workbook.
pub fn run_check(ctx: &Context) -> Result<()> {
    let summary = ctx.catalog.summary();
    println!(
        "SB: {}  CE: {}  CEv: {}  DO: {}  SB relations: {}  CE-DO links: {}",
        summary.basics,
        summary.criteria,
        summary.variants,
        summary.descriptors,
        summary.relations,
        summary.links
    );

    let issues = ValidationService::from_ref(ctx).check();
    if issues.is_empty() {
        println!("No issues found");
    } else {
        println!("{}", render::issues_table(&issues));
        println!("{} issue(s) found", issues.len());
    }
    Ok(())
}
