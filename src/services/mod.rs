//! Query services over the curriculum catalog.
//!
//! Services hold `Arc`s into the [`Context`](crate::context::Context) and are
//! resolved per call through [`FromRef`](crate::di::FromRef).

mod classifier;
mod closure;
mod export;
mod report;
mod validation;

pub use classifier::ClassifierService;
pub use closure::{ClosureService, ClosureTrace};
pub use export::{basic_csv, detailed_csv, ExportFormat, ExportService, ExportTarget};
pub use report::ReportService;
pub use validation::{ValidationIssue, ValidationService};
