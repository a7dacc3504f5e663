//! Vocabulary & relation store.
//!
//! - `store`: the immutable [`Catalog`] with description lookup and join indexes
//! - `loader`: reads the workbook sheets and builds a catalog

mod loader;
mod store;

pub use loader::WorkbookLoader;
pub use store::{Catalog, CatalogSummary};

#[cfg(test)]
pub(crate) use store::fixtures;
