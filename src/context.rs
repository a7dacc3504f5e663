//! Application context: the explicitly constructed root every service reads from.

use std::sync::Arc;

use crate::catalog::{Catalog, WorkbookLoader};
use crate::config::Config;
use crate::di::FromRef;
use crate::error::AppError;

/// Shared read-only catalog.
pub type AppCatalog = Arc<Catalog>;

/// Shared configuration.
pub type AppConfig = Arc<Config>;

/// Root application context.
///
/// Holds the catalog loaded once at startup and the configuration it was
/// loaded with. Nothing in it is mutated after construction, so clones can be
/// handed to concurrent MCP tool calls freely.
#[derive(Clone)]
pub struct Context {
    /// Vocabularies and relation tables.
    pub catalog: AppCatalog,
    /// Application configuration.
    pub config: AppConfig,
}

impl Context {
    /// Creates a new context with the given dependencies.
    pub fn new(catalog: Catalog, config: Config) -> Self {
        Self {
            catalog: Arc::new(catalog),
            config: Arc::new(config),
        }
    }

    /// Load the workbook named by `config` and build the context.
    pub fn load(config: Config) -> Result<Self, AppError> {
        let catalog = WorkbookLoader::new(&config.workbook).load()?;
        Ok(Self::new(catalog, config))
    }
}

impl FromRef<Context> for AppCatalog {
    fn from_ref(ctx: &Context) -> Self {
        ctx.catalog.clone()
    }
}

impl FromRef<Context> for AppConfig {
    fn from_ref(ctx: &Context) -> Self {
        ctx.config.clone()
    }
}
