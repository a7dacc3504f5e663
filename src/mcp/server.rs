//! MCP server implementation for curricula.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, ServerHandler},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool_handler,
};

use crate::context::Context;
use crate::di::FromRef;

/// Curricula MCP server.
///
/// This server provides AI assistants with tools to:
/// - List and classify SB, CE, CEv and DO codes
/// - Expand a selection into its related codes and both report tables
/// - Export the tables
/// - Check the catalog for data-quality issues
#[derive(Clone)]
pub struct McpServer {
    pub(crate) ctx: Arc<Context>,
    tool_router: ToolRouter<McpServer>,
}

impl McpServer {
    /// Create a new MCP server with the given context.
    pub fn new(ctx: Context) -> Self {
        tracing::info!("Initializing curricula MCP server");

        Self {
            ctx: Arc::new(ctx),
            tool_router: Self::tool_router(),
        }
    }

    /// Build the combined tool router from all tool modules.
    fn tool_router() -> ToolRouter<Self> {
        Self::catalog_tools() + Self::relation_tools()
    }

    /// Resolve a service from the context.
    pub fn resolve<T: FromRef<Context>>(&self) -> T {
        T::from_ref(&self.ctx)
    }

    /// Get direct access to the context.
    pub fn context(&self) -> &Context {
        &self.ctx
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                r#"Curricula - Curriculum Relationship Mapper

Relates curriculum codes across four vocabularies and renders two reports.

## Concepts

- **SB**: basic knowledge items (saberes básicos)
- **CE**: evaluation criteria
- **CEv**: evaluation criteria variants
- **DO**: operational descriptors
- **Closure**: every code reachable from a selection in four fixed steps
  (DO → CE, → SB, SB → CE/CEv, CE → DO). The four steps run exactly once
  and the result is never re-expanded, so codes further away are left out.

## Catalog Tools

- **list_codes** - List selectable codes with their type (paginated)
- **classify_codes** - Classify codes as SB, CE, CEv, DO or Unclassified
- **check_catalog** - Report codes defined in several vocabularies and dangling relations

## Relation Tools

- **relate_codes** - Basic table (one row per SB) and detailed table (one row per code)
- **export_relations** - Write both tables to disk as an .xlsx workbook, CSV files or JSON
"#
                .to_string(),
            ),
        }
    }
}
