//! Catalog tools - listing, classification and data-quality checks.

use rmcp::{
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::{self, JsonSchema},
    tool, tool_router, ErrorData as McpError,
};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogSummary;
use crate::error::AppError;
use crate::mcp::protocol::{PaginatedResponse, Response};
use crate::mcp::server::McpServer;
use crate::models::{ClassifiedCode, CodeKind};
use crate::services::{ClassifierService, ValidationIssue, ValidationService};

const DEFAULT_LIST_LIMIT: usize = 100;

// ============================================================================
// Parameter Types
// ============================================================================

/// Parameters for list_codes tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListCodesParams {
    /// Filter by type: SB, CE, CEv, DO.
    #[serde(default)]
    pub kind: Option<String>,
    /// Number of codes to skip (default: 0).
    #[serde(default)]
    pub offset: Option<usize>,
    /// Maximum number of codes (default: 100).
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Parameters for classify_codes tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ClassifyCodesParams {
    /// Codes to classify.
    pub codes: Vec<String>,
}

/// Parameters for check_catalog tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CheckCatalogParams {}

// ============================================================================
// Response Types
// ============================================================================

/// Response for classify_codes tool.
#[derive(Debug, Serialize)]
pub struct ClassifyCodesResult {
    pub codes: Vec<ClassifiedCode>,
}

/// Response for check_catalog tool.
#[derive(Debug, Serialize)]
pub struct CheckCatalogResult {
    /// Table sizes of the loaded catalog.
    pub summary: CatalogSummary,
    pub issues: Vec<ValidationIssue>,
    pub count: usize,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router(router = catalog_tools, vis = "pub(crate)")]
impl McpServer {
    /// List the codes a user can select, with their classified type.
    #[tool(
        description = "List selectable curriculum codes (SB, CE, CEv, DO) with their type. Paginated."
    )]
    pub async fn list_codes(
        &self,
        Parameters(params): Parameters<ListCodesParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(kind = ?params.kind, "Running list_codes tool");

        let kind = params
            .kind
            .as_deref()
            .map(str::parse::<CodeKind>)
            .transpose()
            .map_err(AppError::Validation)?;

        let service = self.resolve::<ClassifierService>();
        let codes = service.selectable(kind);

        PaginatedResponse::paginate(
            codes,
            params.offset.unwrap_or(0),
            params.limit.unwrap_or(DEFAULT_LIST_LIMIT),
        )
        .into()
    }

    /// Classify each code against the vocabularies in priority order.
    #[tool(
        description = "Classify codes as SB, CE, CEv, DO or Unclassified. Priority: SB > CE > CEv > DO."
    )]
    pub async fn classify_codes(
        &self,
        Parameters(params): Parameters<ClassifyCodesParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(count = params.codes.len(), "Running classify_codes tool");

        let service = self.resolve::<ClassifierService>();
        let codes = service.classify_all(&params.codes);

        Response::json(ClassifyCodesResult { codes }).into()
    }

    /// Report data-quality issues in the loaded workbook.
    #[tool(
        description = "Check the catalog for codes defined in several vocabularies and relations pointing at unknown codes."
    )]
    pub async fn check_catalog(
        &self,
        Parameters(_params): Parameters<CheckCatalogParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Running check_catalog tool");

        let service = self.resolve::<ValidationService>();
        let issues = service.check();

        Response::json(CheckCatalogResult {
            summary: self.context().catalog.summary(),
            count: issues.len(),
            issues,
        })
        .into()
    }
}
