//! Relation tools - closure reports and export.
//!
//! Thin MCP handlers that delegate to ReportService and ExportService.

use std::path::PathBuf;

use rmcp::{
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::{self, JsonSchema},
    tool, tool_router, ErrorData as McpError,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::mcp::protocol::{OutputFormat, Response};
use crate::mcp::server::McpServer;
use crate::models::{BasicRow, DetailedRow};
use crate::services::{
    ClosureService, ClosureTrace, ExportFormat, ExportService, ExportTarget, ReportService,
};

// ============================================================================
// Parameter Types
// ============================================================================

/// Parameters for relate_codes tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RelateCodesParams {
    /// Selected codes (any mix of SB, CE, CEv, DO).
    pub codes: Vec<String>,
    /// Include the per-step expansion trace.
    #[serde(default)]
    pub include_trace: bool,
    /// Output format: "json" (default) or "toon".
    #[serde(default)]
    pub output_format: Option<OutputFormat>,
}

/// Parameters for export_relations tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExportRelationsParams {
    /// Selected codes (any mix of SB, CE, CEv, DO).
    pub codes: Vec<String>,
    /// Export format: "xlsx" (one sheet per table, default), "csv" (one file per table) or "json".
    #[serde(default)]
    pub format: Option<String>,
    /// Output directory (default: configured export dir).
    #[serde(default)]
    pub dir: Option<String>,
    /// Base file name (default: configured export name).
    #[serde(default)]
    pub name: Option<String>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for relate_codes tool.
#[derive(Debug, Serialize)]
pub struct RelateCodesResult {
    /// The trimmed selection.
    pub selection: Vec<String>,
    /// Number of codes in the closure.
    pub closure_size: usize,
    /// One row per SB in the closure.
    pub basic: Vec<BasicRow>,
    /// One row per code in the closure.
    pub detailed: Vec<DetailedRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<ClosureTrace>,
}

/// Response for export_relations tool.
#[derive(Debug, Serialize)]
pub struct ExportRelationsResult {
    pub files: Vec<String>,
    pub basic_rows: usize,
    pub detailed_rows: usize,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router(router = relation_tools, vis = "pub(crate)")]
impl McpServer {
    /// Expand a selection and return both report tables.
    #[tool(
        description = "Find every code related to the selected codes and return the basic table (per SB: CE, CEv, DOs) and the detailed table (code, type, description)."
    )]
    pub async fn relate_codes(
        &self,
        Parameters(params): Parameters<RelateCodesParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(codes = ?params.codes, "Running relate_codes tool");

        let service = self.resolve::<ReportService>();
        let reports = service.build(&params.codes)?;

        let trace = params
            .include_trace
            .then(|| self.resolve::<ClosureService>().trace(&reports.selection));

        Response(
            RelateCodesResult {
                closure_size: reports.detailed.len(),
                selection: reports.selection,
                basic: reports.basic,
                detailed: reports.detailed,
                trace,
            },
            params.output_format,
        )
        .into()
    }

    /// Expand a selection and write both tables to disk.
    #[tool(
        description = "Generate both report tables for the selected codes and export them (xlsx: one sheet per table; csv: one file per table; json: single document)."
    )]
    pub async fn export_relations(
        &self,
        Parameters(params): Parameters<ExportRelationsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(codes = ?params.codes, "Running export_relations tool");

        let format = params
            .format
            .as_deref()
            .map(str::parse::<ExportFormat>)
            .transpose()
            .map_err(AppError::Validation)?
            .unwrap_or_default();

        let reports = self.resolve::<ReportService>().build(&params.codes)?;
        let target = ExportTarget {
            dir: params.dir.map(PathBuf::from),
            name: params.name,
        };
        let files = self
            .resolve::<ExportService>()
            .export(&reports, &target, format)?;

        Response::json(ExportRelationsResult {
            files: files.iter().map(|p| p.display().to_string()).collect(),
            basic_rows: reports.basic.len(),
            detailed_rows: reports.detailed.len(),
        })
        .into()
    }
}
