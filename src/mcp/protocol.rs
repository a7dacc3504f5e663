//! MCP protocol response helpers.

use rmcp::model::{CallToolResult, Content};
use rmcp::schemars::{self, JsonSchema};
use rmcp::ErrorData as McpError;
use serde::{Deserialize, Serialize};

/// Output format for tool responses.
#[derive(Debug, Clone, Copy, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// JSON format (default).
    #[default]
    Json,
    /// TOON (Token-Oriented Object Notation) - 40-60% fewer tokens.
    Toon,
}

/// Single-item response that serializes as the raw inner value.
///
/// # Example
///
/// ```ignore
/// Response::json(result).into()  // JSON output (default)
/// Response(result, Some(OutputFormat::Toon)).into()  // TOON output
/// ```
pub struct Response<T>(pub T, pub Option<OutputFormat>);

impl<T> Response<T> {
    /// Create a response with default (JSON) format.
    pub fn json(data: T) -> Self {
        Response(data, None)
    }
}

impl<T: Serialize> Serialize for Response<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T: Serialize> From<Response<T>> for Result<CallToolResult, McpError> {
    fn from(response: Response<T>) -> Self {
        match response.1.unwrap_or_default() {
            OutputFormat::Json => Ok(CallToolResult::success(vec![Content::json(&response.0)?])),
            OutputFormat::Toon => {
                let toon = serde_toon::to_string(&response.0).map_err(|e| {
                    McpError::internal_error(format!("TOON serialization error: {}", e), None)
                })?;
                Ok(CallToolResult::success(vec![Content::text(toon)]))
            }
        }
    }
}

/// Paginated response with data array and pagination metadata.
#[derive(Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    /// The items for this page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub pagination: Pagination,
}

/// Pagination metadata for list responses.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Total number of items across all pages.
    pub total: usize,
    /// Offset of the first item in this page.
    pub offset: usize,
    /// Maximum number of items per page.
    pub limit: usize,
    /// Whether there are more items after this page.
    pub has_more: bool,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Slice one page out of a full result list.
    pub fn paginate(items: Vec<T>, offset: usize, limit: usize) -> Self {
        let total = items.len();
        let data: Vec<T> = items.into_iter().skip(offset).take(limit).collect();
        Self {
            pagination: Pagination {
                total,
                offset,
                limit,
                has_more: offset.saturating_add(data.len()) < total,
            },
            data,
        }
    }
}

impl<T: Serialize> From<PaginatedResponse<T>> for Result<CallToolResult, McpError> {
    fn from(response: PaginatedResponse<T>) -> Self {
        Ok(CallToolResult::success(vec![Content::json(&response)?]))
    }
}
