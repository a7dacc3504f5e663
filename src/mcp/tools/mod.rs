//! MCP tool implementations organized by domain.

pub mod catalog;
pub mod relations;
