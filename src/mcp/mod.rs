//! Model Context Protocol (MCP) server implementation for curricula.
//!
//! This module provides an MCP server that lets AI assistants explore the
//! curriculum catalog and generate relationship reports.
//!
//! ## Architecture
//!
//! The server holds the immutable `Context`. Services are resolved at tool
//! execution time using `FromRef`.
//!
//! ## Modules
//!
//! - `server`: MCP server implementation with tool router
//! - `protocol`: response helpers (JSON/TOON output, pagination)
//! - `tools`: Tool implementations organized by domain

pub(crate) mod protocol;
pub(crate) mod server;
mod tools;

pub use server::McpServer;
