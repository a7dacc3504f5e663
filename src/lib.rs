//! Curricula - curriculum relationship mapper
//!
//! Relates basic knowledge items (SB), evaluation criteria (CE), criteria
//! variants (CEv) and operational descriptors (DO), and renders the related
//! codes of a selection as a per-SB summary and a described listing.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod context;
pub mod di;
pub mod error;
pub mod mcp;
pub mod models;
pub mod services;
