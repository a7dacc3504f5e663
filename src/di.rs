//! Dependency resolution from the application [`Context`](crate::context::Context).
//!
//! Services declare what they need as fields and implement `FromRef<Context>`
//! by pulling those fields out of the context. The MCP server and CLI resolve
//! services per call with `T::from_ref(&ctx)`; everything resolved is a cheap
//! `Arc` clone of the immutable catalog or config.
//!
//! # Example
//!
//! ```ignore
//! use curricula::di::FromRef;
//! use curricula::services::ReportService;
//!
//! let service = ReportService::from_ref(&ctx);
//! let reports = service.build(["SB1"])?;
//! ```

/// Trait for extracting a value from a reference to another type.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

/// Blanket implementation: any Clone type can be extracted from itself.
impl<T: Clone> FromRef<T> for T {
    fn from_ref(input: &T) -> Self {
        input.clone()
    }
}
