//! Error types for grid processing.
//!
//! The alignment stages share one error enum with the grid model so that
//! slicing failures and alignment failures surface the same way.

pub use ocean_common::error::{GridError, GridResult};

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridError>;
