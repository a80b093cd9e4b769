//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Product listing and team standings
pub mod catalog;

/// General utility commands
pub mod general;

/// Manual points award commands
pub mod points;

/// Product sale and restock commands
pub mod sales;

// Export commands
pub use catalog::*;
pub use general::*;
pub use points::*;
pub use sales::*;
