//! Ledgerline Domain Layer
//!
//! Core value types and collaborator interfaces for turning a bank statement
//! into a ledger of transactions. This crate has no external dependencies; the
//! layout engine, language-model providers, and extractor all build on it.
//!
//! ## Key Concepts
//!
//! - **Token**: one recognized word with its bounding box on a page
//! - **Row**: tokens sharing a vertical band, ordered left to right
//! - **ColumnMap**: horizontal centers of the statement columns on one page
//! - **Candidate**: a loosely-typed record salvaged from a model response
//! - **Transaction**: the normalized six-field ledger entry
//! - **StatementSummary**: cash-flow aggregates over a transaction list
//!
//! ## Architecture
//!
//! - Pure data and algorithms over data only
//! - Trait definitions for every external collaborator (word source, table
//!   recognizer, rasterizer, OCR engine, text-to-structured-data engine)
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod column;
pub mod summary;
pub mod token;
pub mod traits;
pub mod transaction;

// Re-exports for convenience
pub use column::{Column, ColumnMap};
pub use summary::{Direction, StatementSummary};
pub use token::{Row, Token};
pub use transaction::{Candidate, RawField, Transaction};
