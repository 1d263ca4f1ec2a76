//! # vinoteca-export: Report Projection Engine
//!
//! Turns one consistent snapshot of the collection into two structurally
//! different documents: a three-sheet spreadsheet workbook and a paginated
//! PDF report.
//!
//! ## Export Job Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Export Job Flow                                  │
//! │                                                                         │
//! │  Export dialog (out of tree)                                           │
//! │       │ dispatched via vinoteca-tasks                                   │
//! │       ▼                                                                 │
//! │  SpreadsheetReport::export / DocumentReport::export                    │
//! │       │                                                                 │
//! │       ├── export_dataset() ── one read transaction, one snapshot       │
//! │       │                                                                 │
//! │       ├── render() ────────── pure projection of that snapshot         │
//! │       │                                                                 │
//! │       └── save ────────────── file written only after a full render    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ok(path) → success signal          Err(ExportError) → failure signal  │
//! │                                                                         │
//! │  A failure at ANY step propagates, so the shell can never announce     │
//! │  a finished file that was not completely written.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`excel`] - XLSX workbook renderer (data / analytics / visualization)
//! - [`pdf`] - PDF report renderer (statistical / detailed variants)
//! - [`meta`] - Company/operator identity stamped onto title blocks
//! - [`text`] - Currency-glyph safety, truncation, amount formatting
//! - [`error`] - Export error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod excel;
pub mod meta;
pub mod pdf;
pub mod text;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ExportError, ExportResult};
pub use excel::SpreadsheetReport;
pub use meta::ReportMeta;
pub use pdf::{DocumentReport, ReportKind};
pub use text::sanitize_currency;
