//! Export error types.
//!
//! Any failure while querying or rendering surfaces to the caller as an
//! `ExportError` whose display text is fit for the shell's failure signal.
//! A job that errors never reports a finished file.

use thiserror::Error;

use vinoteca_db::DbError;

/// Report generation errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Fetching the export snapshot from the store failed.
    #[error("data access failed: {0}")]
    Data(#[from] DbError),

    /// The workbook could not be assembled or written.
    #[error("spreadsheet rendering failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// The PDF could not be assembled or written.
    #[error("document rendering failed: {0}")]
    Document(String),

    /// The output file could not be created.
    #[error("could not write output file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_shell_presentable() {
        let err = ExportError::Data(DbError::PoolExhausted);
        assert_eq!(err.to_string(), "data access failed: Connection pool exhausted");

        let err = ExportError::Document("no page to write to".to_string());
        assert_eq!(err.to_string(), "document rendering failed: no page to write to");
    }
}
