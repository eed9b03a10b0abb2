//! Error types for the data-loader crate.
//!
//! Every failure here belongs to the catalog collaborator. The recommendation
//! engine never sees these: it only consumes an already-loaded `Catalog`.

use crate::types::{BookId, MemberId};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while loading the catalog and loan log
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Catalog file is missing from the data directory
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A row of database.txt or logfile.txt couldn't be parsed
    ///
    /// `line` is the 1-based line the record starts on
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("Expected {expected} fields but found {found} at line {line} in {file}")]
    FieldCountMismatch {
        file: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A loan names a book id the catalog doesn't have
    #[error("Loan by {member} references unknown book {book_id}")]
    UnknownBook { book_id: BookId, member: MemberId },

    #[error("Book {book_id} returned by {member} on {returned} before checkout on {checked_out}")]
    ReturnBeforeCheckout {
        book_id: BookId,
        member: MemberId,
        checked_out: NaiveDate,
        returned: NaiveDate,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
