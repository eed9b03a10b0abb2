//! # Data Loader Crate
//!
//! This crate loads the library catalog and loan log and exposes them to the
//! recommendation engine through the `CatalogSource` trait.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Book, Group, GroupHash, LoanRecord, Catalog)
//! - **parser**: Parse the comma-separated catalog files into Rust structs
//! - **index**: Load, assemble and validate a `Catalog`
//! - **traits**: The read-only `CatalogSource` view used by the engine
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_files(Path::new("database"))?;
//! let (books, groups, loans) = catalog.counts();
//! println!("{books} books in {groups} groups, {loans} loans");
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{BOOKS_FILE, LOANS_FILE};
pub use traits::CatalogSource;
pub use types::{
    // Type aliases
    BookId,
    Genre,
    MemberId,
    // Core types
    Book,
    Catalog,
    Group,
    GroupHash,
    LoanRecord,
    // Helpers
    DATE_FMT,
    is_valid_member,
};
