//! Catalog loading and validation.
//!
//! Builds a `Catalog` from the library's data directory:
//! - Parse both files (in parallel)
//! - Insert books, which also builds the group table
//! - Append the loan log in file order
//! - Validate loan references and dates

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{info, instrument};

/// File holding one row per physical copy
pub const BOOKS_FILE: &str = "database.txt";

/// File holding one row per checkout event
pub const LOANS_FILE: &str = "logfile.txt";

impl Catalog {
    /// Load the catalog and loan log from a data directory
    ///
    /// Steps:
    /// 1. Parse database.txt and logfile.txt in parallel
    /// 2. Insert books (group table is maintained on insert)
    /// 3. Append loans in file order
    /// 4. Validate
    #[instrument]
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        let books_path = data_dir.join(BOOKS_FILE);
        let loans_path = data_dir.join(LOANS_FILE);

        // Rayon's `join` runs both parsers in parallel
        let (books, loans) = rayon::join(
            || parser::parse_books(&books_path),
            || parser::parse_loans(&loans_path),
        );
        let books = books?;
        let loans = loans?;

        let mut catalog = Catalog::new();
        for book in books {
            catalog.insert_book(book);
        }
        for loan in loans {
            catalog.insert_loan(loan);
        }

        catalog.validate()?;

        let (books, groups, loans) = catalog.counts();
        info!(books, groups, loans, "Catalog loaded");
        Ok(catalog)
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - Every loan references a book in the catalog
    /// - No loan is returned before it was checked out
    pub fn validate(&self) -> Result<()> {
        for loan in &self.loans {
            if !self.books.contains_key(&loan.book_id) {
                return Err(DataLoadError::UnknownBook {
                    book_id: loan.book_id,
                    member: loan.member.clone(),
                });
            }
            if let Some(returned) = loan.returned {
                if returned < loan.checked_out {
                    return Err(DataLoadError::ReturnBeforeCheckout {
                        book_id: loan.book_id,
                        member: loan.member.clone(),
                        checked_out: loan.checked_out,
                        returned,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_dataset(books: &str, loans: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(BOOKS_FILE), books).unwrap();
        fs::write(dir.path().join(LOANS_FILE), loans).unwrap();
        dir
    }

    #[test]
    fn test_load_dataset() {
        let dir = write_dataset(
            "Id,Title,Author,Genre,Purchase,Member\n\
             0,The Hobbit,Tolkien,Fantasy;Classics,12/05/2019,\n\
             1,The Hobbit,Tolkien,Fantasy;Classics,12/05/2019,ABCD\n\
             2,Dracula,Stoker,Horror,01/02/2020,\n",
            "Id,Member,Date_Out,Date_In\n\
             0,ABCD,01/03/2023,08/03/2023\n\
             1,ABCD,10/03/2023,\n",
        );

        let catalog = Catalog::load_from_files(dir.path()).unwrap();
        assert_eq!(catalog.counts(), (3, 2, 2));
        assert_eq!(catalog.group_of_book(0), catalog.group_of_book(1));
    }

    #[test]
    fn test_dangling_loan_rejected() {
        let dir = write_dataset(
            "Id,Title,Author,Genre,Purchase,Member\n0,Emma,Austen,Romance,01/01/2020,\n",
            "Id,Member,Date_Out,Date_In\n9,ABCD,01/03/2023,\n",
        );

        let err = Catalog::load_from_files(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::UnknownBook { book_id: 9, .. }));
    }

    #[test]
    fn test_return_before_checkout_rejected() {
        let dir = write_dataset(
            "Id,Title,Author,Genre,Purchase,Member\n0,Emma,Austen,Romance,01/01/2020,\n",
            "Id,Member,Date_Out,Date_In\n0,ABCD,10/03/2023,01/03/2023\n",
        );

        let err = Catalog::load_from_files(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::ReturnBeforeCheckout { book_id: 0, .. }));
    }
}
