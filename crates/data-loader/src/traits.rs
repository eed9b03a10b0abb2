//! The read-only view the recommendation engine consumes.
//!
//! The engine never touches files or the checkout workflow; it only needs
//! the groups, the loan log and a way to resolve a physical copy to its
//! group and genres. `Catalog` implements this, and tests can supply their
//! own in-memory sources.

use crate::types::*;
use std::collections::HashMap;

/// Read-only catalog snapshot.
///
/// `Sync` so index builds can scan it from several threads.
pub trait CatalogSource: Sync {
    /// Every group keyed by its hash
    fn group_table(&self) -> &HashMap<GroupHash, Group>;

    /// Full loan history, oldest first
    fn loan_history(&self) -> &[LoanRecord];

    /// Group of a physical copy, `None` if the id is unknown
    fn group_of(&self, book: BookId) -> Option<GroupHash>;

    /// Genres of a physical copy, `None` if the id is unknown
    fn genres_of(&self, book: BookId) -> Option<&[Genre]>;

    fn all_groups(&self) -> impl Iterator<Item = &Group> {
        self.group_table().values()
    }

    fn is_valid_member(&self, id: &str) -> bool {
        is_valid_member(id)
    }
}

impl CatalogSource for Catalog {
    fn group_table(&self) -> &HashMap<GroupHash, Group> {
        &self.groups
    }

    fn loan_history(&self) -> &[LoanRecord] {
        &self.loans
    }

    fn group_of(&self, book: BookId) -> Option<GroupHash> {
        self.group_of_book(book)
    }

    fn genres_of(&self, book: BookId) -> Option<&[Genre]> {
        self.books.get(&book).map(|b| b.genres.as_slice())
    }
}
