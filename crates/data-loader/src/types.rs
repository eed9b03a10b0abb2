//! Core domain types for the library catalog.
//!
//! This module defines the records every other crate works with:
//! physical books, the title/author groups they belong to, and the loan log.
//! `Catalog` is the in-memory store that owns all of them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use xxhash_rust::xxh3::xxh3_64;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a physical copy of a book
pub type BookId = u32;

/// Library member identifier (e.g. "COTW")
pub type MemberId = String;

/// Opaque genre label as written in the catalog ("Fantasy", "Classics", ...)
pub type Genre = String;

/// Date format used by the catalog and the loan log
pub const DATE_FMT: &str = "%d/%m/%Y";

/// Separator placed between title and author before hashing, so that
/// ("ab", "c") and ("a", "bc") never collide by concatenation.
const GROUP_KEY_SEPARATOR: u8 = 0x1f;

// =============================================================================
// Group identity
// =============================================================================

/// Stable identifier of a book group, derived from (title, author) only.
///
/// Genres play no part in the identity, so two groups with the same title
/// and author always hash equal whatever order their genres are listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupHash(u64);

impl GroupHash {
    /// Hash a (title, author) pair
    pub fn of(title: &str, author: &str) -> Self {
        let mut key = Vec::with_capacity(title.len() + author.len() + 1);
        key.extend_from_slice(title.as_bytes());
        key.push(GROUP_KEY_SEPARATOR);
        key.extend_from_slice(author.as_bytes());
        Self(xxh3_64(&key))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GroupHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

// =============================================================================
// Books and Groups
// =============================================================================

/// A physical copy in the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Genres in catalog order
    pub genres: Vec<Genre>,
    /// `None` when the catalog row has no readable purchase date
    pub purchase_date: Option<NaiveDate>,
    /// Member currently holding the book, `None` while it is on the shelf
    pub member: Option<MemberId>,
}

impl Book {
    pub fn group_hash(&self) -> GroupHash {
        GroupHash::of(&self.title, &self.author)
    }

    pub fn is_checked_out(&self) -> bool {
        self.member.is_some()
    }
}

/// A title/author cluster spanning every physical copy of the same work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub title: String,
    pub author: String,
    pub genres: Vec<Genre>,
}

impl Group {
    pub fn hash(&self) -> GroupHash {
        GroupHash::of(&self.title, &self.author)
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

impl From<&Book> for Group {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genres: book.genres.clone(),
        }
    }
}

// =============================================================================
// Loan log
// =============================================================================

/// One checkout event. Read-only once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub book_id: BookId,
    pub member: MemberId,
    pub checked_out: NaiveDate,
    /// `None` while the book is still on loan
    pub returned: Option<NaiveDate>,
}

impl LoanRecord {
    pub fn is_active(&self) -> bool {
        self.returned.is_none()
    }
}

/// Checks if a member id has the library's format: exactly four ASCII
/// uppercase letters.
pub fn is_valid_member(member: &str) -> bool {
    member.len() == 4 && member.bytes().all(|b| b.is_ascii_uppercase())
}

// =============================================================================
// Catalog - The In-Memory Store
// =============================================================================

/// Holds every book, the derived group table and the loan log.
///
/// The group table is maintained on insert: the most recently inserted book
/// of a (title, author) pair supplies the group's genre list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) books: HashMap<BookId, Book>,
    pub(crate) groups: HashMap<GroupHash, Group>,
    pub(crate) book_groups: HashMap<BookId, GroupHash>,
    /// Loan log in file order (oldest first)
    pub(crate) loans: Vec<LoanRecord>,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_book(&self, id: BookId) -> Option<&Book> {
        self.books.get(&id)
    }

    pub fn get_group(&self, hash: GroupHash) -> Option<&Group> {
        self.groups.get(&hash)
    }

    /// Group hash of a physical copy, `None` for an unknown id
    pub fn group_of_book(&self, id: BookId) -> Option<GroupHash> {
        self.book_groups.get(&id).copied()
    }

    /// All copies belonging to one group, ordered by id
    pub fn books_in_group(&self, hash: GroupHash) -> Vec<&Book> {
        let mut books: Vec<&Book> = self
            .books
            .values()
            .filter(|book| book.group_hash() == hash)
            .collect();
        books.sort_by_key(|book| book.id);
        books
    }

    pub fn loans(&self) -> &[LoanRecord] {
        &self.loans
    }

    /// Loans made by one member, most recent first
    pub fn member_loans(&self, member: &str) -> Vec<&LoanRecord> {
        self.loans
            .iter()
            .rev()
            .filter(|loan| loan.member == member)
            .collect()
    }

    /// Every member appearing in the loan log
    pub fn members(&self) -> BTreeSet<&str> {
        self.loans.iter().map(|loan| loan.member.as_str()).collect()
    }

    /// Insert a book and refresh its group entry
    pub fn insert_book(&mut self, book: Book) {
        let hash = book.group_hash();
        self.groups.insert(hash, Group::from(&book));
        self.book_groups.insert(book.id, hash);
        self.books.insert(book.id, book);
    }

    /// Append a loan to the end of the log
    pub fn insert_loan(&mut self, loan: LoanRecord) {
        self.loans.push(loan);
    }

    /// Get counts for debugging/validation: (books, groups, loans)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.books.len(), self.groups.len(), self.loans.len())
    }
}
