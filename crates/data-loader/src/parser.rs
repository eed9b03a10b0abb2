//! Parser for the library's catalog files.
//!
//! Two comma-separated files, each starting with a header row:
//! - database.txt: Id,Title,Author,Genre,Purchase,Member
//! - logfile.txt:  Id,Member,Date_Out,Date_In
//!
//! Genres are `;`-separated inside their field. Dates are `dd/mm/YYYY`.
//! Records are read with the `csv` crate, so quoted fields may hold commas,
//! doubled quotes and line breaks.

use crate::error::{DataLoadError, Result};
use crate::index::{BOOKS_FILE, LOANS_FILE};
use crate::types::*;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use tracing::warn;

const BOOK_FIELDS: usize = 6;
const LOAN_FIELDS: usize = 4;

/// Open a catalog file and read its data records with the line each starts on.
///
/// The header row is skipped. Field counts are checked per record so the
/// error can name the file.
fn read_records(path: &Path, file: &str) -> Result<Vec<(usize, StringRecord)>> {
    let handle = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(handle);

    reader
        .records()
        .map(|record| {
            let record = record.map_err(|e| csv_error(file, e))?;
            let line = record.position().map_or(0, |pos| pos.line() as usize);
            Ok((line, record))
        })
        .collect()
}

fn csv_error(file: &str, err: csv::Error) -> DataLoadError {
    let line = err.position().map_or(0, |pos| pos.line() as usize);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => DataLoadError::IoError(e),
        _ => DataLoadError::ParseError {
            file: file.to_string(),
            line,
            reason,
        },
    }
}

fn expect_fields(record: &StringRecord, expected: usize, file: &str, line: usize) -> Result<()> {
    if record.len() != expected {
        return Err(DataLoadError::FieldCountMismatch {
            file: file.to_string(),
            line,
            expected,
            found: record.len(),
        });
    }
    Ok(())
}

fn parse_id(s: &str, file: &str, line: usize) -> Result<BookId> {
    s.trim().parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid id '{}': {}", s, e),
    })
}

fn parse_date(s: &str, field: &str, file: &str, line: usize) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FMT).map_err(|_| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {} '{}', expected dd/mm/YYYY", field, s),
    })
}

/// The purchase date is informational only: a bad one is logged, not fatal
fn parse_purchase(s: &str, file: &str, line: usize) -> Option<NaiveDate> {
    if s.trim().is_empty() {
        return None;
    }
    match parse_date(s, "purchase date", file, line) {
        Ok(date) => Some(date),
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

/// Split the `;`-separated genre field, dropping empty entries
///
/// Example: "Fantasy;Classics" -> ["Fantasy", "Classics"]
fn parse_genres(s: &str) -> Vec<Genre> {
    s.split(';')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_member(s: &str) -> Option<MemberId> {
    let member = s.trim();
    (!member.is_empty()).then(|| member.to_uppercase())
}

/// Parse the database.txt file
///
/// Format: Id,Title,Author,Genre,Purchase,Member
pub fn parse_books(path: &Path) -> Result<Vec<Book>> {
    let file = BOOKS_FILE;
    let mut books = Vec::new();

    for (line, record) in read_records(path, file)? {
        expect_fields(&record, BOOK_FIELDS, file, line)?;

        books.push(Book {
            id: parse_id(&record[0], file, line)?,
            title: record[1].to_string(),
            author: record[2].to_string(),
            genres: parse_genres(&record[3]),
            purchase_date: parse_purchase(&record[4], file, line),
            member: parse_member(&record[5]),
        });
    }

    Ok(books)
}

/// Parse the logfile.txt file
///
/// Format: Id,Member,Date_Out,Date_In (Date_In empty while on loan)
pub fn parse_loans(path: &Path) -> Result<Vec<LoanRecord>> {
    let file = LOANS_FILE;
    let mut loans = Vec::new();

    for (line, record) in read_records(path, file)? {
        expect_fields(&record, LOAN_FIELDS, file, line)?;

        let member = parse_member(&record[1]).ok_or_else(|| DataLoadError::ParseError {
            file: file.to_string(),
            line,
            reason: "Missing member".to_string(),
        })?;
        let returned = match record[3].trim() {
            "" => None,
            s => Some(parse_date(s, "return date", file, line)?),
        };

        loans.push(LoanRecord {
            book_id: parse_id(&record[0], file, line)?,
            member,
            checked_out: parse_date(&record[2], "checkout date", file, line)?,
            returned,
        });
    }

    Ok(loans)
}
