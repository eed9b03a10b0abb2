//! Example: Inspect a library data directory
//!
//! Run with: cargo run --package data-loader --example load_catalog -- database
//!
//! Prints the titles with the most copies, how many copies are out, and
//! each member's loan activity.

use data_loader::{Catalog, CatalogSource};
use std::path::PathBuf;

fn main() -> data_loader::Result<()> {
    let data_dir = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("database"), PathBuf::from);
    let catalog = Catalog::load_from_files(&data_dir)?;

    let mut shelves: Vec<(&str, &str, usize, usize)> = catalog
        .group_table()
        .iter()
        .map(|(hash, group)| {
            let copies = catalog.books_in_group(*hash);
            let out = copies.iter().filter(|book| book.is_checked_out()).count();
            (group.title.as_str(), group.author.as_str(), copies.len(), out)
        })
        .collect();
    shelves.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(b.0)));

    println!("=== Titles by copies held ===");
    for (title, author, copies, out) in shelves.iter().take(15) {
        println!("{:<40} {:<25} {} copies, {} out", title, author, copies, out);
    }
    let on_loan: usize = shelves.iter().map(|s| s.3).sum();
    let held: usize = shelves.iter().map(|s| s.2).sum();
    println!("\n{} of {} copies currently on loan\n", on_loan, held);

    println!("=== Members ===");
    for member in catalog.members() {
        let loans = catalog.member_loans(member);
        let active = loans.iter().filter(|loan| loan.is_active()).count();
        let last = loans
            .first()
            .and_then(|loan| catalog.get_book(loan.book_id))
            .map_or("-", |book| book.title.as_str());
        let flag = if catalog.is_valid_member(member) { "" } else { " (invalid id)" };
        println!(
            "{}{}: {} loans, {} active, last borrowed {}",
            member,
            flag,
            loans.len(),
            active,
            last
        );
    }

    Ok(())
}
