//! Example: Recommend books for one member
//!
//! Run with: cargo run --package recommender --example recommend_member -- COTW
//!
//! This example shows how to:
//! 1. Load the catalog and loan log
//! 2. Build the engine snapshot
//! 3. Inspect the member's genre profile
//! 4. Pull the first recommendations from the stream

use data_loader::Catalog;
use recommender::rebuild_indices;
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let member = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "COTW".to_string())
        .to_uppercase();

    println!("=== Library Recommendation Example ===\n");

    let start = Instant::now();
    let catalog = Catalog::load_from_files(Path::new("database"))?;
    let snapshot = rebuild_indices(&catalog);
    println!("Loaded catalog and built indices in {:?}\n", start.elapsed());

    let recs = snapshot.recommend(&member, &catalog);
    println!("Member: {}", member);
    println!("  Genres read: {}", recs.genre_counts.len());
    println!("  Top genres: {}\n", recs.top_genres.join(", "));

    let total = recs.top_genres.len();
    let start = Instant::now();
    for (rank, rec) in recs.stream.take(10).enumerate() {
        let Some(group) = snapshot.group(&rec.group) else {
            continue;
        };
        println!(
            "{:2}. {} by {} ({:.0}% match, {} reads)",
            rank + 1,
            group.title,
            group.author,
            rec.match_percent(total),
            snapshot.read_count(&rec.group)
        );
    }
    println!("\nGenerated in {:?}", start.elapsed());

    Ok(())
}
