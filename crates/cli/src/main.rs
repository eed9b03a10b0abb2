use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Catalog, CatalogSource, Genre, GroupHash, DATE_FMT};
use recommender::{
    EngineConfig, EngineSnapshot, MemberProfile, Recommendation, RecommendationSession,
    DEFAULT_MAX_CLUSTERS,
};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

/// ShelfRecs - Library Book Recommendations
#[derive(Parser)]
#[command(name = "shelf-recs")]
#[command(about = "Suggest books to library members from the genres they read", long_about = None)]
struct Cli {
    /// Directory holding database.txt and logfile.txt
    #[arg(short, long, default_value = "database")]
    data_dir: PathBuf,

    /// Number of genre frequency levels used per member
    #[arg(long, default_value_t = DEFAULT_MAX_CLUSTERS)]
    max_clusters: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get book recommendations for a member
    Recommend {
        /// Member ID (four letters)
        #[arg(long)]
        member: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Print a JSON document instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a member's genre profile and loan history
    Member {
        /// Member ID (four letters)
        #[arg(long)]
        member: String,

        /// Number of recent loans to list
        #[arg(long, default_value = "10")]
        last: usize,
    },

    /// Show catalog statistics and the most read groups and genres
    Stats {
        /// Number of entries in each ranking
        #[arg(long, default_value = "10")]
        top: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let catalog = Catalog::load_from_files(&cli.data_dir)
        .with_context(|| format!("Failed to load catalog from {}", cli.data_dir.display()))?;
    let config = EngineConfig::new().with_max_clusters(cli.max_clusters);
    let snapshot = EngineSnapshot::build(&catalog, config);
    debug!("Catalog loaded and indexed in {:?}", start.elapsed());

    match cli.command {
        Commands::Recommend {
            member,
            limit,
            json,
        } => handle_recommend(&catalog, &snapshot, &member, limit, json)?,
        Commands::Member { member, last } => handle_member(&catalog, &member, last)?,
        Commands::Stats { top } => handle_stats(&catalog, &snapshot, top),
    }

    Ok(())
}

/// Upper-case and check a member id before it reaches the engine
fn parse_member(catalog: &Catalog, raw: &str) -> Result<String> {
    let member = raw.trim().to_uppercase();
    if !catalog.is_valid_member(&member) {
        bail!("Invalid member ID '{}': expected four letters", raw);
    }
    Ok(member)
}

/// Genre counts, highest first, ties by name
fn sorted_counts(counts: &HashMap<Genre, u32>) -> Vec<(&str, u32)> {
    let mut sorted: Vec<(&str, u32)> = counts.iter().map(|(g, c)| (g.as_str(), *c)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sorted
}

#[derive(Serialize)]
struct RecommendationReport<'a> {
    member: &'a str,
    genre_counts: Vec<(&'a str, u32)>,
    top_genres: &'a [Genre],
    recommendations: Vec<RecommendationEntry<'a>>,
}

#[derive(Serialize)]
struct RecommendationEntry<'a> {
    group: GroupHash,
    title: &'a str,
    author: &'a str,
    genres: &'a [Genre],
    match_count: usize,
    match_percent: f32,
    reads: u32,
}

/// Handle the 'recommend' command
fn handle_recommend(
    catalog: &Catalog,
    snapshot: &EngineSnapshot,
    member: &str,
    limit: usize,
    json: bool,
) -> Result<()> {
    let member = parse_member(catalog, member)?;

    let start = Instant::now();
    let mut session = RecommendationSession::new(snapshot);
    let recommendations: Vec<Recommendation> = session.take(&member, catalog, limit).to_vec();
    debug!("Generated {} recommendations in {:?}", recommendations.len(), start.elapsed());

    let top_genres = session.top_genres().unwrap_or_default();
    let genre_counts = session
        .genre_counts()
        .map(sorted_counts)
        .unwrap_or_default();

    let entries: Vec<RecommendationEntry> = recommendations
        .iter()
        .filter_map(|rec| {
            let group = snapshot.group(&rec.group)?;
            Some(RecommendationEntry {
                group: rec.group,
                title: &group.title,
                author: &group.author,
                genres: &group.genres,
                match_count: rec.match_count,
                match_percent: rec.match_percent(top_genres.len()),
                reads: snapshot.read_count(&rec.group),
            })
        })
        .collect();

    if json {
        let report = RecommendationReport {
            member: &member,
            genre_counts,
            top_genres,
            recommendations: entries,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", format!("Member {}", member).bold().blue());
    if genre_counts.is_empty() {
        println!("{}", "No loan history, nothing to recommend.".yellow());
        return Ok(());
    }
    println!("Genres read:");
    for (genre, count) in &genre_counts {
        println!("  {} {}: {}", "•".green(), genre, count);
    }
    println!("Top genres: {}\n", top_genres.join(", "));

    print_recommendations(&entries);
    Ok(())
}

/// Handle the 'member' command
fn handle_member(catalog: &Catalog, member: &str, last: usize) -> Result<()> {
    let member = parse_member(catalog, member)?;
    let profile = MemberProfile::build(&member, catalog);

    println!("{}", format!("Member {}", member).bold().blue());
    println!("{}Loans: {}", "• ".cyan(), catalog.member_loans(&member).len());
    println!("{}Groups read: {}", "• ".cyan(), profile.already_read.len());

    println!("Genres (most recent first):");
    for (genre, count) in profile.counts_in_order() {
        println!("  - {}: {}", genre, count);
    }

    println!("Last {} loans:", last);
    for loan in catalog.member_loans(&member).into_iter().take(last) {
        let title = catalog
            .get_book(loan.book_id)
            .map_or("<unknown book>", |book| book.title.as_str());
        let returned = loan
            .returned
            .map(|date| date.format(DATE_FMT).to_string())
            .unwrap_or_else(|| "on loan".yellow().to_string());
        println!(
            "  - {} ({}) out {} / back {}",
            title,
            loan.book_id,
            loan.checked_out.format(DATE_FMT),
            returned
        );
    }
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(catalog: &Catalog, snapshot: &EngineSnapshot, top: usize) {
    let (books, groups, loans) = catalog.counts();
    let popularity = snapshot.popularity();

    println!("{}", "Catalog".bold().blue());
    println!("{}Books: {}", "• ".green(), books);
    println!("{}Groups: {}", "• ".green(), groups);
    println!("{}Genres: {}", "• ".green(), snapshot.genre_index().len());
    println!("{}Loans: {}", "• ".green(), loans);
    println!("{}Members: {}", "• ".green(), catalog.members().len());

    println!("\n{}", format!("Most read groups (top {})", top).bold().blue());
    for (rank, (hash, reads)) in popularity.most_read_groups(top).into_iter().enumerate() {
        if let Some(group) = snapshot.group(&hash) {
            println!(
                "{}. {} by {} - {} reads",
                (rank + 1).to_string().green(),
                group.title,
                group.author,
                reads
            );
        }
    }

    println!("\n{}", format!("Most read genres (top {})", top).bold().blue());
    for (rank, (genre, reads)) in popularity.most_read_genres(top).into_iter().enumerate() {
        println!("{}. {} - {} reads", (rank + 1).to_string().green(), genre, reads);
    }
}

fn print_recommendations(entries: &[RecommendationEntry]) {
    println!("{}", "Recommendations:".bold().blue());
    if entries.is_empty() {
        println!("{}", "Nothing left to suggest for these genres.".yellow());
    }
    for (rank, entry) in entries.iter().enumerate() {
        println!(
            "{}. {} by {} [{}] - {:.0}% match, {} reads",
            (rank + 1).to_string().green(),
            entry.title,
            entry.author,
            entry.genres.join(", "),
            entry.match_percent,
            entry.reads
        );
    }
}
