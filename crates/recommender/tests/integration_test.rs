//! Integration tests for the recommender.
//!
//! These tests drive the engine end to end: catalog in, ranked groups out,
//! including a load from files on disk.

use chrono::NaiveDate;
use data_loader::{Book, Catalog, CatalogSource, GroupHash, LoanRecord, BOOKS_FILE, LOANS_FILE};
use recommender::{rebuild_indices, EngineConfig, EngineSnapshot, Recommendation};
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

const AUTHOR: &str = "Author";

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, day).unwrap()
}

/// Books are (title, ";"-separated genres), one copy each; loans are
/// (title, member) in history order.
fn create_test_catalog(books: &[(&str, &str)], loans: &[(&str, &str)]) -> Catalog {
    let mut catalog = Catalog::new();
    for (id, (title, genres)) in books.iter().enumerate() {
        catalog.insert_book(Book {
            id: id as u32,
            title: title.to_string(),
            author: AUTHOR.to_string(),
            genres: genres.split(';').map(String::from).collect(),
            purchase_date: Some(date(1)),
            member: None,
        });
    }
    for (title, member) in loans {
        add_loan(&mut catalog, books, title, member);
    }
    catalog
}

fn add_loan(catalog: &mut Catalog, books: &[(&str, &str)], title: &str, member: &str) {
    let id = books
        .iter()
        .position(|(t, _)| *t == title)
        .expect("loan of unknown title");
    catalog.insert_loan(LoanRecord {
        book_id: id as u32,
        member: member.to_string(),
        checked_out: date(2),
        returned: Some(date(3)),
    });
}

fn hash(title: &str) -> GroupHash {
    GroupHash::of(title, AUTHOR)
}

fn groups(recs: &[Recommendation]) -> Vec<GroupHash> {
    recs.iter().map(|r| r.group).collect()
}

const SCENARIO_BOOKS: [(&str, &str); 3] = [
    ("G1", "Fantasy;Classics"),
    ("G2", "Fantasy"),
    ("G3", "Horror"),
];

fn scenario_catalog() -> Catalog {
    create_test_catalog(
        &SCENARIO_BOOKS,
        &[("G1", "XXXX"), ("G1", "XXXX"), ("G2", "OTHR")],
    )
}

#[test]
fn test_shared_genre_recommended_read_group_never() {
    let catalog = scenario_catalog();
    let snapshot = rebuild_indices(&catalog);
    let recs = snapshot.recommend("XXXX", &catalog);

    assert_eq!(recs.genre_counts.get("Fantasy"), Some(&2));
    assert_eq!(recs.genre_counts.get("Classics"), Some(&2));
    assert_eq!(recs.top_genres, vec!["Fantasy", "Classics"]);

    let stream: Vec<Recommendation> = recs.stream.collect();
    assert_eq!(stream, vec![Recommendation::new(hash("G2"), 1)]);
    assert!(!groups(&stream).contains(&hash("G1")));
    assert!(!groups(&stream).contains(&hash("G3")));
}

#[test]
fn test_member_without_history() {
    let catalog = scenario_catalog();
    let snapshot = rebuild_indices(&catalog);
    let recs = snapshot.recommend("NOPE", &catalog);

    assert!(recs.genre_counts.is_empty());
    assert!(recs.top_genres.is_empty());
    assert_eq!(recs.stream.count(), 0);
}

#[test]
fn test_title_tie_break_descending() {
    let catalog = create_test_catalog(
        &[
            ("Seed", "Fantasy"),
            ("Alpha", "Fantasy"),
            ("Zeta", "Fantasy"),
        ],
        &[("Seed", "ABCD")],
    );
    let snapshot = rebuild_indices(&catalog);
    let stream: Vec<Recommendation> = snapshot.recommend("ABCD", &catalog).stream.collect();

    assert_eq!(groups(&stream), vec![hash("Zeta"), hash("Alpha")]);
    assert!(stream.iter().all(|r| r.match_count == 1));
}

#[test]
fn test_rebuild_counts_new_loan() {
    let mut catalog = scenario_catalog();
    let before = rebuild_indices(&catalog);

    add_loan(&mut catalog, &SCENARIO_BOOKS, "G3", "OTHR");
    let after = rebuild_indices(&catalog);

    let popularity_before = before.popularity();
    let popularity_after = after.popularity();
    assert_eq!(
        popularity_after.read_count(&hash("G3")),
        popularity_before.read_count(&hash("G3")) + 1
    );
    for title in ["G1", "G2"] {
        assert_eq!(
            popularity_after.read_count(&hash(title)),
            popularity_before.read_count(&hash(title))
        );
    }
}

#[test]
fn test_rebuild_is_idempotent() {
    let catalog = scenario_catalog();
    assert_eq!(rebuild_indices(&catalog), rebuild_indices(&catalog));
}

#[test]
fn test_stream_properties() {
    let catalog = create_test_catalog(
        &[
            ("Hobbit", "Fantasy;Classics;Adventure"),
            ("Dune", "Sci-Fi;Classics;Adventure"),
            ("Emma", "Classics;Romance"),
            ("Dracula", "Horror;Classics"),
            ("Eragon", "Fantasy;Adventure"),
            ("Stardust", "Fantasy;Romance"),
            ("Rebecca", "Romance;Mystery"),
            ("Carrie", "Horror"),
        ],
        &[
            ("Hobbit", "ABCD"),
            ("Hobbit", "ABCD"),
            ("Emma", "ABCD"),
            ("Carrie", "ABCD"),
            ("Dune", "WXYZ"),
            ("Dune", "WXYZ"),
            ("Eragon", "WXYZ"),
        ],
    );
    let snapshot = rebuild_indices(&catalog);
    let recs = snapshot.recommend("ABCD", &catalog);
    assert_eq!(recs.top_genres.first().map(String::as_str), Some("Classics"));
    let top: HashSet<String> = recs.top_genres.iter().cloned().collect();
    let stream: Vec<Recommendation> = recs.stream.collect();

    let unique: HashSet<GroupHash> = groups(&stream).into_iter().collect();
    assert_eq!(unique.len(), stream.len(), "no group yielded twice");
    for read in ["Hobbit", "Emma", "Carrie"] {
        assert!(!unique.contains(&hash(read)), "{read} was already read");
    }

    // Classics alone is the top cluster, so every query carries it
    for rec in &stream {
        let group = snapshot.group(&rec.group).unwrap();
        assert!(group.genres.iter().any(|g| g == "Classics"));
        assert!(rec.match_count >= 1);
        assert_covers_match(group.genres.as_slice(), &top, rec.match_count);
    }
    assert_eq!(unique, HashSet::from([hash("Dune"), hash("Dracula")]));
}

/// A group matched on `m` genres carries at least `m` of the member's top genres
fn assert_covers_match(genres: &[String], top: &HashSet<String>, match_count: usize) {
    let shared = genres.iter().filter(|g| top.contains(*g)).count();
    assert!(
        shared >= match_count,
        "{genres:?} shares {shared} top genres but matched {match_count}"
    );
}

#[test]
fn test_match_count_counts_head_and_tail() {
    // Two multi-genre clusters: [Fantasy, Classics] (2 loans each) and
    // [Horror, Mystery] (1 loan each)
    let catalog = create_test_catalog(
        &[
            ("Read Twice", "Fantasy;Classics"),
            ("Read Once", "Horror;Mystery"),
            ("P", "Fantasy;Classics;Horror;Mystery"),
            ("Q", "Fantasy;Horror"),
            ("R", "Classics;Mystery;Horror"),
            ("S", "Fantasy"),
            ("T", "Horror"),
        ],
        &[
            ("Read Twice", "ABCD"),
            ("Read Twice", "ABCD"),
            ("Read Once", "ABCD"),
        ],
    );
    let snapshot = rebuild_indices(&catalog);
    let recs = snapshot.recommend("ABCD", &catalog);
    let top: HashSet<String> = recs.top_genres.iter().cloned().collect();
    let stream: Vec<Recommendation> = recs.stream.collect();

    // P: both clusters whole; Q: [Fantasy] + [Horror]; R: [Classics] +
    // [Horror, Mystery]; S: [Fantasy] alone. T carries no top-cluster genre.
    assert_eq!(
        stream,
        vec![
            Recommendation::new(hash("P"), 4),
            Recommendation::new(hash("Q"), 2),
            Recommendation::new(hash("R"), 3),
            Recommendation::new(hash("S"), 1),
        ]
    );
    for rec in &stream {
        let group = snapshot.group(&rec.group).unwrap();
        assert_covers_match(group.genres.as_slice(), &top, rec.match_count);
    }
}

#[test]
fn test_max_clusters_limits_genres() {
    let catalog = create_test_catalog(
        &[
            ("A", "Fantasy"),
            ("B", "Horror"),
            ("C", "Fantasy"),
            ("D", "Horror"),
        ],
        &[("A", "ABCD"), ("A", "ABCD"), ("B", "ABCD")],
    );
    let snapshot = EngineSnapshot::build(&catalog, EngineConfig::new().with_max_clusters(1));
    let recs = snapshot.recommend("ABCD", &catalog);

    assert_eq!(recs.top_genres, vec!["Fantasy"]);
    assert_eq!(groups(&recs.stream.collect::<Vec<_>>()), vec![hash("C")]);
}

#[test]
fn test_recommend_from_files() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(BOOKS_FILE),
        "Id,Title,Author,Genre,Purchase,Member\n\
         0,The Hobbit,Tolkien,Fantasy;Classics,12/05/2019,\n\
         1,The Hobbit,Tolkien,Fantasy;Classics,12/05/2019,\n\
         2,Eragon,Paolini,Fantasy,01/02/2020,\n\
         3,Emma,Austen,Classics;Romance,01/02/2020,\n\
         4,Dracula,Stoker,Horror,01/02/2020,\n",
    )
    .unwrap();
    fs::write(
        dir.path().join(LOANS_FILE),
        "Id,Member,Date_Out,Date_In\n\
         0,abcd,01/03/2023,08/03/2023\n\
         1,ABCD,10/03/2023,\n\
         3,WXYZ,11/03/2023,\n",
    )
    .unwrap();

    let catalog = Catalog::load_from_files(dir.path()).unwrap();
    assert!(catalog.is_valid_member("ABCD"));
    let snapshot = rebuild_indices(&catalog);
    let stream: Vec<Recommendation> = snapshot.recommend("ABCD", &catalog).stream.collect();

    // Both copies of The Hobbit count, Emma was read once, Eragon never
    let hobbit = GroupHash::of("The Hobbit", "Tolkien");
    assert_eq!(snapshot.read_count(&hobbit), 2);
    assert_eq!(
        groups(&stream),
        vec![GroupHash::of("Emma", "Austen"), GroupHash::of("Eragon", "Paolini")]
    );
}
