//! Groups carrying every genre of a query, most popular first.

use crate::snapshot::EngineSnapshot;
use data_loader::GroupHash;
use std::cmp::Ordering;
use std::collections::HashSet;

impl EngineSnapshot {
    /// Groups whose genres are a superset of `genres`.
    ///
    /// Ordered by read count, then title, both descending: among equally
    /// read groups "Zeta" comes before "Alpha". Author and hash (also
    /// descending) settle the rest so the order is fully deterministic.
    /// An unknown genre or an empty query gives no groups.
    pub fn compatible_groups<S: AsRef<str>>(&self, genres: &[S]) -> Vec<GroupHash> {
        let Some((first, rest)) = genres.split_first() else {
            return Vec::new();
        };
        let Some(start) = self.genre_index.groups(first.as_ref()) else {
            return Vec::new();
        };

        let mut compatible: HashSet<GroupHash> = start.clone();
        for genre in rest {
            match self.genre_index.groups(genre.as_ref()) {
                Some(groups) => compatible.retain(|group| groups.contains(group)),
                None => return Vec::new(),
            }
            if compatible.is_empty() {
                break;
            }
        }

        let mut ranked: Vec<GroupHash> = compatible.into_iter().collect();
        ranked.sort_unstable_by(|a, b| self.popularity_order(a, b));
        ranked
    }

    /// Descending (reads, title, author, hash)
    fn popularity_order(&self, a: &GroupHash, b: &GroupHash) -> Ordering {
        self.rank_key(b).cmp(&self.rank_key(a))
    }

    fn rank_key<'s>(&'s self, hash: &GroupHash) -> (u32, &'s str, &'s str, GroupHash) {
        let (title, author) = self
            .groups
            .get(hash)
            .map_or(("", ""), |g| (g.title.as_str(), g.author.as_str()));
        (self.popularity.read_count(hash), title, author, *hash)
    }
}

#[cfg(test)]
mod tests {
    use crate::snapshot::rebuild_indices;
    use chrono::NaiveDate;
    use data_loader::{Book, Catalog, GroupHash, LoanRecord};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 9, 1).unwrap()
    }

    /// (title, genres, reads)
    fn create_test_catalog(groups: &[(&str, &str, u32)]) -> Catalog {
        let mut catalog = Catalog::new();
        for (id, (title, genres, reads)) in groups.iter().enumerate() {
            let id = id as u32;
            catalog.insert_book(Book {
                id,
                title: title.to_string(),
                author: "Author".to_string(),
                genres: genres.split(';').map(String::from).collect(),
                purchase_date: Some(date()),
                member: None,
            });
            for _ in 0..*reads {
                catalog.insert_loan(LoanRecord {
                    book_id: id,
                    member: "READ".to_string(),
                    checked_out: date(),
                    returned: Some(date()),
                });
            }
        }
        catalog
    }

    fn hash(title: &str) -> GroupHash {
        GroupHash::of(title, "Author")
    }

    #[test]
    fn test_superset_only() {
        let catalog = create_test_catalog(&[
            ("Hobbit", "Fantasy;Classics", 0),
            ("Eragon", "Fantasy", 0),
            ("Dracula", "Horror;Classics", 0),
        ]);
        let snapshot = rebuild_indices(&catalog);

        assert_eq!(
            snapshot.compatible_groups(&["Fantasy", "Classics"]),
            vec![hash("Hobbit")]
        );
        assert_eq!(snapshot.compatible_groups(&["Classics"]).len(), 2);
        assert!(snapshot.compatible_groups(&["Fantasy", "Horror"]).is_empty());
    }

    #[test]
    fn test_unknown_genre_and_empty_query() {
        let catalog = create_test_catalog(&[("Hobbit", "Fantasy", 0)]);
        let snapshot = rebuild_indices(&catalog);

        assert!(snapshot.compatible_groups(&["Poetry"]).is_empty());
        assert!(snapshot.compatible_groups(&["Fantasy", "Poetry"]).is_empty());
        assert!(snapshot.compatible_groups::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_most_read_first() {
        let catalog = create_test_catalog(&[
            ("Eragon", "Fantasy", 1),
            ("Hobbit", "Fantasy", 5),
            ("Stardust", "Fantasy", 3),
        ]);
        let snapshot = rebuild_indices(&catalog);

        assert_eq!(
            snapshot.compatible_groups(&["Fantasy"]),
            vec![hash("Hobbit"), hash("Stardust"), hash("Eragon")]
        );
    }

    #[test]
    fn test_equal_reads_descending_title() {
        let catalog = create_test_catalog(&[
            ("Alpha", "Fantasy", 2),
            ("Zeta", "Fantasy", 2),
            ("Mu", "Fantasy", 2),
        ]);
        let snapshot = rebuild_indices(&catalog);

        assert_eq!(
            snapshot.compatible_groups(&["Fantasy"]),
            vec![hash("Zeta"), hash("Mu"), hash("Alpha")]
        );
    }

    #[test]
    fn test_monotone_under_subset() {
        let catalog = create_test_catalog(&[
            ("A", "Fantasy;Classics;Adventure", 1),
            ("B", "Fantasy;Classics", 2),
            ("C", "Fantasy", 3),
            ("D", "Classics;Adventure", 4),
        ]);
        let snapshot = rebuild_indices(&catalog);
        let full = ["Fantasy", "Classics", "Adventure"];

        let wide: Vec<GroupHash> = snapshot.compatible_groups(&full);
        for subset in [&full[..1], &full[..2], &full[1..], &full[..]] {
            let narrow = snapshot.compatible_groups(subset);
            assert!(wide.iter().all(|g| narrow.contains(g)));
        }
    }
}
