use crate::models::Book;
use serde::Serialize;
use std::collections::HashMap;

/// Aggregate numbers for the Statistics view.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct LibraryStats {
    pub total: usize,
    pub read_count: usize,
    pub read_percentage: f64,
    /// Genre frequencies, highest count first, ties broken by name.
    pub genre_counts: Vec<(String, usize)>,
}

pub fn library_stats(books: &[Book]) -> LibraryStats {
    let total = books.len();
    let read_count = books.iter().filter(|book| book.read).count();
    let read_percentage = if total > 0 {
        (read_count as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for book in books {
        *counts.entry(book.genre.as_str()).or_insert(0) += 1;
    }
    let mut genre_counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(genre, count)| (genre.to_string(), count))
        .collect();
    genre_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    LibraryStats {
        total,
        read_count,
        read_percentage,
        genre_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::library_stats;
    use crate::models::Book;

    fn book(title: &str, genre: &str, read: bool) -> Book {
        Book {
            id: 0,
            title: title.to_string(),
            author: "author".to_string(),
            year: 2000,
            genre: genre.to_string(),
            read,
            issued: false,
            image_path: None,
            created_at: None,
        }
    }

    #[test]
    fn empty_library_yields_zero_percent_without_division_error() {
        let stats = library_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.read_count, 0);
        assert_eq!(stats.read_percentage, 0.0);
        assert!(stats.genre_counts.is_empty());
    }

    #[test]
    fn read_percentage_and_genre_counts() {
        let books = vec![
            book("a", "Fantasy", true),
            book("b", "Fantasy", false),
            book("c", "Crime", true),
            book("d", "Poetry", false),
        ];
        let stats = library_stats(&books);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.read_count, 2);
        assert!((stats.read_percentage - 50.0).abs() < f64::EPSILON);
        assert_eq!(
            stats.genre_counts,
            vec![
                ("Fantasy".to_string(), 2),
                ("Crime".to_string(), 1),
                ("Poetry".to_string(), 1),
            ]
        );
    }
}
