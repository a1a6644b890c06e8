use crate::models::Book;
use rand::seq::SliceRandom;

/// Pick one unread book at random, or `None` when everything has been
/// read (the UI shows a congratulation in that case).
pub fn recommend_unread(books: &[Book]) -> Option<&Book> {
    let unread: Vec<&Book> = books.iter().filter(|book| !book.read).collect();
    unread.choose(&mut rand::thread_rng()).copied()
}

#[cfg(test)]
mod tests {
    use super::recommend_unread;
    use crate::models::Book;

    fn book(title: &str, read: bool) -> Book {
        Book {
            id: 0,
            title: title.to_string(),
            author: "author".to_string(),
            year: 2000,
            genre: "genre".to_string(),
            read,
            issued: false,
            image_path: None,
            created_at: None,
        }
    }

    #[test]
    fn none_when_everything_is_read() {
        let books = vec![book("a", true), book("b", true)];
        assert!(recommend_unread(&books).is_none());
        assert!(recommend_unread(&[]).is_none());
    }

    #[test]
    fn only_unread_books_are_recommended() {
        let books = vec![book("a", true), book("b", false), book("c", true)];
        for _ in 0..20 {
            let pick = recommend_unread(&books).expect("one unread book");
            assert_eq!(pick.title, "b");
        }
    }
}
