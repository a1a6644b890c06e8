use quarto::{
    library_stats, recommend_unread, Book, CatalogStore, CoverUpload, NewBook, SearchClient,
    StoreError,
};
use std::io::{self, BufRead, Write};
use std::path::Path;

fn main() {
    env_logger::init();

    let store = match CatalogStore::new("library.db", "book_images") {
        Ok(store) => store,
        Err(err) => {
            eprintln!("Could not open the library database: {}", err);
            std::process::exit(1);
        }
    };
    let search = SearchClient::new(std::env::var("BOOKS_API_KEY").ok());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Personal Library Manager");
    loop {
        println!();
        println!("  1) Home");
        println!("  2) Add Book");
        println!("  3) Manage Books");
        println!("  4) Statistics");
        println!("  5) Recommendations");
        println!("  6) Search");
        println!("  0) Quit");
        let Some(choice) = prompt(&mut lines, "Menu choice: ") else {
            break;
        };

        let result = match choice.trim() {
            "1" => home(),
            "2" => add_book(&store, &mut lines),
            "3" => manage_books(&store, &mut lines),
            "4" => statistics(&store),
            "5" => recommendations(&store),
            "6" => search_books(&search, &mut lines),
            "0" | "q" => break,
            other => {
                println!("Unknown choice: {}", other);
                Ok(())
            }
        };
        // Store failures are shown inline and never end the session.
        if let Err(err) = result {
            println!("{}", err);
        }
    }
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();
    lines.next()?.ok()
}

fn home() -> Result<(), StoreError> {
    println!("Manage your books, track what you've read, and get recommendations.");
    Ok(())
}

fn add_book(
    store: &CatalogStore,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<(), StoreError> {
    let Some(title) = prompt(lines, "Title: ") else {
        return Ok(());
    };
    let Some(author) = prompt(lines, "Author: ") else {
        return Ok(());
    };
    let Some(year_raw) = prompt(lines, "Publication year: ") else {
        return Ok(());
    };
    let Ok(year) = year_raw.trim().parse::<i64>() else {
        println!("Not a valid year: {}", year_raw.trim());
        return Ok(());
    };
    let Some(genre) = prompt(lines, "Genre: ") else {
        return Ok(());
    };
    let Some(read_raw) = prompt(lines, "Already read? [y/N]: ") else {
        return Ok(());
    };
    let read = matches!(read_raw.trim().to_ascii_lowercase().as_str(), "y" | "yes");

    let cover = match prompt(lines, "Cover image path (empty for none): ") {
        Some(path) if !path.trim().is_empty() => {
            let path = path.trim().to_string();
            match std::fs::read(&path) {
                Ok(bytes) => Some(CoverUpload {
                    file_name: Path::new(&path)
                        .file_name()
                        .map(|name| name.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.clone()),
                    bytes,
                }),
                Err(err) => {
                    println!("Could not read cover file, adding without it: {}", err);
                    None
                }
            }
        }
        _ => None,
    };

    let book = NewBook {
        title: title.trim().to_string(),
        author: author.trim().to_string(),
        year,
        genre: genre.trim().to_string(),
        read,
    };
    match store.add(book, cover) {
        Ok(_) => {
            println!("Added to the library.");
            Ok(())
        }
        Err(StoreError::DuplicateTitle(title)) => {
            println!("\"{}\" is already in the library.", title);
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn manage_books(
    store: &CatalogStore,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<(), StoreError> {
    let books = store.list_all()?;
    if books.is_empty() {
        println!("The library is empty.");
        return Ok(());
    }
    print_table(&books);

    println!("  r <id>  remove a book");
    println!("  i <id>  mark issued   /  a <id>  mark available");
    println!("  m <id>  mark read     /  u <id>  mark unread");
    let Some(action) = prompt(lines, "Action (empty to go back): ") else {
        return Ok(());
    };
    let action = action.trim();
    if action.is_empty() {
        return Ok(());
    }

    let mut parts = action.split_whitespace();
    let verb = parts.next().unwrap_or("");
    let Some(id) = parts.next().and_then(|raw| raw.parse::<i64>().ok()) else {
        println!("Expected a book id, e.g. \"r 3\".");
        return Ok(());
    };

    let found = match verb {
        "r" => store.remove(id)?,
        "i" => store.set_issued(id, true)?,
        "a" => store.set_issued(id, false)?,
        "m" => store.set_read(id, true)?,
        "u" => store.set_read(id, false)?,
        other => {
            println!("Unknown action: {}", other);
            return Ok(());
        }
    };
    if found {
        println!("Done.");
    } else {
        println!("No book with id {}.", id);
    }
    Ok(())
}

fn print_table(books: &[Book]) {
    println!(
        "{:>4}  {:<40} {:<24} {:>6}  {:<16} {:<7} {}",
        "ID", "Title", "Author", "Year", "Genre", "Status", "Issued"
    );
    for book in books {
        println!(
            "{:>4}  {:<40} {:<24} {:>6}  {:<16} {:<7} {}",
            book.id,
            truncate(&book.title, 40),
            truncate(&book.author, 24),
            book.year,
            truncate(&book.genre, 16),
            if book.read { "Read" } else { "Unread" },
            if book.issued { "Issued" } else { "Available" },
        );
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let shortened: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", shortened)
    }
}

fn statistics(store: &CatalogStore) -> Result<(), StoreError> {
    let books = store.list_all()?;
    let stats = library_stats(&books);
    println!("Total books: {}", stats.total);
    println!(
        "Books read:  {} ({:.2}%)",
        stats.read_count, stats.read_percentage
    );
    if stats.genre_counts.is_empty() {
        println!("No books in the library. Add books to see genre distribution.");
    } else {
        println!("Genres:");
        for (genre, count) in &stats.genre_counts {
            println!("  {:<20} {}", genre, count);
        }
    }
    Ok(())
}

fn recommendations(store: &CatalogStore) -> Result<(), StoreError> {
    let books = store.list_all()?;
    match recommend_unread(&books) {
        Some(book) => println!(
            "We recommend you read \"{}\" by {} ({}) - {}",
            book.title, book.author, book.year, book.genre
        ),
        None => println!("You've read all the books in your library!"),
    }
    Ok(())
}

fn search_books(
    search: &SearchClient,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<(), StoreError> {
    let Some(query) = prompt(lines, "Search books: ") else {
        return Ok(());
    };
    let query = query.trim();
    if query.is_empty() {
        return Ok(());
    }

    let outcome = search.search(query);
    if let Some(failure) = outcome.failure {
        println!("{}", failure);
        return Ok(());
    }
    if outcome.hits.is_empty() {
        println!("No books found. Try another search term.");
        return Ok(());
    }
    for hit in &outcome.hits {
        println!("{} by {}", hit.title, hit.authors.join(", "));
        println!("  {}", hit.info_link);
        if let Some(thumbnail) = &hit.thumbnail {
            println!("  cover: {}", thumbnail);
        }
        if let Some(description) = &hit.description {
            println!("  {}", truncate(description, 200));
        }
    }
    Ok(())
}
