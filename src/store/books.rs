//! Book queries

use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{Book, BookCreate, Review};
use crate::store::reviews::{review_from_row, reviews_for_book};
use crate::store::{Database, StoreError};

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        description: row.get(3)?,
        reviews: Vec::new(),
    })
}

pub(crate) fn load_book(conn: &Connection, id: i64) -> rusqlite::Result<Option<Book>> {
    let book = conn
        .query_row(
            "SELECT id, title, author, description FROM books WHERE id = ?1",
            params![id],
            book_from_row,
        )
        .optional()?;

    match book {
        Some(mut book) => {
            book.reviews = reviews_for_book(conn, id)?;
            Ok(Some(book))
        }
        None => Ok(None),
    }
}

impl Database {
    /// All books ordered by id, each with its reviews ordered by id.
    pub async fn list_books_with_reviews(&self) -> Result<Vec<Book>, StoreError> {
        self.call(|conn| {
            let mut books: Vec<Book> = {
                let mut stmt =
                    conn.prepare("SELECT id, title, author, description FROM books ORDER BY id")?;
                let rows = stmt.query_map([], book_from_row)?;
                rows.collect::<rusqlite::Result<_>>()?
            };

            let mut by_book: HashMap<i64, Vec<Review>> = HashMap::new();
            {
                let mut stmt = conn.prepare(
                    "SELECT id, book_id, reviewer_name, content, rating FROM reviews ORDER BY id",
                )?;
                let rows = stmt.query_map([], review_from_row)?;
                for review in rows {
                    let review = review?;
                    by_book.entry(review.book_id).or_default().push(review);
                }
            }

            for book in &mut books {
                if let Some(reviews) = by_book.remove(&book.id) {
                    book.reviews = reviews;
                }
            }
            Ok(books)
        })
        .await
    }

    pub async fn get_book(&self, id: i64) -> Result<Option<Book>, StoreError> {
        self.call(move |conn| load_book(conn, id)).await
    }

    pub async fn book_exists(&self, id: i64) -> Result<bool, StoreError> {
        self.call(move |conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM books WHERE id = ?1)",
                params![id],
                |row| row.get(0),
            )
        })
        .await
    }

    /// Inserts a new book and returns it as committed.
    pub async fn insert_book(&self, book: BookCreate) -> Result<Book, StoreError> {
        self.call(move |conn| {
            conn.execute(
                "INSERT INTO books (title, author, description) VALUES (?1, ?2, ?3)",
                params![book.title, book.author, book.description],
            )?;
            Ok(Book {
                id: conn.last_insert_rowid(),
                title: book.title,
                author: book.author,
                description: book.description,
                reviews: Vec::new(),
            })
        })
        .await
    }

    /// Writes the scalar fields of `book`. Returns the stored book with its
    /// reviews, or `None` if no book has that id.
    pub async fn update_book(&self, book: Book) -> Result<Option<Book>, StoreError> {
        self.call(move |conn| {
            let changed = conn.execute(
                "UPDATE books SET title = ?1, author = ?2, description = ?3 WHERE id = ?4",
                params![book.title, book.author, book.description, book.id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            load_book(conn, book.id)
        })
        .await
    }

    /// Deletes a book and its reviews. Returns false if no book has that id.
    pub async fn delete_book(&self, id: i64) -> Result<bool, StoreError> {
        self.call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM reviews WHERE book_id = ?1", params![id])?;
            let deleted = tx.execute("DELETE FROM books WHERE id = ?1", params![id])?;
            tx.commit()?;
            Ok(deleted > 0)
        })
        .await
    }

    /// Deletes every review and every book in one transaction.
    ///
    /// Returns `(books_deleted, reviews_deleted)`.
    pub async fn delete_all(&self) -> Result<(usize, usize), StoreError> {
        self.call(|conn| {
            let tx = conn.transaction()?;
            let reviews = tx.execute("DELETE FROM reviews", [])?;
            let books = tx.execute("DELETE FROM books", [])?;
            tx.commit()?;
            Ok((books, reviews))
        })
        .await
    }
}
