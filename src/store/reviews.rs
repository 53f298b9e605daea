//! Review queries

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{Review, ReviewCreate};
use crate::store::{Database, StoreError};

const REVIEW_COLUMNS: &str = "id, book_id, reviewer_name, content, rating";

pub(crate) fn review_from_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get(0)?,
        book_id: row.get(1)?,
        reviewer_name: row.get(2)?,
        content: row.get(3)?,
        rating: row.get(4)?,
    })
}

pub(crate) fn reviews_for_book(conn: &Connection, book_id: i64) -> rusqlite::Result<Vec<Review>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM reviews WHERE book_id = ?1 ORDER BY id",
        REVIEW_COLUMNS
    ))?;
    let rows = stmt.query_map(params![book_id], review_from_row)?;
    rows.collect()
}

fn load_review(conn: &Connection, book_id: i64, review_id: i64) -> rusqlite::Result<Option<Review>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM reviews WHERE id = ?1 AND book_id = ?2",
            REVIEW_COLUMNS
        ),
        params![review_id, book_id],
        review_from_row,
    )
    .optional()
}

impl Database {
    pub async fn list_reviews_for_book(&self, book_id: i64) -> Result<Vec<Review>, StoreError> {
        self.call(move |conn| reviews_for_book(conn, book_id)).await
    }

    /// Review `review_id` if it belongs to `book_id`.
    pub async fn get_review(
        &self,
        book_id: i64,
        review_id: i64,
    ) -> Result<Option<Review>, StoreError> {
        self.call(move |conn| load_review(conn, book_id, review_id))
            .await
    }

    pub async fn insert_review(
        &self,
        book_id: i64,
        review: ReviewCreate,
    ) -> Result<Review, StoreError> {
        self.call(move |conn| {
            conn.execute(
                "INSERT INTO reviews (book_id, reviewer_name, content, rating) VALUES (?1, ?2, ?3, ?4)",
                params![book_id, review.reviewer_name, review.content, review.rating],
            )?;
            Ok(Review {
                id: conn.last_insert_rowid(),
                book_id,
                reviewer_name: review.reviewer_name,
                content: review.content,
                rating: review.rating,
            })
        })
        .await
    }

    /// Writes all fields of `review`. Returns `None` if no review with that id
    /// belongs to `review.book_id`.
    pub async fn update_review(&self, review: Review) -> Result<Option<Review>, StoreError> {
        self.call(move |conn| {
            let changed = conn.execute(
                "UPDATE reviews SET reviewer_name = ?1, content = ?2, rating = ?3 WHERE id = ?4 AND book_id = ?5",
                params![
                    review.reviewer_name,
                    review.content,
                    review.rating,
                    review.id,
                    review.book_id
                ],
            )?;
            Ok((changed > 0).then_some(review))
        })
        .await
    }

    pub async fn delete_review(&self, book_id: i64, review_id: i64) -> Result<bool, StoreError> {
        self.call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM reviews WHERE id = ?1 AND book_id = ?2",
                params![review_id, book_id],
            )?;
            Ok(deleted > 0)
        })
        .await
    }
}
