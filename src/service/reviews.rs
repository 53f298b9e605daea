//! Review service
//!
//! Review writes go straight to the database and leave the book listing cache
//! alone, so a cached listing keeps showing the old reviews until it expires
//! or a book write invalidates it.

use tracing::info;

use crate::error::{Result, ServiceError};
use crate::models::{Review, ReviewCreate, ReviewPatch};
use crate::store::Database;

#[derive(Clone)]
pub struct ReviewService {
    db: Database,
}

impl ReviewService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn ensure_book(&self, book_id: i64) -> Result<()> {
        if self.db.book_exists(book_id).await? {
            Ok(())
        } else {
            Err(ServiceError::book_not_found(book_id))
        }
    }

    pub async fn list_reviews(&self, book_id: i64) -> Result<Vec<Review>> {
        self.ensure_book(book_id).await?;
        Ok(self.db.list_reviews_for_book(book_id).await?)
    }

    pub async fn get_review(&self, book_id: i64, review_id: i64) -> Result<Review> {
        self.ensure_book(book_id).await?;
        self.db
            .get_review(book_id, review_id)
            .await?
            .ok_or_else(|| ServiceError::review_not_found(review_id))
    }

    /// Adds a review to an existing book. Validation runs before the book
    /// lookup so a bad body never reaches the database.
    pub async fn create_review(&self, book_id: i64, req: ReviewCreate) -> Result<Review> {
        if let Some(msg) = req.validate() {
            return Err(ServiceError::InvalidRequest(msg));
        }
        self.ensure_book(book_id).await?;

        let review = self.db.insert_review(book_id, req).await?;
        info!(book_id, review_id = review.id, "Review created");
        Ok(review)
    }

    pub async fn replace_review(
        &self,
        book_id: i64,
        review_id: i64,
        req: ReviewCreate,
    ) -> Result<Review> {
        if let Some(msg) = req.validate() {
            return Err(ServiceError::InvalidRequest(msg));
        }

        let mut review = self.get_review(book_id, review_id).await?;
        review.reviewer_name = req.reviewer_name;
        review.content = req.content;
        review.rating = req.rating;

        self.write_review(review).await
    }

    pub async fn patch_review(
        &self,
        book_id: i64,
        review_id: i64,
        patch: ReviewPatch,
    ) -> Result<Review> {
        if let Some(msg) = patch.validate() {
            return Err(ServiceError::InvalidRequest(msg));
        }

        let mut review = self.get_review(book_id, review_id).await?;
        patch.merge_into(&mut review);

        self.write_review(review).await
    }

    async fn write_review(&self, review: Review) -> Result<Review> {
        let review_id = review.id;
        let updated = self
            .db
            .update_review(review)
            .await?
            .ok_or_else(|| ServiceError::review_not_found(review_id))?;

        info!(book_id = updated.book_id, review_id, "Review updated");
        Ok(updated)
    }

    pub async fn delete_review(&self, book_id: i64, review_id: i64) -> Result<()> {
        self.ensure_book(book_id).await?;
        if !self.db.delete_review(book_id, review_id).await? {
            return Err(ServiceError::review_not_found(review_id));
        }

        info!(book_id, review_id, "Review deleted");
        Ok(())
    }
}
