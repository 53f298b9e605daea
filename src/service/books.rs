//! Book service
//!
//! Cache-aside listing plus the book mutations, each of which invalidates the
//! listing after it commits.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{
    CacheGateway, ListingCounters, ListingStats, DEFAULT_LISTING_TTL, LISTING_KEY,
};
use crate::config::ReadFailurePolicy;
use crate::error::{Result, ServiceError};
use crate::models::{Book, BookCreate, BookPatch};
use crate::service::invalidation::invalidate_listing;
use crate::store::Database;

/// Book operations over the database and the listing cache.
///
/// Cheap to clone; clones share the same database, cache and counters.
#[derive(Clone)]
pub struct BookService {
    db: Database,
    cache: CacheGateway,
    counters: Arc<ListingCounters>,
    ttl: Duration,
    read_failure_policy: ReadFailurePolicy,
}

impl BookService {
    /// Creates a service with the default listing TTL and fail-closed reads.
    pub fn new(db: Database, cache: CacheGateway) -> Self {
        Self {
            db,
            cache,
            counters: Arc::new(ListingCounters::new()),
            ttl: DEFAULT_LISTING_TTL,
            read_failure_policy: ReadFailurePolicy::FailClosed,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_read_failure_policy(mut self, policy: ReadFailurePolicy) -> Self {
        self.read_failure_policy = policy;
        self
    }

    // == Listing ==
    /// Returns every book with its reviews.
    ///
    /// A cached snapshot is returned verbatim. On a miss the database is read,
    /// the snapshot is repopulated on a best-effort basis, and the database
    /// result is returned whether or not the populate succeeded. If the cache
    /// cannot be reached the call fails with `CacheUnavailable` unless the
    /// service was built with [`ReadFailurePolicy::FallThrough`].
    pub async fn list_books(&self) -> Result<Vec<Book>> {
        match self.cache.get::<Vec<Book>>(LISTING_KEY).await {
            Ok(Some(books)) => {
                self.counters.record_hit();
                debug!(count = books.len(), "Listing served from cache");
                return Ok(books);
            }
            Ok(None) => {
                self.counters.record_miss();
                debug!("Listing cache miss");
            }
            Err(e) => {
                self.counters.record_read_failure();
                match self.read_failure_policy {
                    ReadFailurePolicy::FailClosed => return Err(ServiceError::CacheUnavailable(e)),
                    ReadFailurePolicy::FallThrough => {
                        warn!(error = %e, "Cache unreachable, reading listing from database");
                    }
                }
            }
        }

        let books = self.db.list_books_with_reviews().await?;

        if let Err(e) = self.cache.set(LISTING_KEY, &books, self.ttl).await {
            self.counters.record_populate_failure();
            warn!(error = %e, "Failed to populate listing cache");
        }

        Ok(books)
    }

    /// Reads a single book straight from the database.
    pub async fn get_book(&self, book_id: i64) -> Result<Book> {
        self.db
            .get_book(book_id)
            .await?
            .ok_or_else(|| ServiceError::book_not_found(book_id))
    }

    pub async fn book_exists(&self, book_id: i64) -> Result<bool> {
        Ok(self.db.book_exists(book_id).await?)
    }

    // == Mutations ==
    pub async fn create_book(&self, req: BookCreate) -> Result<Book> {
        if let Some(msg) = req.validate() {
            return Err(ServiceError::InvalidRequest(msg));
        }

        let book = self.db.insert_book(req).await?;
        invalidate_listing(&self.cache, &self.counters).await;

        info!(book_id = book.id, "Book created");
        Ok(book)
    }

    /// Overwrites every scalar field of an existing book.
    pub async fn replace_book(&self, book_id: i64, req: BookCreate) -> Result<Book> {
        if let Some(msg) = req.validate() {
            return Err(ServiceError::InvalidRequest(msg));
        }

        let mut book = self.get_book(book_id).await?;
        book.title = req.title;
        book.author = req.author;
        book.description = req.description;

        self.write_book(book).await
    }

    /// Applies only the fields present in `patch`.
    pub async fn patch_book(&self, book_id: i64, patch: BookPatch) -> Result<Book> {
        if let Some(msg) = patch.validate() {
            return Err(ServiceError::InvalidRequest(msg));
        }

        let mut book = self.get_book(book_id).await?;
        patch.merge_into(&mut book);

        self.write_book(book).await
    }

    async fn write_book(&self, book: Book) -> Result<Book> {
        let book_id = book.id;
        let updated = self
            .db
            .update_book(book)
            .await?
            .ok_or_else(|| ServiceError::book_not_found(book_id))?;
        invalidate_listing(&self.cache, &self.counters).await;

        info!(book_id, "Book updated");
        Ok(updated)
    }

    /// Deletes a book together with its reviews.
    pub async fn delete_book(&self, book_id: i64) -> Result<()> {
        if !self.db.delete_book(book_id).await? {
            return Err(ServiceError::book_not_found(book_id));
        }
        invalidate_listing(&self.cache, &self.counters).await;

        info!(book_id, "Book deleted");
        Ok(())
    }

    /// Deletes every review and every book.
    ///
    /// Returns `(books_deleted, reviews_deleted)`.
    pub async fn reset(&self) -> Result<(usize, usize)> {
        let (books, reviews) = self.db.delete_all().await?;
        invalidate_listing(&self.cache, &self.counters).await;

        info!(books, reviews, "All books and reviews deleted");
        Ok((books, reviews))
    }

    pub fn stats(&self) -> ListingStats {
        self.counters.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{KeyValueStore, KvError, MemoryStore};
    use async_trait::async_trait;

    /// Reads always miss; writes always fail.
    struct WriteFailingStore;

    #[async_trait]
    impl KeyValueStore for WriteFailingStore {
        async fn get(&self, _key: &str) -> std::result::Result<Option<Vec<u8>>, KvError> {
            Ok(None)
        }

        async fn set(
            &self,
            _key: &str,
            _value: Vec<u8>,
            _ttl: Duration,
        ) -> std::result::Result<(), KvError> {
            Err(KvError::Command("READONLY".to_string()))
        }

        async fn delete(&self, _key: &str) -> std::result::Result<(), KvError> {
            Err(KvError::Command("READONLY".to_string()))
        }

        fn name(&self) -> &'static str {
            "write-failing"
        }
    }

    /// Every call fails.
    struct DownStore;

    #[async_trait]
    impl KeyValueStore for DownStore {
        async fn get(&self, _key: &str) -> std::result::Result<Option<Vec<u8>>, KvError> {
            Err(KvError::Timeout(Duration::from_millis(1000)))
        }

        async fn set(
            &self,
            _key: &str,
            _value: Vec<u8>,
            _ttl: Duration,
        ) -> std::result::Result<(), KvError> {
            Err(KvError::Timeout(Duration::from_millis(1000)))
        }

        async fn delete(&self, _key: &str) -> std::result::Result<(), KvError> {
            Err(KvError::Timeout(Duration::from_millis(1000)))
        }

        fn name(&self) -> &'static str {
            "down"
        }
    }

    fn book(title: &str) -> BookCreate {
        BookCreate {
            title: title.to_string(),
            author: "A".to_string(),
            description: None,
        }
    }

    fn service_with(store: Arc<dyn KeyValueStore>) -> BookService {
        BookService::new(
            Database::open_in_memory().unwrap(),
            CacheGateway::new(store),
        )
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let service = service_with(Arc::new(MemoryStore::new()));
        service.create_book(book("T")).await.unwrap();

        let first = service.list_books().await.unwrap();
        let second = service.list_books().await.unwrap();

        assert_eq!(first, second);
        let stats = service.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_hit_is_returned_verbatim() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(store.clone());
        service.create_book(book("In database")).await.unwrap();

        // Plant a snapshot that disagrees with the database
        let planted = vec![Book {
            id: 999,
            title: "Only in cache".to_string(),
            author: "X".to_string(),
            description: None,
            reviews: Vec::new(),
        }];
        CacheGateway::new(store)
            .set(LISTING_KEY, &planted, DEFAULT_LISTING_TTL)
            .await
            .unwrap();

        assert_eq!(service.list_books().await.unwrap(), planted);
    }

    #[tokio::test]
    async fn test_populate_failure_still_returns_database_result() {
        let service = service_with(Arc::new(WriteFailingStore));
        let created = service.create_book(book("T")).await.unwrap();

        let books = service.list_books().await.unwrap();

        assert_eq!(books, vec![created]);
        let stats = service.stats();
        assert_eq!(stats.populate_failures, 1);
        assert_eq!(stats.invalidation_failures, 1);
    }

    #[tokio::test]
    async fn test_read_failure_is_fail_closed_by_default() {
        let service = service_with(Arc::new(DownStore));

        let result = service.list_books().await;

        assert!(matches!(result, Err(ServiceError::CacheUnavailable(_))));
        assert_eq!(service.stats().read_failures, 1);
    }

    #[tokio::test]
    async fn test_read_failure_fall_through_policy() {
        let service = service_with(Arc::new(DownStore))
            .with_read_failure_policy(ReadFailurePolicy::FallThrough);
        let created = service.create_book(book("T")).await.unwrap();

        assert_eq!(service.list_books().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_writes_succeed_with_cache_down() {
        let service = service_with(Arc::new(DownStore));

        let created = service.create_book(book("T")).await.unwrap();
        let patched = service
            .patch_book(
                created.id,
                BookPatch {
                    author: Some("B".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.author, "B");
        assert_eq!(service.get_book(created.id).await.unwrap().author, "B");

        service.delete_book(created.id).await.unwrap();
        assert!(!service.book_exists(created.id).await.unwrap());
        assert_eq!(service.stats().invalidation_failures, 3);
    }

    #[tokio::test]
    async fn test_each_book_write_invalidates() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(store.clone());
        let created = service.create_book(book("T")).await.unwrap();

        let writes: [&str; 4] = ["replace", "patch", "delete", "reset"];
        for write in writes {
            service.list_books().await.unwrap();
            assert!(store.get(LISTING_KEY).await.unwrap().is_some());

            match write {
                "replace" => {
                    service.replace_book(created.id, book("R")).await.unwrap();
                }
                "patch" => {
                    service
                        .patch_book(created.id, BookPatch::default())
                        .await
                        .unwrap();
                }
                "delete" => service.delete_book(created.id).await.unwrap(),
                _ => {
                    service.reset().await.unwrap();
                }
            }

            assert!(
                store.get(LISTING_KEY).await.unwrap().is_none(),
                "{} left the listing cached",
                write
            );
        }
    }

    #[tokio::test]
    async fn test_missing_book_errors() {
        let service = service_with(Arc::new(MemoryStore::new()));

        assert!(matches!(
            service.get_book(5).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.replace_book(5, book("x")).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.patch_book(5, BookPatch::default()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_book(5).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_book_not_persisted() {
        let service = service_with(Arc::new(MemoryStore::new()));

        let result = service.create_book(book("")).await;

        assert!(matches!(result, Err(ServiceError::InvalidRequest(_))));
        assert!(service.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_ttl_applies_to_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(store.clone()).with_ttl(Duration::from_secs(30));

        service.list_books().await.unwrap();

        let remaining = store.ttl_remaining(LISTING_KEY).await.unwrap();
        assert!(remaining <= Duration::from_secs(30));
        assert!(remaining > Duration::from_secs(25));
    }
}
