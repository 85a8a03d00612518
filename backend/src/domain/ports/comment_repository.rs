//! Port for comment persistence.

use async_trait::async_trait;
use pagination::{PageWindow, Paginated};

use crate::domain::comment::{Comment, NewComment};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "comment repository query failed: {message}",
        /// An insert referenced an article or user the store does not hold.
        ForeignKey { message: String } =>
            "comment insert violated a reference: {message}",
    }
}

/// Port for comment storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Fetch an article's comments newest-first, optionally windowed, plus
    /// the total count of the unpaged result.
    async fn list_for_article(
        &self,
        article_id: i64,
        window: Option<PageWindow>,
    ) -> Result<Paginated<Comment>, CommentRepositoryError>;

    /// Fetch one comment by id.
    async fn find_by_id(&self, comment_id: i64)
    -> Result<Option<Comment>, CommentRepositoryError>;

    /// Cheap existence probe used to produce clean 404s before mutation.
    async fn exists(&self, comment_id: i64) -> Result<bool, CommentRepositoryError>;

    /// Insert a new comment; `votes` and `created_at` are defaulted by the
    /// store. The store's foreign keys back up the service's existence
    /// checks; a violation surfaces as [`CommentRepositoryError::ForeignKey`].
    async fn insert(&self, comment: NewComment) -> Result<Comment, CommentRepositoryError>;

    /// Atomic `votes = votes + delta` update returning the updated row, or
    /// `None` when the row vanished between check and update.
    async fn increment_votes(
        &self,
        comment_id: i64,
        delta: i32,
    ) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Delete one comment; `false` when no row was affected.
    async fn delete(&self, comment_id: i64) -> Result<bool, CommentRepositoryError>;
}
