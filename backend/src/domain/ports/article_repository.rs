//! Port for article persistence.
//!
//! Covers the article query shapes the domain needs: the filtered, sorted
//! aggregate listing, the by-id aggregate fetch, the existence probe used as
//! a pre-mutation guard, the single-statement vote increment and the insert.

use async_trait::async_trait;

use crate::domain::article::{
    Article, ArticleDetail, ArticleFilter, ArticleSummary, NewArticle, SortColumn, SortOrder,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by article repository adapters.
    pub enum ArticleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "article repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "article repository query failed: {message}",
        /// An insert referenced a topic or user the store does not hold.
        ForeignKey { message: String } =>
            "article insert violated a reference: {message}",
    }
}

/// Port for article storage and retrieval.
///
/// Zero rows are never an error at this level: `find_by_id` and
/// `increment_votes` return `None` for a missing row and `list` returns an
/// empty vec when the filters match nothing. The service layer decides which
/// of those become 404s.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Run the aggregate listing: one query joining comments, grouped per
    /// article, optionally filtered, ordered by the validated column and
    /// direction.
    async fn list(
        &self,
        sort: SortColumn,
        order: SortOrder,
        filter: ArticleFilter,
    ) -> Result<Vec<ArticleSummary>, ArticleRepositoryError>;

    /// Fetch one article with its aggregated comment count.
    async fn find_by_id(
        &self,
        article_id: i64,
    ) -> Result<Option<ArticleDetail>, ArticleRepositoryError>;

    /// Cheap existence probe used to produce clean 404s before mutation.
    async fn exists(&self, article_id: i64) -> Result<bool, ArticleRepositoryError>;

    /// Atomic `votes = votes + delta` update returning the updated row, or
    /// `None` when the row vanished between check and update.
    async fn increment_votes(
        &self,
        article_id: i64,
        delta: i32,
    ) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Insert a new article; `votes`, `created_at` and a missing image URL
    /// are defaulted by the store.
    async fn insert(&self, article: NewArticle) -> Result<Article, ArticleRepositoryError>;
}
