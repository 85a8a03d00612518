//! Article data model and listing vocabulary.
//!
//! Three row shapes cover the API surface: [`Article`] (the stored row,
//! returned by mutations), [`ArticleDetail`] (the row plus its aggregated
//! `comment_count`) and [`ArticleSummary`] (the listing shape, which drops
//! the body). `comment_count` is always computed by aggregation, never
//! stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored article row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Article {
    /// Generated primary key.
    pub article_id: i64,
    pub title: String,
    /// Slug of the owning topic.
    pub topic: String,
    /// Username of the authoring user.
    pub author: String,
    pub body: String,
    /// Immutable creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Running vote tally; may go negative.
    pub votes: i32,
    pub article_img_url: String,
}

/// An article row joined with its comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ArticleDetail {
    pub article_id: i64,
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub votes: i32,
    pub article_img_url: String,
    /// Number of comments on this article.
    pub comment_count: i64,
}

/// The listing shape: no body, with the aggregated comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ArticleSummary {
    pub article_id: i64,
    pub title: String,
    pub topic: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub votes: i32,
    pub article_img_url: String,
    /// Number of comments on this article.
    pub comment_count: i64,
}

/// Optional equality filters applied to the article listing.
///
/// Both values have been validated for presence by the caller; existence of
/// the referenced topic/author is checked separately so an unknown filter key
/// yields a 404 rather than a silently empty listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    /// Restrict to articles in this topic.
    pub topic: Option<String>,
    /// Restrict to articles by this author.
    pub author: Option<String>,
}

/// Validation errors returned by [`NewArticle::try_from_parts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArticleValidationError {
    #[error("title must be a non-empty string")]
    EmptyTitle,
    #[error("topic must be a non-empty string")]
    EmptyTopic,
    #[error("author must be a non-empty string")]
    EmptyAuthor,
    #[error("body must be a non-empty string")]
    EmptyBody,
    #[error("article_img_url must not be empty when provided")]
    EmptyImageUrl,
}

/// A validated article insertion payload.
///
/// `votes` and `created_at` are defaulted by the store; an absent image URL
/// falls back to the store's default placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    title: String,
    topic: String,
    author: String,
    body: String,
    article_img_url: Option<String>,
}

impl NewArticle {
    /// Validate and construct an article payload from raw request fields.
    ///
    /// # Errors
    ///
    /// Returns [`ArticleValidationError`] when a required field is empty
    /// after trimming, or when an image URL is present but empty.
    pub fn try_from_parts(
        title: &str,
        topic: &str,
        author: &str,
        body: &str,
        article_img_url: Option<&str>,
    ) -> Result<Self, ArticleValidationError> {
        if title.trim().is_empty() {
            return Err(ArticleValidationError::EmptyTitle);
        }
        if topic.trim().is_empty() {
            return Err(ArticleValidationError::EmptyTopic);
        }
        if author.trim().is_empty() {
            return Err(ArticleValidationError::EmptyAuthor);
        }
        if body.trim().is_empty() {
            return Err(ArticleValidationError::EmptyBody);
        }
        if article_img_url.is_some_and(|url| url.trim().is_empty()) {
            return Err(ArticleValidationError::EmptyImageUrl);
        }
        Ok(Self {
            title: title.to_owned(),
            topic: topic.to_owned(),
            author: author.to_owned(),
            body: body.to_owned(),
            article_img_url: article_img_url.map(str::to_owned),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn article_img_url(&self) -> Option<&str> {
        self.article_img_url.as_deref()
    }
}

/// Columns the article listing may be ordered by.
///
/// This is the closed whitelist that keeps user input out of query
/// structure: the listing query interpolates [`SortColumn::as_sql`] and
/// nothing else. Values are always bound parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    ArticleId,
    Title,
    Author,
    Body,
    Topic,
    CreatedAt,
    Votes,
    CommentCount,
}

impl SortColumn {
    /// Parse a query-parameter value; `None` for anything off the whitelist.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "article_id" => Some(Self::ArticleId),
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            "body" => Some(Self::Body),
            "topic" => Some(Self::Topic),
            "created_at" => Some(Self::CreatedAt),
            "votes" => Some(Self::Votes),
            "comment_count" => Some(Self::CommentCount),
            _ => None,
        }
    }

    /// The ORDER BY target for this column.
    ///
    /// `comment_count` is the aggregate's output alias; every other column is
    /// qualified against the articles table.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::ArticleId => "articles.article_id",
            Self::Title => "articles.title",
            Self::Author => "articles.author",
            Self::Body => "articles.body",
            Self::Topic => "articles.topic",
            Self::CreatedAt => "articles.created_at",
            Self::Votes => "articles.votes",
            Self::CommentCount => "comment_count",
        }
    }
}

/// Direction of the article listing's single ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse a query-parameter value case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    /// The ORDER BY direction keyword.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}
