//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text, Timestamptz};

use crate::domain::{Article, ArticleDetail, ArticleSummary, Comment, Topic, User};

use super::schema::{articles, comments, topics, users};

/// Row struct for reading from the topics table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = topics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TopicRow {
    pub slug: String,
    pub description: String,
}

impl From<TopicRow> for Topic {
    fn from(row: TopicRow) -> Self {
        Self {
            slug: row.slug,
            description: row.description,
        }
    }
}

/// Insertable struct for creating new topic records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = topics)]
pub(crate) struct NewTopicRow<'a> {
    pub slug: &'a str,
    pub description: &'a str,
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            username: row.username,
            name: row.name,
            avatar_url: row.avatar_url,
        }
    }
}

/// Row struct for reading whole article rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArticleRow {
    pub article_id: i64,
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub votes: i32,
    pub article_img_url: String,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Self {
            article_id: row.article_id,
            title: row.title,
            topic: row.topic,
            author: row.author,
            body: row.body,
            created_at: row.created_at,
            votes: row.votes,
            article_img_url: row.article_img_url,
        }
    }
}

/// Insertable struct for creating new article records.
///
/// `votes`, `created_at` and (when `None`) `article_img_url` fall back to
/// the column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = articles)]
pub(crate) struct NewArticleRow<'a> {
    pub title: &'a str,
    pub topic: &'a str,
    pub author: &'a str,
    pub body: &'a str,
    pub article_img_url: Option<&'a str>,
}

/// Row struct for the aggregate article listing (`sql_query` result).
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct ArticleSummaryRow {
    #[diesel(sql_type = BigInt)]
    pub article_id: i64,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub topic: String,
    #[diesel(sql_type = Text)]
    pub author: String,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = Integer)]
    pub votes: i32,
    #[diesel(sql_type = Text)]
    pub article_img_url: String,
    #[diesel(sql_type = BigInt)]
    pub comment_count: i64,
}

impl From<ArticleSummaryRow> for ArticleSummary {
    fn from(row: ArticleSummaryRow) -> Self {
        Self {
            article_id: row.article_id,
            title: row.title,
            topic: row.topic,
            author: row.author,
            created_at: row.created_at,
            votes: row.votes,
            article_img_url: row.article_img_url,
            comment_count: row.comment_count,
        }
    }
}

/// Row struct for the aggregate by-id fetch (`sql_query` result).
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct ArticleDetailRow {
    #[diesel(sql_type = BigInt)]
    pub article_id: i64,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub topic: String,
    #[diesel(sql_type = Text)]
    pub author: String,
    #[diesel(sql_type = Text)]
    pub body: String,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = Integer)]
    pub votes: i32,
    #[diesel(sql_type = Text)]
    pub article_img_url: String,
    #[diesel(sql_type = BigInt)]
    pub comment_count: i64,
}

impl From<ArticleDetailRow> for ArticleDetail {
    fn from(row: ArticleDetailRow) -> Self {
        Self {
            article_id: row.article_id,
            title: row.title,
            topic: row.topic,
            author: row.author,
            body: row.body,
            created_at: row.created_at,
            votes: row.votes,
            article_img_url: row.article_img_url,
            comment_count: row.comment_count,
        }
    }
}

/// Row struct for reading from the comments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub comment_id: i64,
    pub article_id: i64,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub votes: i32,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            comment_id: row.comment_id,
            article_id: row.article_id,
            author: row.author,
            body: row.body,
            created_at: row.created_at,
            votes: row.votes,
        }
    }
}

/// Insertable struct for creating new comment records.
///
/// `votes` and `created_at` fall back to the column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub article_id: i64,
    pub author: &'a str,
    pub body: &'a str,
}
