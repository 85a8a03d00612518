//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// News topics, keyed by slug.
    topics (slug) {
        /// Unique identifier, referenced by articles.
        slug -> Varchar,
        /// Short description shown in topic listings.
        description -> Varchar,
    }
}

diesel::table! {
    /// User accounts, keyed by username.
    users (username) {
        /// Unique identifier, referenced by articles and comments.
        username -> Varchar,
        /// Display name.
        name -> Varchar,
        /// Avatar image location.
        avatar_url -> Varchar,
    }
}

diesel::table! {
    /// Articles.
    articles (article_id) {
        /// Primary key (BIGSERIAL).
        article_id -> Int8,
        title -> Varchar,
        /// References `topics.slug`.
        topic -> Varchar,
        /// References `users.username`.
        author -> Varchar,
        body -> Text,
        created_at -> Timestamptz,
        votes -> Int4,
        article_img_url -> Varchar,
    }
}

diesel::table! {
    /// Comments on articles.
    comments (comment_id) {
        /// Primary key (BIGSERIAL).
        comment_id -> Int8,
        /// References `articles.article_id`; cascades on article deletion.
        article_id -> Int8,
        /// References `users.username`.
        author -> Varchar,
        body -> Text,
        created_at -> Timestamptz,
        votes -> Int4,
    }
}

diesel::joinable!(comments -> articles (article_id));

diesel::allow_tables_to_appear_in_same_query!(topics, users, articles, comments);
