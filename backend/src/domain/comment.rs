//! Comment data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored comment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    /// Generated primary key.
    pub comment_id: i64,
    /// The article this comment belongs to.
    pub article_id: i64,
    /// Username of the commenting user.
    pub author: String,
    pub body: String,
    /// Immutable creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Running vote tally; may go negative.
    pub votes: i32,
}

/// A comment insertion payload.
///
/// The author and body have already passed the boundary validators
/// ([`crate::domain::validation`]); existence of the article and the user is
/// checked by the service before this reaches the store. `votes` and
/// `created_at` are defaulted by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub article_id: i64,
    pub author: String,
    pub body: String,
}
