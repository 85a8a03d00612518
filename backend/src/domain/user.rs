//! User data model.
//!
//! Users are keyed by username; articles and comments reference them by that
//! key. Authentication attributes live outside the domain.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A user row as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier, referenced by articles and comments.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Avatar image location.
    pub avatar_url: String,
}
