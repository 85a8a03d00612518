//! Port for user lookups.
//!
//! The domain never writes users; it only needs listings, by-key fetches and
//! the existence probe that guards comment and article authorship.

use async_trait::async_trait;

use crate::domain::user::User;

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
    }
}

/// Port for user retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch all users.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Fetch one user by username.
    async fn find_by_username(&self, username: &str)
    -> Result<Option<User>, UserRepositoryError>;

    /// Cheap existence probe guarding authorship references.
    async fn exists(&self, username: &str) -> Result<bool, UserRepositoryError>;
}
