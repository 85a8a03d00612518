//! User domain operations.

use std::sync::Arc;

use crate::domain::error::Error;
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::User;

/// User operations: the listing and the by-key fetch.
#[derive(Clone)]
pub struct UsersService {
    users: Arc<dyn UserRepository>,
}

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
    }
}

impl UsersService {
    /// Create a new service backed by the given repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Fetch all users.
    ///
    /// # Errors
    ///
    /// Propagates repository failures mapped to domain errors.
    pub async fn list(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_repository_error)
    }

    /// Fetch one user by username.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` error when no user holds the username.
    pub async fn get_by_username(&self, username: &str) -> Result<User, Error> {
        self.users
            .find_by_username(username)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}
