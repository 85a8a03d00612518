//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::User;

use super::diesel_error_mapping::{map_basic_diesel_error, map_pool_error};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> UserRepositoryError {
    map_pool_error(error, |m| UserRepositoryError::connection(m))
}

fn map_diesel(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        |m| UserRepositoryError::query(m),
        |m| UserRepositoryError::connection(m),
    )
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(User::from))
    }

    async fn exists(&self, username: &str) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        diesel::select(diesel::dsl::exists(
            users::table.filter(users::username.eq(username)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module's error mapping.
    use super::*;

    #[test]
    fn pool_errors_map_to_connection_errors() {
        let mapped = map_pool(PoolError::build("bad url"));
        assert!(matches!(mapped, UserRepositoryError::Connection { .. }));
    }

    #[test]
    fn closed_connections_map_to_connection_errors() {
        let error = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ClosedConnection,
            Box::new("closed".to_owned()),
        );
        let mapped = map_diesel(error);
        assert_eq!(
            mapped,
            UserRepositoryError::connection("database connection error")
        );
    }
}
