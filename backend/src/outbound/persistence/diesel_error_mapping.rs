//! Shared Diesel error mapping for the repository adapters.
//!
//! Every adapter funnels its `diesel::result::Error` values through these
//! helpers so the split between query, connection and foreign-key failures
//! stays consistent across repositories. Raw driver messages are logged at
//! debug level and replaced with stable summaries before leaving the layer.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Used by read paths and mutations that cannot violate references:
/// `NotFound` and query-builder failures map to query errors, closed
/// connections to connection errors.
pub(crate) fn map_basic_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    log_diesel_error(&error);

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// Map Diesel error variants for inserts that reference parent rows.
///
/// Foreign-key violations get their own constructor — the existence checks
/// run before any insert, so a violation here means the parent vanished in
/// between and the service turns it into a referential 404 rather than a
/// 500.
pub(crate) fn map_mutation_diesel_error<E, Q, C, F>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
    foreign_key: F,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
    F: FnOnce(String) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) = &error {
        log_diesel_error(&error);
        return foreign_key(info.message().to_owned());
    }
    map_basic_diesel_error(error, query, connection)
}

fn log_diesel_error(error: &diesel::result::Error) {
    use diesel::result::Error as DieselError;

    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::CommentRepositoryError;
    use rstest::rstest;

    fn query(message: &'static str) -> CommentRepositoryError {
        CommentRepositoryError::query(message)
    }

    fn connection(message: &'static str) -> CommentRepositoryError {
        CommentRepositoryError::connection(message)
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("connection refused"), |m| {
            CommentRepositoryError::connection(m)
        });
        assert!(matches!(
            mapped,
            CommentRepositoryError::Connection { .. }
        ));
        assert!(mapped.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_a_query_error() {
        let mapped = map_basic_diesel_error(diesel::result::Error::NotFound, query, connection);
        assert_eq!(mapped, CommentRepositoryError::query("record not found"));
    }

    #[rstest]
    fn foreign_key_violations_get_their_own_constructor() {
        let error = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ForeignKeyViolation,
            Box::new("violates foreign key constraint \"comments_author_fkey\"".to_owned()),
        );
        let mapped = map_mutation_diesel_error(
            error,
            query,
            connection,
            CommentRepositoryError::foreign_key,
        );
        assert!(matches!(mapped, CommentRepositoryError::ForeignKey { .. }));
        assert!(mapped.to_string().contains("comments_author_fkey"));
    }

    #[rstest]
    fn other_database_errors_stay_query_errors_in_the_mutation_mapper() {
        let error = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_owned()),
        );
        let mapped = map_mutation_diesel_error(
            error,
            query,
            connection,
            CommentRepositoryError::foreign_key,
        );
        assert_eq!(mapped, CommentRepositoryError::query("database error"));
    }
}
