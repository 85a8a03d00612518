//! PostgreSQL-backed `TopicRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TopicRepository, TopicRepositoryError};
use crate::domain::topic::{NewTopic, Topic};

use super::diesel_error_mapping::{map_basic_diesel_error, map_pool_error};
use super::models::{NewTopicRow, TopicRow};
use super::pool::{DbPool, PoolError};
use super::schema::topics;

/// Diesel-backed implementation of the `TopicRepository` port.
#[derive(Clone)]
pub struct DieselTopicRepository {
    pool: DbPool,
}

impl DieselTopicRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> TopicRepositoryError {
    map_pool_error(error, |m| TopicRepositoryError::connection(m))
}

fn map_diesel(error: diesel::result::Error) -> TopicRepositoryError {
    map_basic_diesel_error(
        error,
        |m| TopicRepositoryError::query(m),
        |m| TopicRepositoryError::connection(m),
    )
}

#[async_trait]
impl TopicRepository for DieselTopicRepository {
    async fn list(&self) -> Result<Vec<Topic>, TopicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        // No ORDER BY: listings follow the table's natural insertion order.
        let rows: Vec<TopicRow> = topics::table
            .select(TopicRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(Topic::from).collect())
    }

    async fn exists(&self, slug: &str) -> Result<bool, TopicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        diesel::select(diesel::dsl::exists(
            topics::table.filter(topics::slug.eq(slug)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel)
    }

    async fn insert(&self, topic: NewTopic) -> Result<Topic, TopicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: TopicRow = diesel::insert_into(topics::table)
            .values(&NewTopicRow {
                slug: topic.slug(),
                description: topic.description(),
            })
            .returning(TopicRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(row.into())
    }
}
