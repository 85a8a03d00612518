//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{PageWindow, Paginated};

use crate::domain::comment::{Comment, NewComment};
use crate::domain::ports::{CommentRepository, CommentRepositoryError};

use super::diesel_error_mapping::{
    map_basic_diesel_error, map_mutation_diesel_error, map_pool_error,
};
use super::models::{CommentRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::comments;

/// Diesel-backed implementation of the `CommentRepository` port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> CommentRepositoryError {
    map_pool_error(error, |m| CommentRepositoryError::connection(m))
}

fn map_diesel(error: diesel::result::Error) -> CommentRepositoryError {
    map_basic_diesel_error(
        error,
        |m| CommentRepositoryError::query(m),
        |m| CommentRepositoryError::connection(m),
    )
}

fn map_insert_diesel(error: diesel::result::Error) -> CommentRepositoryError {
    map_mutation_diesel_error(
        error,
        |m| CommentRepositoryError::query(m),
        |m| CommentRepositoryError::connection(m),
        CommentRepositoryError::foreign_key,
    )
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn list_for_article(
        &self,
        article_id: i64,
        window: Option<PageWindow>,
    ) -> Result<Paginated<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        // Two statements, no transaction: a comment posted in between can
        // make the page and the total disagree by one, which the client
        // tolerates for the same reason it tolerates the next poll differing.
        let total_count: i64 = comments::table
            .filter(comments::article_id.eq(article_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        let mut query = comments::table
            .filter(comments::article_id.eq(article_id))
            .order(comments::created_at.desc())
            .select(CommentRow::as_select())
            .into_boxed();
        if let Some(window) = window {
            query = query.limit(window.limit()).offset(window.offset());
        }

        let rows: Vec<CommentRow> = query.load(&mut conn).await.map_err(map_diesel)?;

        Ok(Paginated {
            items: rows.into_iter().map(Comment::from).collect(),
            total_count,
        })
    }

    async fn find_by_id(
        &self,
        comment_id: i64,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<CommentRow> = comments::table
            .filter(comments::comment_id.eq(comment_id))
            .select(CommentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(Comment::from))
    }

    async fn exists(&self, comment_id: i64) -> Result<bool, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        diesel::select(diesel::dsl::exists(
            comments::table.filter(comments::comment_id.eq(comment_id)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel)
    }

    async fn insert(&self, comment: NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: CommentRow = diesel::insert_into(comments::table)
            .values(&NewCommentRow {
                article_id: comment.article_id,
                author: &comment.author,
                body: &comment.body,
            })
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_insert_diesel)?;

        Ok(row.into())
    }

    async fn increment_votes(
        &self,
        comment_id: i64,
        delta: i32,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<CommentRow> =
            diesel::update(comments::table.filter(comments::comment_id.eq(comment_id)))
                .set(comments::votes.eq(comments::votes + delta))
                .returning(CommentRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel)?;

        Ok(row.map(Comment::from))
    }

    async fn delete(&self, comment_id: i64) -> Result<bool, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let affected = diesel::delete(comments::table.filter(comments::comment_id.eq(comment_id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(affected > 0)
    }
}
