//! PostgreSQL-backed `ArticleRepository` implementation using Diesel ORM.
//!
//! The aggregate listing and by-id fetch run through `sql_query` with the
//! statements built in [`super::article_queries`]; the remaining operations
//! use the typed DSL. Either way every request value is a bound parameter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use diesel_async::RunQueryDsl;

use crate::domain::article::{
    Article, ArticleDetail, ArticleFilter, ArticleSummary, NewArticle, SortColumn, SortOrder,
};
use crate::domain::ports::{ArticleRepository, ArticleRepositoryError};

use super::article_queries::{ARTICLE_DETAIL_SQL, article_list_statement};
use super::diesel_error_mapping::{
    map_basic_diesel_error, map_mutation_diesel_error, map_pool_error,
};
use super::models::{ArticleDetailRow, ArticleRow, ArticleSummaryRow, NewArticleRow};
use super::pool::{DbPool, PoolError};
use super::schema::articles;

/// Diesel-backed implementation of the `ArticleRepository` port.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> ArticleRepositoryError {
    map_pool_error(error, |m| ArticleRepositoryError::connection(m))
}

fn map_diesel(error: diesel::result::Error) -> ArticleRepositoryError {
    map_basic_diesel_error(
        error,
        |m| ArticleRepositoryError::query(m),
        |m| ArticleRepositoryError::connection(m),
    )
}

fn map_insert_diesel(error: diesel::result::Error) -> ArticleRepositoryError {
    map_mutation_diesel_error(
        error,
        |m| ArticleRepositoryError::query(m),
        |m| ArticleRepositoryError::connection(m),
        ArticleRepositoryError::foreign_key,
    )
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn list(
        &self,
        sort: SortColumn,
        order: SortOrder,
        filter: ArticleFilter,
    ) -> Result<Vec<ArticleSummary>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let statement = article_list_statement(sort, order, &filter);
        let mut query = diesel::sql_query(statement.sql).into_boxed::<diesel::pg::Pg>();
        for value in statement.binds {
            query = query.bind::<Text, _>(value);
        }

        let rows: Vec<ArticleSummaryRow> =
            query.load(&mut conn).await.map_err(map_diesel)?;

        Ok(rows.into_iter().map(ArticleSummary::from).collect())
    }

    async fn find_by_id(
        &self,
        article_id: i64,
    ) -> Result<Option<ArticleDetail>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<ArticleDetailRow> = diesel::sql_query(ARTICLE_DETAIL_SQL)
            .bind::<BigInt, _>(article_id)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(ArticleDetail::from))
    }

    async fn exists(&self, article_id: i64) -> Result<bool, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        diesel::select(diesel::dsl::exists(
            articles::table.filter(articles::article_id.eq(article_id)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel)
    }

    async fn increment_votes(
        &self,
        article_id: i64,
        delta: i32,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<ArticleRow> =
            diesel::update(articles::table.filter(articles::article_id.eq(article_id)))
                .set(articles::votes.eq(articles::votes + delta))
                .returning(ArticleRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel)?;

        Ok(row.map(Article::from))
    }

    async fn insert(&self, article: NewArticle) -> Result<Article, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: ArticleRow = diesel::insert_into(articles::table)
            .values(&NewArticleRow {
                title: article.title(),
                topic: article.topic(),
                author: article.author(),
                body: article.body(),
                article_img_url: article.article_img_url(),
            })
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_insert_diesel)?;

        Ok(row.into())
    }
}
