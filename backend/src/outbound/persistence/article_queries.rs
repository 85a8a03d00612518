//! Statement construction for the aggregate article queries.
//!
//! The listing joins comments and groups per article, so `comment_count`
//! comes back from the same round trip as the rows. Filters are appended as
//! positional `$n` parameters in the order their values are pushed; the only
//! non-parameter text taken from the request is the ORDER BY target, and
//! that is restricted to [`SortColumn::as_sql`]/[`SortOrder::as_sql`] of the
//! validated enums.

use crate::domain::{ArticleFilter, SortColumn, SortOrder};

const LIST_SELECT: &str = "SELECT articles.article_id, articles.title, articles.topic, \
     articles.author, articles.created_at, articles.votes, articles.article_img_url, \
     COUNT(comments.comment_id) AS comment_count \
     FROM articles \
     LEFT JOIN comments ON comments.article_id = articles.article_id";

/// The aggregate by-id fetch; binds `$1` = article id.
pub(crate) const ARTICLE_DETAIL_SQL: &str = "SELECT articles.article_id, articles.title, articles.topic, \
     articles.author, articles.body, articles.created_at, articles.votes, \
     articles.article_img_url, COUNT(comments.comment_id) AS comment_count \
     FROM articles \
     LEFT JOIN comments ON comments.article_id = articles.article_id \
     WHERE articles.article_id = $1 \
     GROUP BY articles.article_id";

/// A finished listing statement: SQL text plus its bind values in `$n`
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArticleListStatement {
    pub sql: String,
    pub binds: Vec<String>,
}

/// Build the filtered, sorted aggregate listing statement.
pub(crate) fn article_list_statement(
    sort: SortColumn,
    order: SortOrder,
    filter: &ArticleFilter,
) -> ArticleListStatement {
    let mut sql = String::from(LIST_SELECT);
    let mut binds = Vec::new();

    let mut clauses = Vec::new();
    if let Some(topic) = &filter.topic {
        binds.push(topic.clone());
        clauses.push(format!("articles.topic = ${}", binds.len()));
    }
    if let Some(author) = &filter.author {
        binds.push(author.clone());
        clauses.push(format!("articles.author = ${}", binds.len()));
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    sql.push_str(" GROUP BY articles.article_id ORDER BY ");
    sql.push_str(sort.as_sql());
    sql.push(' ');
    sql.push_str(order.as_sql());

    ArticleListStatement { sql, binds }
}
