//! Article domain operations.
//!
//! Each operation is a linear pipeline — validate, check existence, query,
//! post-process — with the first failure short-circuiting the rest. No
//! retries and no transactions: the existence-check-then-mutate race is
//! resolved by the mutation's own zero-row result mapping to a 404.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::article::{
    Article, ArticleDetail, ArticleFilter, ArticleSummary, NewArticle,
};
use crate::domain::error::Error;
use crate::domain::ports::{
    ArticleRepository, ArticleRepositoryError, TopicRepository, TopicRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::validation::{
    FieldName, parse_id, parse_sort_and_order, parse_vote_delta, require_filter_value,
};

const ARTICLE_ID: FieldName = FieldName::new("article_id");

/// Raw query parameters accepted by the article listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleListParams {
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub topic: Option<String>,
    pub author: Option<String>,
}

/// Article operations over the injected repositories.
#[derive(Clone)]
pub struct ArticlesService {
    articles: Arc<dyn ArticleRepository>,
    topics: Arc<dyn TopicRepository>,
    users: Arc<dyn UserRepository>,
}

fn map_article_error(error: ArticleRepositoryError) -> Error {
    match error {
        ArticleRepositoryError::Connection { message } => Error::service_unavailable(message),
        ArticleRepositoryError::Query { message } => Error::internal(message),
        ArticleRepositoryError::ForeignKey { .. } => {
            Error::referential_violation("Article or User does not exist")
        }
    }
}

fn map_topic_error(error: TopicRepositoryError) -> Error {
    match error {
        TopicRepositoryError::Connection { message } => Error::service_unavailable(message),
        TopicRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
    }
}

impl ArticlesService {
    /// Create a new service backed by the given repositories.
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        topics: Arc<dyn TopicRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            articles,
            topics,
            users,
        }
    }

    /// The filtered, sorted aggregate listing.
    ///
    /// A present topic or author filter must name an existing row — an
    /// unknown key is a 404, while a known key with no matching articles is
    /// an empty listing. That distinction is why the existence checks run
    /// before the query rather than inspecting its row count afterwards.
    ///
    /// # Errors
    ///
    /// Rejects off-whitelist sort parameters and blank filter values with
    /// 400-class errors, unknown filter keys with `NotFound`.
    pub async fn list(&self, params: ArticleListParams) -> Result<Vec<ArticleSummary>, Error> {
        let (sort, order) =
            parse_sort_and_order(params.sort_by.as_deref(), params.order.as_deref())?;
        let topic = require_filter_value(FieldName::new("topic"), params.topic.as_deref())?;
        let author = require_filter_value(FieldName::new("author"), params.author.as_deref())?;

        if let Some(slug) = &topic {
            let known = self
                .topics
                .exists(slug)
                .await
                .map_err(map_topic_error)?;
            if !known {
                return Err(Error::not_found("Topic not found"));
            }
        }
        if let Some(username) = &author {
            let known = self
                .users
                .exists(username)
                .await
                .map_err(map_user_error)?;
            if !known {
                return Err(Error::not_found("Author not found"));
            }
        }

        self.articles
            .list(sort, order, ArticleFilter { topic, author })
            .await
            .map_err(map_article_error)
    }

    /// Fetch one article with its aggregated comment count.
    ///
    /// # Errors
    ///
    /// Rejects malformed ids with `InvalidIdentifier` and unknown ids with
    /// `NotFound`.
    pub async fn get(&self, raw_id: &str) -> Result<ArticleDetail, Error> {
        let article_id = parse_id(raw_id, ARTICLE_ID)?;
        self.articles
            .find_by_id(article_id)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found("Article not found"))
    }

    /// Apply a vote delta to one article.
    ///
    /// The update itself is a single `votes = votes + delta` statement, so
    /// concurrent callers cannot lose increments; a row deleted between the
    /// existence check and the update shows up as zero affected rows.
    ///
    /// # Errors
    ///
    /// Rejects malformed ids and deltas with 400-class errors and unknown
    /// articles with `NotFound`.
    pub async fn increment_votes(
        &self,
        raw_id: &str,
        inc_votes: Option<&Value>,
    ) -> Result<Article, Error> {
        let article_id = parse_id(raw_id, ARTICLE_ID)?;
        let delta = parse_vote_delta(inc_votes)?;

        let known = self
            .articles
            .exists(article_id)
            .await
            .map_err(map_article_error)?;
        if !known {
            return Err(Error::not_found("Article not found"));
        }

        self.articles
            .increment_votes(article_id, delta)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found("Article not found"))
    }

    /// Insert a new article.
    ///
    /// # Errors
    ///
    /// Rejects unknown topics and authors with `NotFound`; a foreign-key
    /// violation that slips past those checks maps to
    /// `ReferentialViolation`.
    pub async fn add(&self, article: NewArticle) -> Result<Article, Error> {
        let topic_known = self
            .topics
            .exists(article.topic())
            .await
            .map_err(map_topic_error)?;
        if !topic_known {
            return Err(Error::not_found("Topic not found"));
        }
        let author_known = self
            .users
            .exists(article.author())
            .await
            .map_err(map_user_error)?;
        if !author_known {
            return Err(Error::not_found("Author not found"));
        }

        self.articles
            .insert(article)
            .await
            .map_err(map_article_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::article::{SortColumn, SortOrder};
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::MockArticleRepository;
    use crate::test_support::{InMemoryStore, articles_service};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("banana", None)]
    #[case("votes; DROP TABLE articles", None)]
    #[case("banana", Some("asc"))]
    #[case("banana", Some("desc"))]
    #[tokio::test]
    async fn list_rejects_off_whitelist_sort_regardless_of_order(
        #[case] sort_by: &str,
        #[case] order: Option<&str>,
    ) {
        let service = articles_service(&InMemoryStore::seeded());
        let err = service
            .list(ArticleListParams {
                sort_by: Some(sort_by.to_owned()),
                order: order.map(str::to_owned),
                ..ArticleListParams::default()
            })
            .await
            .expect_err("sort should be rejected");
        assert_eq!(err.code(), ErrorCode::InvalidField);
    }

    fn sort_key(article: &ArticleSummary, column: SortColumn) -> String {
        match column {
            SortColumn::ArticleId => format!("{:020}", article.article_id),
            SortColumn::Votes => format!("{:020}", i64::from(article.votes) + 1_000_000),
            SortColumn::CommentCount => format!("{:020}", article.comment_count),
            SortColumn::Title => article.title.clone(),
            SortColumn::Author => article.author.clone(),
            SortColumn::Topic => article.topic.clone(),
            SortColumn::CreatedAt => article.created_at.to_rfc3339(),
            SortColumn::Body => String::new(),
        }
    }

    #[rstest]
    #[case("article_id", "asc", SortColumn::ArticleId)]
    #[case("votes", "desc", SortColumn::Votes)]
    #[case("comment_count", "desc", SortColumn::CommentCount)]
    #[case("title", "asc", SortColumn::Title)]
    #[case("created_at", "desc", SortColumn::CreatedAt)]
    #[tokio::test]
    async fn list_orders_by_the_requested_key(
        #[case] sort_by: &str,
        #[case] order: &str,
        #[case] column: SortColumn,
    ) {
        let service = articles_service(&InMemoryStore::seeded());
        let articles = service
            .list(ArticleListParams {
                sort_by: Some(sort_by.to_owned()),
                order: Some(order.to_owned()),
                ..ArticleListParams::default()
            })
            .await
            .expect("listing succeeds");

        assert!(!articles.is_empty());
        let keys: Vec<String> = articles.iter().map(|a| sort_key(a, column)).collect();
        let mut sorted = keys.clone();
        match SortOrder::parse(order).expect("valid order") {
            SortOrder::Asc => sorted.sort(),
            SortOrder::Desc => {
                sorted.sort();
                sorted.reverse();
            }
        }
        assert_eq!(keys, sorted, "listing must be monotone on {column:?}");
    }

    #[tokio::test]
    async fn list_defaults_to_created_at_descending() {
        let service = articles_service(&InMemoryStore::seeded());
        let articles = service
            .list(ArticleListParams::default())
            .await
            .expect("listing succeeds");

        let timestamps: Vec<_> = articles.iter().map(|a| a.created_at).collect();
        let mut sorted = timestamps.clone();
        sorted.sort();
        sorted.reverse();
        assert_eq!(timestamps, sorted);
    }

    #[tokio::test]
    async fn list_omits_bodies_and_counts_comments() {
        let service = articles_service(&InMemoryStore::seeded());
        let articles = service
            .list(ArticleListParams::default())
            .await
            .expect("listing succeeds");

        let first = articles
            .iter()
            .find(|a| a.article_id == 1)
            .expect("article 1 listed");
        assert_eq!(first.comment_count, 11);
    }

    #[tokio::test]
    async fn list_with_empty_topic_is_an_empty_listing_not_an_error() {
        let service = articles_service(&InMemoryStore::seeded());
        let articles = service
            .list(ArticleListParams {
                topic: Some("paper".to_owned()),
                ..ArticleListParams::default()
            })
            .await
            .expect("existing topic with no articles");
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn list_with_unknown_topic_is_not_found() {
        let service = articles_service(&InMemoryStore::seeded());
        let err = service
            .list(ArticleListParams {
                topic: Some("nonexistent".to_owned()),
                ..ArticleListParams::default()
            })
            .await
            .expect_err("unknown topic");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Topic not found");
    }

    #[tokio::test]
    async fn list_with_blank_filter_value_is_rejected() {
        let service = articles_service(&InMemoryStore::seeded());
        let err = service
            .list(ArticleListParams {
                author: Some("".to_owned()),
                ..ArticleListParams::default()
            })
            .await
            .expect_err("blank filter value");
        assert_eq!(err.code(), ErrorCode::InvalidField);
    }

    #[tokio::test]
    async fn list_filters_by_author() {
        let service = articles_service(&InMemoryStore::seeded());
        let articles = service
            .list(ArticleListParams {
                author: Some("icellusedkars".to_owned()),
                ..ArticleListParams::default()
            })
            .await
            .expect("listing succeeds");
        assert!(!articles.is_empty());
        assert!(articles.iter().all(|a| a.author == "icellusedkars"));
    }

    #[tokio::test]
    async fn get_returns_votes_and_comment_count_for_the_reference_article() {
        let service = articles_service(&InMemoryStore::seeded());
        let article = service.get("1").await.expect("article 1 exists");
        assert_eq!(article.votes, 100);
        assert_eq!(article.comment_count, 11);
    }

    #[rstest]
    #[case("not-an-id")]
    #[case("1.5")]
    #[case("0")]
    #[tokio::test]
    async fn get_rejects_malformed_ids(#[case] raw: &str) {
        let service = articles_service(&InMemoryStore::seeded());
        let err = service.get(raw).await.expect_err("id should be rejected");
        assert_eq!(err.code(), ErrorCode::InvalidIdentifier);
    }

    #[tokio::test]
    async fn get_maps_unknown_ids_to_not_found() {
        let service = articles_service(&InMemoryStore::seeded());
        let err = service.get("9999").await.expect_err("article is missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Article not found");
    }

    #[tokio::test]
    async fn increment_votes_applies_negative_deltas_without_a_floor() {
        let store = InMemoryStore::seeded();
        let service = articles_service(&store);

        let payload = json!(-100);
        let updated = service
            .increment_votes("1", Some(&payload))
            .await
            .expect("update succeeds");
        assert_eq!(updated.votes, 0);

        let payload = json!(-30);
        let updated = service
            .increment_votes("1", Some(&payload))
            .await
            .expect("update succeeds");
        assert_eq!(updated.votes, -30);

        let fetched = service.get("1").await.expect("article 1 exists");
        assert_eq!(fetched.votes, -30);
    }

    #[tokio::test]
    async fn increment_votes_rejects_missing_and_non_numeric_deltas() {
        let service = articles_service(&InMemoryStore::seeded());

        let err = service
            .increment_votes("1", None)
            .await
            .expect_err("missing delta");
        assert_eq!(err.code(), ErrorCode::InvalidField);

        let payload = json!("ten");
        let err = service
            .increment_votes("1", Some(&payload))
            .await
            .expect_err("non-numeric delta");
        assert_eq!(err.message(), "inc_votes must be a number");
    }

    #[tokio::test]
    async fn increment_votes_maps_unknown_articles_to_not_found() {
        let service = articles_service(&InMemoryStore::seeded());
        let payload = json!(1);
        let err = service
            .increment_votes("9999", Some(&payload))
            .await
            .expect_err("article is missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn add_rejects_unknown_topic_and_author() {
        let service = articles_service(&InMemoryStore::seeded());

        let article = NewArticle::try_from_parts(
            "On the nature of mitchness",
            "nonexistent",
            "butter_bridge",
            "A treatise.",
            None,
        )
        .expect("valid payload");
        let err = service.add(article).await.expect_err("unknown topic");
        assert_eq!(err.message(), "Topic not found");

        let article = NewArticle::try_from_parts(
            "On the nature of mitchness",
            "mitch",
            "nobody",
            "A treatise.",
            None,
        )
        .expect("valid payload");
        let err = service.add(article).await.expect_err("unknown author");
        assert_eq!(err.message(), "Author not found");
    }

    #[tokio::test]
    async fn add_defaults_votes_and_image_url() {
        let store = InMemoryStore::seeded();
        let service = articles_service(&store);

        let article = NewArticle::try_from_parts(
            "On the nature of mitchness",
            "mitch",
            "butter_bridge",
            "A treatise.",
            None,
        )
        .expect("valid payload");
        let stored = service.add(article).await.expect("insert succeeds");
        assert_eq!(stored.votes, 0);
        assert!(!stored.article_img_url.is_empty());

        let fetched = service
            .get(&stored.article_id.to_string())
            .await
            .expect("new article is fetchable");
        assert_eq!(fetched.comment_count, 0);
        assert_eq!(fetched.title, "On the nature of mitchness");
    }

    #[tokio::test]
    async fn repository_foreign_key_failures_map_to_referential_violation() {
        let mut articles = MockArticleRepository::new();
        articles
            .expect_exists()
            .returning(|_| Ok(true));
        articles.expect_increment_votes().returning(|_, _| {
            Err(ArticleRepositoryError::foreign_key("fk_articles_author"))
        });

        let store = InMemoryStore::seeded();
        let service = ArticlesService::new(
            Arc::new(articles),
            Arc::new(crate::test_support::InMemoryTopicRepository::new(&store)),
            Arc::new(crate::test_support::InMemoryUserRepository::new(&store)),
        );

        let payload = json!(1);
        let err = service
            .increment_votes("1", Some(&payload))
            .await
            .expect_err("foreign key failure");
        assert_eq!(err.code(), ErrorCode::ReferentialViolation);
        assert_eq!(err.message(), "Article or User does not exist");
    }
}
