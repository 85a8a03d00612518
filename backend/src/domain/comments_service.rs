//! Comment domain operations.

use std::sync::Arc;

use pagination::Paginated;
use serde_json::Value;

use crate::domain::comment::{Comment, NewComment};
use crate::domain::error::Error;
use crate::domain::ports::{
    ArticleRepository, ArticleRepositoryError, CommentRepository, CommentRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::validation::{
    FieldName, parse_comment_body, parse_id, parse_page_window, parse_username, parse_vote_delta,
};

const ARTICLE_ID: FieldName = FieldName::new("article_id");
const COMMENT_ID: FieldName = FieldName::new("comment_id");

/// Comment operations over the injected repositories.
#[derive(Clone)]
pub struct CommentsService {
    comments: Arc<dyn CommentRepository>,
    articles: Arc<dyn ArticleRepository>,
    users: Arc<dyn UserRepository>,
}

fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => Error::service_unavailable(message),
        CommentRepositoryError::Query { message } => Error::internal(message),
        CommentRepositoryError::ForeignKey { .. } => {
            Error::referential_violation("Article or User does not exist")
        }
    }
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

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
    }
}

impl CommentsService {
    /// Create a new service backed by the given repositories.
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        articles: Arc<dyn ArticleRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            comments,
            articles,
            users,
        }
    }

    /// Fetch an article's comments newest-first with the total count.
    ///
    /// The article existence check runs first so "unknown article" is a 404
    /// while "known article without comments" is an empty page.
    ///
    /// # Errors
    ///
    /// Rejects malformed ids and pagination with 400-class errors and an
    /// unknown article with `NotFound`.
    pub async fn list_for_article(
        &self,
        raw_article_id: &str,
        limit: Option<&str>,
        page: Option<&str>,
    ) -> Result<Paginated<Comment>, Error> {
        let article_id = parse_id(raw_article_id, ARTICLE_ID)?;

        let known = self
            .articles
            .exists(article_id)
            .await
            .map_err(map_article_error)?;
        if !known {
            return Err(Error::not_found("Article not found"));
        }

        let window = parse_page_window(limit, page)?;
        self.comments
            .list_for_article(article_id, window)
            .await
            .map_err(map_comment_error)
    }

    /// Fetch one comment by id.
    ///
    /// # Errors
    ///
    /// Rejects malformed ids with `InvalidIdentifier` and unknown ids with
    /// `NotFound`.
    pub async fn get(&self, raw_id: &str) -> Result<Comment, Error> {
        let comment_id = parse_id(raw_id, COMMENT_ID)?;
        self.comments
            .find_by_id(comment_id)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(|| Error::not_found("Comment not found"))
    }

    /// Post a comment on an article.
    ///
    /// The username and body validators run before any store round trip;
    /// the article and user existence checks then turn dangling references
    /// into clean 404s. The store's own foreign keys remain the second line
    /// of defence for the race where a parent row disappears in between.
    ///
    /// # Errors
    ///
    /// Rejects invalid payload fields with 400-class errors, unknown
    /// articles or users with `NotFound`, and surfaced foreign-key
    /// violations with `ReferentialViolation`.
    pub async fn add(
        &self,
        raw_article_id: &str,
        username: Option<&Value>,
        body: Option<&Value>,
    ) -> Result<Comment, Error> {
        let username = parse_username(username)?;
        let body = parse_comment_body(body)?;
        let article_id = parse_id(raw_article_id, ARTICLE_ID)?;

        let article_known = self
            .articles
            .exists(article_id)
            .await
            .map_err(map_article_error)?;
        if !article_known {
            return Err(Error::not_found("Article not found"));
        }
        let user_known = self
            .users
            .exists(&username)
            .await
            .map_err(map_user_error)?;
        if !user_known {
            return Err(Error::not_found("User not found"));
        }

        self.comments
            .insert(NewComment {
                article_id,
                author: username,
                body,
            })
            .await
            .map_err(map_comment_error)
    }

    /// Apply a vote delta to one comment.
    ///
    /// # Errors
    ///
    /// Rejects malformed ids and deltas with 400-class errors and unknown
    /// comments with `NotFound`.
    pub async fn increment_votes(
        &self,
        raw_id: &str,
        inc_votes: Option<&Value>,
    ) -> Result<Comment, Error> {
        let comment_id = parse_id(raw_id, COMMENT_ID)?;
        let delta = parse_vote_delta(inc_votes)?;

        let known = self
            .comments
            .exists(comment_id)
            .await
            .map_err(map_comment_error)?;
        if !known {
            return Err(Error::not_found("Comment not found"));
        }

        self.comments
            .increment_votes(comment_id, delta)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(|| Error::not_found("Comment not found"))
    }

    /// Delete one comment.
    ///
    /// # Errors
    ///
    /// Rejects malformed ids (including zero, negative and fractional) with
    /// `InvalidIdentifier`; an unknown comment — or one deleted concurrently
    /// after the existence check — maps to `NotFound`.
    pub async fn delete(&self, raw_id: &str) -> Result<(), Error> {
        let comment_id = parse_id(raw_id, COMMENT_ID)?;

        let known = self
            .comments
            .exists(comment_id)
            .await
            .map_err(map_comment_error)?;
        if !known {
            return Err(Error::not_found("Comment not found"));
        }

        let deleted = self
            .comments
            .delete(comment_id)
            .await
            .map_err(map_comment_error)?;
        if !deleted {
            return Err(Error::not_found("Comment not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::MockCommentRepository;
    use crate::test_support::{InMemoryStore, comments_service};
    use rstest::rstest;
    use serde_json::json;

    #[tokio::test]
    async fn listing_returns_newest_first_with_total_count() {
        let service = comments_service(&InMemoryStore::seeded());
        let page = service
            .list_for_article("1", None, None)
            .await
            .expect("listing succeeds");

        assert_eq!(page.total_count, 11);
        assert_eq!(page.items.len(), 11);
        let timestamps: Vec<_> = page.items.iter().map(|c| c.created_at).collect();
        let mut sorted = timestamps.clone();
        sorted.sort();
        sorted.reverse();
        assert_eq!(timestamps, sorted);
    }

    #[tokio::test]
    async fn listing_windows_pages_and_keeps_the_total() {
        let service = comments_service(&InMemoryStore::seeded());

        let first = service
            .list_for_article("1", Some("5"), Some("1"))
            .await
            .expect("first page");
        assert_eq!(first.items.len(), 5);
        assert_eq!(first.total_count, 11);

        let last = service
            .list_for_article("1", Some("5"), Some("3"))
            .await
            .expect("last page");
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.total_count, 11);

        let past_the_end = service
            .list_for_article("1", Some("5"), Some("9"))
            .await
            .expect("page past the end");
        assert!(past_the_end.items.is_empty());
        assert_eq!(past_the_end.total_count, 11);
    }

    #[tokio::test]
    async fn listing_an_article_without_comments_is_empty_not_an_error() {
        let service = comments_service(&InMemoryStore::seeded());
        let page = service
            .list_for_article("2", None, None)
            .await
            .expect("article 2 exists");
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn listing_an_unknown_article_is_not_found() {
        let service = comments_service(&InMemoryStore::seeded());
        let err = service
            .list_for_article("9999", None, None)
            .await
            .expect_err("unknown article");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Article not found");
    }

    #[rstest]
    #[case(Some("0"), None)]
    #[case(Some("nope"), Some("1"))]
    #[case(Some("5"), Some("-2"))]
    #[tokio::test]
    async fn listing_rejects_invalid_pagination(
        #[case] limit: Option<&str>,
        #[case] page: Option<&str>,
    ) {
        let service = comments_service(&InMemoryStore::seeded());
        let err = service
            .list_for_article("1", limit, page)
            .await
            .expect_err("pagination should be rejected");
        assert_eq!(err.code(), ErrorCode::InvalidField);
    }

    #[tokio::test]
    async fn add_rejects_empty_bodies_before_touching_the_store() {
        let service = comments_service(&InMemoryStore::seeded());
        let username = json!("butter_bridge");
        let body = json!("");
        let err = service
            .add("1", Some(&username), Some(&body))
            .await
            .expect_err("empty body");
        assert_eq!(err.code(), ErrorCode::EmptyBody);
        assert_eq!(err.message(), "Comment body cannot be empty");
    }

    #[tokio::test]
    async fn add_rejects_non_string_usernames() {
        let service = comments_service(&InMemoryStore::seeded());
        let username = json!(12345);
        let body = json!("x");
        let err = service
            .add("1", Some(&username), Some(&body))
            .await
            .expect_err("numeric username");
        assert_eq!(err.code(), ErrorCode::InvalidField);
        assert_eq!(err.message(), "username must be a string");
    }

    #[tokio::test]
    async fn add_maps_unknown_parents_to_not_found() {
        let service = comments_service(&InMemoryStore::seeded());
        let username = json!("butter_bridge");
        let body = json!("interesting");

        let err = service
            .add("9999", Some(&username), Some(&body))
            .await
            .expect_err("unknown article");
        assert_eq!(err.message(), "Article not found");

        let unknown_user = json!("nobody");
        let err = service
            .add("1", Some(&unknown_user), Some(&body))
            .await
            .expect_err("unknown user");
        assert_eq!(err.message(), "User not found");
    }

    #[tokio::test]
    async fn add_stores_the_comment_with_defaulted_votes() {
        let store = InMemoryStore::seeded();
        let service = comments_service(&store);
        let username = json!("butter_bridge");
        let body = json!("A thoughtful reply");

        let comment = service
            .add("2", Some(&username), Some(&body))
            .await
            .expect("insert succeeds");
        assert_eq!(comment.votes, 0);
        assert_eq!(comment.article_id, 2);

        let page = service
            .list_for_article("2", None, None)
            .await
            .expect("listing succeeds");
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].body, "A thoughtful reply");
    }

    #[tokio::test]
    async fn increment_votes_updates_the_row() {
        let service = comments_service(&InMemoryStore::seeded());
        let page = service
            .list_for_article("1", Some("1"), None)
            .await
            .expect("listing succeeds");
        let target = &page.items[0];
        let before = target.votes;

        let payload = json!(-7);
        let updated = service
            .increment_votes(&target.comment_id.to_string(), Some(&payload))
            .await
            .expect("update succeeds");
        assert_eq!(updated.votes, before - 7);
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("1.5")]
    #[tokio::test]
    async fn delete_rejects_non_positive_and_fractional_ids(#[case] raw: &str) {
        let service = comments_service(&InMemoryStore::seeded());
        let err = service.delete(raw).await.expect_err("id should be rejected");
        assert_eq!(err.code(), ErrorCode::InvalidIdentifier);
    }

    #[tokio::test]
    async fn delete_removes_the_row_and_later_fetches_see_not_found() {
        let service = comments_service(&InMemoryStore::seeded());
        let page = service
            .list_for_article("1", Some("1"), None)
            .await
            .expect("listing succeeds");
        let id = page.items[0].comment_id.to_string();

        service.delete(&id).await.expect("delete succeeds");
        let err = service.get(&id).await.expect_err("comment is gone");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Comment not found");
    }

    #[tokio::test]
    async fn delete_of_unknown_comment_is_not_found() {
        let service = comments_service(&InMemoryStore::seeded());
        let err = service.delete("9999").await.expect_err("unknown comment");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn delete_race_losing_to_a_concurrent_delete_is_not_found() {
        let mut comments = MockCommentRepository::new();
        comments.expect_exists().returning(|_| Ok(true));
        comments.expect_delete().returning(|_| Ok(false));

        let store = InMemoryStore::seeded();
        let service = CommentsService::new(
            Arc::new(comments),
            Arc::new(crate::test_support::InMemoryArticleRepository::new(&store)),
            Arc::new(crate::test_support::InMemoryUserRepository::new(&store)),
        );

        let err = service.delete("1").await.expect_err("row vanished");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
