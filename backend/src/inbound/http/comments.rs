//! Comments API handlers.
//!
//! ```text
//! GET    /api/articles/{article_id}/comments?limit=10&page=2
//! POST   /api/articles/{article_id}/comments {"username":"...","body":"..."}
//! GET    /api/comments/{comment_id}
//! PATCH  /api/comments/{comment_id} {"inc_votes":1}
//! DELETE /api/comments/{comment_id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Comment, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::articles::VotePayload;
use crate::inbound::http::state::HttpState;

/// Comment listing envelope: one page plus the unpaged total.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
    pub total_count: i64,
}

/// Single-comment envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentResponse {
    pub comment: Comment,
}

/// Pagination query parameters for the comment listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CommentsPageQuery {
    /// Page size; omitting it returns the whole thread.
    pub limit: Option<String>,
    /// One-based page index; defaults to 1.
    pub page: Option<String>,
}

/// Comment creation request body.
///
/// Both fields stay raw JSON values so the validators can distinguish
/// missing fields from wrong-typed ones. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCommentRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub username: Option<serde_json::Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub body: Option<serde_json::Value>,
}

/// List an article's comments, newest first.
#[utoipa::path(
    get,
    path = "/api/articles/{article_id}/comments",
    params(
        ("article_id" = String, Path, description = "Article id"),
        CommentsPageQuery
    ),
    responses(
        (status = 200, description = "Comments plus total count", body = CommentsResponse),
        (status = 400, description = "Invalid id or pagination", body = Error),
        (status = 404, description = "Article not found", body = Error)
    ),
    tags = ["comments"],
    operation_id = "listCommentsByArticle"
)]
#[get("/articles/{article_id}/comments")]
pub async fn get_comments_for_article(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<CommentsPageQuery>,
) -> ApiResult<web::Json<CommentsResponse>> {
    let page = state
        .comments
        .list_for_article(
            &path.into_inner(),
            query.limit.as_deref(),
            query.page.as_deref(),
        )
        .await?;
    Ok(web::Json(CommentsResponse {
        comments: page.items,
        total_count: page.total_count,
    }))
}

/// Post a comment on an article.
#[utoipa::path(
    post,
    path = "/api/articles/{article_id}/comments",
    params(("article_id" = String, Path, description = "Article id")),
    request_body = NewCommentRequest,
    responses(
        (status = 201, description = "Created comment", body = CommentResponse),
        (status = 400, description = "Missing or invalid fields", body = Error),
        (status = 404, description = "Article or user not found", body = Error)
    ),
    tags = ["comments"],
    operation_id = "addComment"
)]
#[post("/articles/{article_id}/comments")]
pub async fn post_comment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<NewCommentRequest>,
) -> ApiResult<HttpResponse> {
    let comment = state
        .comments
        .add(
            &path.into_inner(),
            payload.username.as_ref(),
            payload.body.as_ref(),
        )
        .await?;
    Ok(HttpResponse::Created().json(CommentResponse { comment }))
}

/// Fetch one comment.
#[utoipa::path(
    get,
    path = "/api/comments/{comment_id}",
    params(("comment_id" = String, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Comment", body = CommentResponse),
        (status = 400, description = "Invalid comment id", body = Error),
        (status = 404, description = "Comment not found", body = Error)
    ),
    tags = ["comments"],
    operation_id = "getCommentById"
)]
#[get("/comments/{comment_id}")]
pub async fn get_comment_by_id(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CommentResponse>> {
    let comment = state.comments.get(&path.into_inner()).await?;
    Ok(web::Json(CommentResponse { comment }))
}

/// Apply a vote delta to a comment.
#[utoipa::path(
    patch,
    path = "/api/comments/{comment_id}",
    params(("comment_id" = String, Path, description = "Comment id")),
    request_body = VotePayload,
    responses(
        (status = 200, description = "Updated comment", body = CommentResponse),
        (status = 400, description = "Invalid id or vote delta", body = Error),
        (status = 404, description = "Comment not found", body = Error)
    ),
    tags = ["comments"],
    operation_id = "incrementCommentVotes"
)]
#[patch("/comments/{comment_id}")]
pub async fn patch_comment_votes(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<VotePayload>,
) -> ApiResult<web::Json<CommentResponse>> {
    let comment = state
        .comments
        .increment_votes(&path.into_inner(), payload.inc_votes.as_ref())
        .await?;
    Ok(web::Json(CommentResponse { comment }))
}

/// Delete a comment.
#[utoipa::path(
    delete,
    path = "/api/comments/{comment_id}",
    params(("comment_id" = String, Path, description = "Comment id")),
    responses(
        (status = 204, description = "Comment deleted; no content"),
        (status = 400, description = "Invalid comment id", body = Error),
        (status = 404, description = "Comment not found", body = Error)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/comments/{comment_id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.comments.delete(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seeded_http_state;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(seeded_http_state()))
            .service(
                web::scope("/api")
                    .service(get_comments_for_article)
                    .service(post_comment)
                    .service(get_comment_by_id)
                    .service(patch_comment_votes)
                    .service(delete_comment),
            )
    }

    #[actix_web::test]
    async fn get_comments_pages_and_reports_the_total() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/articles/1/comments?limit=5&page=2")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("total_count").and_then(Value::as_i64),
            Some(11)
        );
        assert_eq!(
            body.get("comments")
                .and_then(Value::as_array)
                .map(Vec::len),
            Some(5)
        );
    }

    #[actix_web::test]
    async fn get_comments_for_commentless_article_is_an_empty_list() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/articles/2/comments")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("total_count").and_then(Value::as_i64), Some(0));
        assert_eq!(
            body.get("comments").and_then(Value::as_array).map(Vec::len),
            Some(0)
        );
    }

    #[actix_web::test]
    async fn post_comment_creates_and_returns_the_row() {
        let app = actix_test::init_service(test_app()).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/articles/2/comments")
            .set_json(json!({ "username": "lurker", "body": "First!" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/comment/author").and_then(Value::as_str),
            Some("lurker")
        );
        assert_eq!(
            body.pointer("/comment/votes").and_then(Value::as_i64),
            Some(0)
        );
    }

    #[rstest]
    #[case(json!({ "username": "butter_bridge", "body": "" }), "Comment body cannot be empty")]
    #[case(json!({ "username": 12345, "body": "x" }), "username must be a string")]
    #[case(json!({ "body": "x" }), "Missing username or body")]
    #[actix_web::test]
    async fn post_comment_rejects_invalid_payloads(
        #[case] payload: Value,
        #[case] message: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/articles/1/comments")
            .set_json(payload)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("message").and_then(Value::as_str), Some(message));
    }

    #[actix_web::test]
    async fn delete_comment_returns_no_content_and_removes_the_row() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/api/comments/5")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let body = actix_test::read_body(response).await;
        assert!(body.is_empty());

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/comments/5")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case("/api/comments/0")]
    #[case("/api/comments/-1")]
    #[case("/api/comments/1.5")]
    #[actix_web::test]
    async fn delete_comment_rejects_malformed_ids(#[case] uri: &str) {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete().uri(uri).to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn patch_comment_votes_applies_the_delta() {
        let app = actix_test::init_service(test_app()).await;

        let request = actix_test::TestRequest::patch()
            .uri("/api/comments/3")
            .set_json(json!({ "inc_votes": -1 }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/comment/votes").and_then(Value::as_i64),
            Some(99)
        );
    }
}
