//! Articles API handlers.
//!
//! ```text
//! GET   /api/articles?sort_by=votes&order=asc&topic=mitch&author=butter_bridge
//! POST  /api/articles {"author":"...","title":"...","body":"...","topic":"..."}
//! GET   /api/articles/{article_id}
//! PATCH /api/articles/{article_id} {"inc_votes":-100}
//! ```
//!
//! Path ids arrive as raw strings so the core's identifier validation (and
//! its 400) applies instead of the framework's.

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Article, ArticleDetail, ArticleListParams, ArticleSummary, Error, NewArticle,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Article listing envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticlesResponse {
    pub articles: Vec<ArticleSummary>,
}

/// Single-article envelope for the aggregate fetch.
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleDetailResponse {
    pub article: ArticleDetail,
}

/// Single-article envelope for mutations.
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleResponse {
    pub article: Article,
}

/// Query parameters accepted by the article listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ArticleListQuery {
    /// Whitelisted sort column; defaults to `created_at`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (case-insensitive); defaults to `desc`.
    pub order: Option<String>,
    /// Restrict to articles in this topic.
    pub topic: Option<String>,
    /// Restrict to articles by this author.
    pub author: Option<String>,
}

/// Vote mutation request body.
///
/// `inc_votes` stays a raw JSON value so the validator can distinguish a
/// missing field from a wrong-typed one.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VotePayload {
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub inc_votes: Option<serde_json::Value>,
}

/// Article creation request body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewArticleRequest {
    pub author: String,
    pub title: String,
    pub body: String,
    pub topic: String,
    #[serde(default)]
    pub article_img_url: Option<String>,
}

/// List articles with optional filters and ordering.
#[utoipa::path(
    get,
    path = "/api/articles",
    params(ArticleListQuery),
    responses(
        (status = 200, description = "Articles", body = ArticlesResponse),
        (status = 400, description = "Invalid sort, order or filter value", body = Error),
        (status = 404, description = "Unknown topic or author", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "listArticles"
)]
#[get("/articles")]
pub async fn get_articles(
    state: web::Data<HttpState>,
    query: web::Query<ArticleListQuery>,
) -> ApiResult<web::Json<ArticlesResponse>> {
    let query = query.into_inner();
    let articles = state
        .articles
        .list(ArticleListParams {
            sort_by: query.sort_by,
            order: query.order,
            topic: query.topic,
            author: query.author,
        })
        .await?;
    Ok(web::Json(ArticlesResponse { articles }))
}

/// Fetch one article with its comment count.
#[utoipa::path(
    get,
    path = "/api/articles/{article_id}",
    params(("article_id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article", body = ArticleDetailResponse),
        (status = 400, description = "Invalid article id", body = Error),
        (status = 404, description = "Article not found", body = Error)
    ),
    tags = ["articles"],
    operation_id = "getArticleById"
)]
#[get("/articles/{article_id}")]
pub async fn get_article_by_id(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ArticleDetailResponse>> {
    let article = state.articles.get(&path.into_inner()).await?;
    Ok(web::Json(ArticleDetailResponse { article }))
}

/// Apply a vote delta to an article.
#[utoipa::path(
    patch,
    path = "/api/articles/{article_id}",
    params(("article_id" = String, Path, description = "Article id")),
    request_body = VotePayload,
    responses(
        (status = 200, description = "Updated article", body = ArticleResponse),
        (status = 400, description = "Invalid id or vote delta", body = Error),
        (status = 404, description = "Article not found", body = Error)
    ),
    tags = ["articles"],
    operation_id = "incrementArticleVotes"
)]
#[patch("/articles/{article_id}")]
pub async fn patch_article_votes(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<VotePayload>,
) -> ApiResult<web::Json<ArticleResponse>> {
    let article = state
        .articles
        .increment_votes(&path.into_inner(), payload.inc_votes.as_ref())
        .await?;
    Ok(web::Json(ArticleResponse { article }))
}

/// Create an article.
#[utoipa::path(
    post,
    path = "/api/articles",
    request_body = NewArticleRequest,
    responses(
        (status = 201, description = "Created article", body = ArticleResponse),
        (status = 400, description = "Missing or invalid fields", body = Error),
        (status = 404, description = "Unknown topic or author", body = Error)
    ),
    tags = ["articles"],
    operation_id = "addArticle"
)]
#[post("/articles")]
pub async fn post_article(
    state: web::Data<HttpState>,
    payload: web::Json<NewArticleRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let article = NewArticle::try_from_parts(
        &payload.title,
        &payload.topic,
        &payload.author,
        &payload.body,
        payload.article_img_url.as_deref(),
    )
    .map_err(|err| Error::invalid_field(err.to_string()))?;

    let created = state.articles.add(article).await?;
    Ok(HttpResponse::Created().json(ArticleResponse { article: created }))
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
                    .service(get_articles)
                    .service(post_article)
                    .service(get_article_by_id)
                    .service(patch_article_votes),
            )
    }

    #[actix_web::test]
    async fn get_articles_lists_summaries_without_bodies() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/articles")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        let articles = body
            .get("articles")
            .and_then(Value::as_array)
            .expect("articles array");
        assert_eq!(articles.len(), 5);
        for article in articles {
            assert!(article.get("body").is_none());
            assert!(article.get("comment_count").is_some());
        }
    }

    #[rstest]
    #[case("/api/articles?sort_by=banana")]
    #[case("/api/articles?order=sideways")]
    #[case("/api/articles?topic=")]
    #[actix_web::test]
    async fn get_articles_rejects_invalid_queries(#[case] uri: &str) {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(uri).to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn get_articles_with_unknown_author_is_not_found() {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/articles?author=nobody")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn get_article_by_id_includes_body_and_comment_count() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/articles/1")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        let article = body.get("article").expect("article envelope");
        assert_eq!(article.get("votes").and_then(Value::as_i64), Some(100));
        assert_eq!(
            article.get("comment_count").and_then(Value::as_i64),
            Some(11)
        );
        assert!(article.get("body").is_some());
    }

    #[actix_web::test]
    async fn patch_article_votes_round_trips_the_delta() {
        let app = actix_test::init_service(test_app()).await;

        let request = actix_test::TestRequest::patch()
            .uri("/api/articles/1")
            .set_json(json!({ "inc_votes": -100 }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/article/votes").and_then(Value::as_i64),
            Some(0)
        );
    }

    #[actix_web::test]
    async fn patch_article_votes_rejects_a_missing_delta() {
        let app = actix_test::init_service(test_app()).await;

        let request = actix_test::TestRequest::patch()
            .uri("/api/articles/1")
            .set_json(json!({}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("inc_votes must be a number")
        );
    }

    #[actix_web::test]
    async fn post_article_creates_with_defaults() {
        let app = actix_test::init_service(test_app()).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/articles")
            .set_json(json!({
                "author": "butter_bridge",
                "title": "Another day, another mitch",
                "body": "Content.",
                "topic": "mitch"
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/article/votes").and_then(Value::as_i64),
            Some(0)
        );
        assert!(
            body.pointer("/article/article_img_url")
                .and_then(Value::as_str)
                .is_some_and(|url| !url.is_empty())
        );
    }
}
