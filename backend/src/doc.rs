//! OpenAPI document for the REST surface.
//!
//! Served as JSON from `GET /api`, so clients get a machine-readable
//! catalogue of every endpoint from the API root.

use actix_web::{get, web};
use utoipa::OpenApi;

/// Public OpenAPI surface used by tooling and the `/api` catalogue route.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "news-api",
        description = "Read/write REST API over a news-article domain: topics, articles, comments and users backed by PostgreSQL."
    ),
    paths(
        crate::inbound::http::topics::get_topics,
        crate::inbound::http::topics::post_topic,
        crate::inbound::http::articles::get_articles,
        crate::inbound::http::articles::post_article,
        crate::inbound::http::articles::get_article_by_id,
        crate::inbound::http::articles::patch_article_votes,
        crate::inbound::http::comments::get_comments_for_article,
        crate::inbound::http::comments::post_comment,
        crate::inbound::http::comments::get_comment_by_id,
        crate::inbound::http::comments::patch_comment_votes,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::users::get_users,
        crate::inbound::http::users::get_user_by_username,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    tags(
        (name = "topics", description = "Topic listings and creation"),
        (name = "articles", description = "Article listings, fetches and vote mutations"),
        (name = "comments", description = "Comment threads, creation, votes and deletion"),
        (name = "users", description = "User listings and lookups"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;

/// Serve the endpoint catalogue from the API root.
#[get("/api")]
pub async fn api_index() -> web::Json<utoipa::openapi::OpenApi> {
    web::Json(ApiDoc::openapi())
}
