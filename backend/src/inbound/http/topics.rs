//! Topics API handlers.
//!
//! ```text
//! GET  /api/topics
//! POST /api/topics {"slug":"coding","description":"Code is love, code is life"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, NewTopic, Topic, TopicValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Topic listing envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct TopicsResponse {
    pub topics: Vec<Topic>,
}

/// Topic creation request body.
///
/// Unknown fields are rejected rather than ignored, so a client typo cannot
/// silently drop data.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewTopicRequest {
    pub slug: String,
    pub description: String,
}

fn map_topic_validation_error(err: TopicValidationError) -> Error {
    let field = match err {
        TopicValidationError::EmptySlug => "slug",
        TopicValidationError::EmptyDescription => "description",
    };
    Error::invalid_field("Missing required fields").with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// List all topics.
#[utoipa::path(
    get,
    path = "/api/topics",
    responses(
        (status = 200, description = "Topics", body = TopicsResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["topics"],
    operation_id = "listTopics"
)]
#[get("/topics")]
pub async fn get_topics(state: web::Data<HttpState>) -> ApiResult<web::Json<TopicsResponse>> {
    let topics = state.topics.list().await?;
    Ok(web::Json(TopicsResponse { topics }))
}

/// Create a topic.
#[utoipa::path(
    post,
    path = "/api/topics",
    request_body = NewTopicRequest,
    responses(
        (status = 201, description = "Created topic", body = Topic),
        (status = 400, description = "Missing or invalid fields", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["topics"],
    operation_id = "addTopic"
)]
#[post("/topics")]
pub async fn post_topic(
    state: web::Data<HttpState>,
    payload: web::Json<NewTopicRequest>,
) -> ApiResult<HttpResponse> {
    let topic = NewTopic::try_from_parts(&payload.slug, &payload.description)
        .map_err(map_topic_validation_error)?;
    let created = state.topics.add(topic).await?;
    Ok(HttpResponse::Created().json(created))
}
