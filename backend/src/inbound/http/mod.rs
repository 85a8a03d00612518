//! HTTP inbound adapter exposing REST endpoints.

pub mod articles;
pub mod comments;
pub mod error;
pub mod health;
pub mod state;
pub mod topics;
pub mod users;

use actix_web::HttpResponse;
use actix_web::ResponseError;

use crate::domain::Error;

pub use error::ApiResult;

/// Fallback handler for routes the table does not know.
pub async fn endpoint_not_found() -> HttpResponse {
    Error::not_found("Endpoint does not exist").error_response()
}
