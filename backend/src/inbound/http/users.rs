//! Users API handlers.
//!
//! ```text
//! GET /api/users
//! GET /api/users/{username}
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// User listing envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

/// Single-user envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user: User,
}

/// List all users.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = UsersResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn get_users(state: web::Data<HttpState>) -> ApiResult<web::Json<UsersResponse>> {
    let users = state.users.list().await?;
    Ok(web::Json(UsersResponse { users }))
}

/// Fetch one user by username.
#[utoipa::path(
    get,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserByUsername"
)]
#[get("/users/{username}")]
pub async fn get_user_by_username(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.users.get_by_username(&path.into_inner()).await?;
    Ok(web::Json(UserResponse { user }))
}
