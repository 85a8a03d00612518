//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use crate::domain::{ArticlesService, CommentsService, TopicsService, UsersService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub topics: TopicsService,
    pub articles: ArticlesService,
    pub comments: CommentsService,
    pub users: UsersService,
}
