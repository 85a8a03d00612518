//! Domain entities, validators, ports and services.
//!
//! Purpose: hold everything between the HTTP adapter and the store — the
//! validated row shapes, the boundary validators, the repository ports and
//! the services composing them into the API's operations. Everything here is
//! transport agnostic; adapters translate at the edges.

pub mod article;
pub mod articles_service;
pub mod comment;
pub mod comments_service;
pub mod error;
pub mod ports;
pub mod topic;
pub mod topics_service;
pub mod user;
pub mod users_service;
pub mod validation;

pub use self::article::{
    Article, ArticleDetail, ArticleFilter, ArticleSummary, ArticleValidationError, NewArticle,
    SortColumn, SortOrder,
};
pub use self::articles_service::{ArticleListParams, ArticlesService};
pub use self::comment::{Comment, NewComment};
pub use self::comments_service::CommentsService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::topic::{NewTopic, Topic, TopicValidationError};
pub use self::topics_service::TopicsService;
pub use self::user::User;
pub use self::users_service::UsersService;
