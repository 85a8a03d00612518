//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via Diesel, with async execution through `diesel-async` and
//! `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types; pipeline logic lives in the domain services.
//! - **Internal models**: Diesel row structs (`models.rs`), schema
//!   definitions (`schema.rs`) and statement builders
//!   (`article_queries.rs`) never leak to the domain layer.
//! - **Strongly typed errors**: every driver error is mapped to a port
//!   error through `diesel_error_mapping`.

mod article_queries;
mod diesel_article_repository;
mod diesel_comment_repository;
pub(crate) mod diesel_error_mapping;
mod diesel_topic_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_article_repository::DieselArticleRepository;
pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_topic_repository::DieselTopicRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
