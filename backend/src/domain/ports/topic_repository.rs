//! Port for topic persistence.

use async_trait::async_trait;

use crate::domain::topic::{NewTopic, Topic};

use super::define_port_error;

define_port_error! {
    /// Errors raised by topic repository adapters.
    pub enum TopicRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "topic repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "topic repository query failed: {message}",
    }
}

/// Port for topic storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Fetch all topics in insertion order.
    async fn list(&self) -> Result<Vec<Topic>, TopicRepositoryError>;

    /// Cheap existence probe for the listing's topic filter.
    async fn exists(&self, slug: &str) -> Result<bool, TopicRepositoryError>;

    /// Insert a new topic and return the stored row.
    async fn insert(&self, topic: NewTopic) -> Result<Topic, TopicRepositoryError>;
}
