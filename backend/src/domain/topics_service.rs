//! Topic domain operations.

use std::sync::Arc;

use crate::domain::error::Error;
use crate::domain::ports::{TopicRepository, TopicRepositoryError};
use crate::domain::topic::{NewTopic, Topic};

/// Topic operations: the unconditional listing and the validated insert.
#[derive(Clone)]
pub struct TopicsService {
    topics: Arc<dyn TopicRepository>,
}

fn map_repository_error(error: TopicRepositoryError) -> Error {
    match error {
        TopicRepositoryError::Connection { message } => Error::service_unavailable(message),
        TopicRepositoryError::Query { message } => Error::internal(message),
    }
}

impl TopicsService {
    /// Create a new service backed by the given repository.
    pub fn new(topics: Arc<dyn TopicRepository>) -> Self {
        Self { topics }
    }

    /// Fetch all topics in insertion order.
    ///
    /// # Errors
    ///
    /// Propagates repository failures mapped to domain errors.
    pub async fn list(&self) -> Result<Vec<Topic>, Error> {
        self.topics.list().await.map_err(map_repository_error)
    }

    /// Insert a new topic. Field validation happened when the
    /// [`NewTopic`] was constructed at the boundary.
    ///
    /// # Errors
    ///
    /// Propagates repository failures mapped to domain errors.
    pub async fn add(&self, topic: NewTopic) -> Result<Topic, Error> {
        self.topics
            .insert(topic)
            .await
            .map_err(map_repository_error)
    }
}
