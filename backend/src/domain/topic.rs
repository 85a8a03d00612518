//! Topic data model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A topic row: a unique slug plus a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Topic {
    /// Unique identifier, referenced by articles.
    pub slug: String,
    /// Short description shown in topic listings.
    pub description: String,
}

/// Validation errors returned by [`NewTopic::try_from_parts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TopicValidationError {
    /// The slug was missing or empty once trimmed.
    #[error("slug must be a non-empty string")]
    EmptySlug,
    /// The description was missing or empty once trimmed.
    #[error("description must be a non-empty string")]
    EmptyDescription,
}

/// A validated topic insertion payload.
///
/// ## Invariants
/// - `slug` and `description` are non-empty once trimmed (enforced by
///   [`NewTopic::try_from_parts`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopic {
    slug: String,
    description: String,
}

impl NewTopic {
    /// Validate and construct a topic payload from raw request fields.
    ///
    /// # Errors
    ///
    /// Returns [`TopicValidationError`] when either field is empty after
    /// trimming.
    pub fn try_from_parts(slug: &str, description: &str) -> Result<Self, TopicValidationError> {
        if slug.trim().is_empty() {
            return Err(TopicValidationError::EmptySlug);
        }
        if description.trim().is_empty() {
            return Err(TopicValidationError::EmptyDescription);
        }
        Ok(Self {
            slug: slug.to_owned(),
            description: description.to_owned(),
        })
    }

    /// The validated slug.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// The validated description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "what books are made of", TopicValidationError::EmptySlug)]
    #[case("   ", "what books are made of", TopicValidationError::EmptySlug)]
    #[case("paper", "", TopicValidationError::EmptyDescription)]
    #[case("paper", " \t", TopicValidationError::EmptyDescription)]
    fn rejects_blank_fields(
        #[case] slug: &str,
        #[case] description: &str,
        #[case] expected: TopicValidationError,
    ) {
        assert_eq!(NewTopic::try_from_parts(slug, description), Err(expected));
    }

    #[rstest]
    fn keeps_valid_fields_verbatim() {
        let topic = NewTopic::try_from_parts("paper", "what books are made of")
            .expect("valid topic payload");
        assert_eq!(topic.slug(), "paper");
        assert_eq!(topic.description(), "what books are made of");
    }
}
