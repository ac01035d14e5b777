//! Recommendation data sources
//!
//! The deck does not care where a batch comes from: the HTTP backend in production,
//! a fixed list in tests and demos. Each source turns a free-text preference (a mood,
//! or movies the user liked) into an ordered batch of item records.

use crate::{error::AppResult, models::ItemRecord};

pub mod fixed;
pub mod movie_api;

pub use fixed::FixedRecommendationSource;
pub use movie_api::MovieApiSource;

/// Trait for recommendation providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Fetch an ordered batch of recommendations for a preference
    ///
    /// An empty batch is a valid answer meaning "nothing to recommend". Failures are
    /// returned as errors so that callers never start a deck from a partial batch.
    async fn recommend(&self, preference: &str) -> AppResult<Vec<ItemRecord>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
