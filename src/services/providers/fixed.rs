use crate::{error::AppResult, models::ItemRecord, services::providers::RecommendationSource};

/// Serves the same batch for every preference
#[derive(Debug, Clone, Default)]
pub struct FixedRecommendationSource {
    items: Vec<ItemRecord>,
}

impl FixedRecommendationSource {
    pub fn new(items: Vec<ItemRecord>) -> Self {
        Self { items }
    }
}

#[async_trait::async_trait]
impl RecommendationSource for FixedRecommendationSource {
    async fn recommend(&self, preference: &str) -> AppResult<Vec<ItemRecord>> {
        tracing::debug!(preference = %preference, results = self.items.len(), "Serving fixed batch");
        Ok(self.items.clone())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
