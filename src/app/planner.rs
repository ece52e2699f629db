use std::sync::Arc;

use crate::{
    llm::LlmClient,
    prompt::{self, ItineraryRequest},
    retriever::ContextRetriever,
};

use super::errors::AppError;

/// Retrieve -> compose -> generate, in that order, once per request.
pub struct ItineraryPlanner {
    retriever: Arc<dyn ContextRetriever>,
    llm: Arc<dyn LlmClient>,
    top_k: usize,
}

impl ItineraryPlanner {
    pub fn new(retriever: Arc<dyn ContextRetriever>, llm: Arc<dyn LlmClient>, top_k: usize) -> Self {
        Self {
            retriever,
            llm,
            top_k,
        }
    }

    /// Itinerary prompt for `request`, grounded on whatever the retriever finds.
    pub fn prompt_for(&self, request: &ItineraryRequest) -> String {
        let query = prompt::retrieval_query(request);
        let context = self
            .retriever
            .retrieve(&query, Some(&request.city), self.top_k);

        if context.is_empty() {
            log::warn!("no monument context for {:?}, prompting without it", request.city);
        }

        prompt::compose(request, &context)
    }

    pub async fn generate(&self, request: &ItineraryRequest) -> Result<String, AppError> {
        // embedding is CPU bound
        let prompt = tokio::task::block_in_place(|| self.prompt_for(request));

        let itinerary = self.llm.complete(&prompt).await?;
        log::info!(
            "generated {} byte itinerary for {} ({})",
            itinerary.len(),
            request.city,
            request.trip_duration
        );

        Ok(itinerary)
    }

    /// Answer a free-form question. `None` when nothing relevant was retrieved.
    pub async fn answer(&self, question: &str, top_k: usize) -> Result<Option<String>, AppError> {
        let context = tokio::task::block_in_place(|| self.retriever.retrieve(question, None, top_k));
        if context.is_empty() {
            return Ok(None);
        }

        log::info!("retrieved: {context:?}");

        let prompt = prompt::compose_question(question, &context);
        Ok(Some(self.llm.complete(&prompt).await?))
    }
}
