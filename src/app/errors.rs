use crate::llm::LlmError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("itinerary generation failed: {0}")]
    Llm(#[from] LlmError),

    #[error("unexpected error: {0:?}")]
    Other(#[from] anyhow::Error),
}
