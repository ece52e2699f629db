//! Deterministic stand-ins for the embedder, retriever and LLM.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    llm::{LlmClient, LlmError},
    retriever::ContextRetriever,
    semantic::{model_id_hash, Embedder, EmbeddingError},
};

/// Embeds text by folding its bytes into a fixed number of buckets.
pub struct HashEmbedder {
    dimensions: usize,
    fail: bool,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            fail: false,
        }
    }

    pub fn failing(dimensions: usize) -> Self {
        Self {
            dimensions,
            fail: true,
        }
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.fail {
            return Err(EmbeddingError::EmbeddingFailed("stub failure".to_string()));
        }

        let mut vector = vec![0.0; self.dimensions];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dimensions] += byte as f32 / 255.0;
        }
        Ok(vector)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> [u8; 32] {
        model_id_hash("hash-embedder")
    }
}

/// Returns the same vector for every text.
pub struct FixedEmbedder(pub Vec<f32>);

impl Embedder for FixedEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.0.clone())
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|_| self.0.clone()).collect())
    }

    fn dimensions(&self) -> usize {
        self.0.len()
    }

    fn model_id(&self) -> [u8; 32] {
        model_id_hash("fixed-embedder")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveCall {
    pub query: String,
    pub city_filter: Option<String>,
    pub top_k: usize,
}

/// Returns canned context and records how it was called.
pub struct StaticRetriever {
    context: Vec<String>,
    calls: Mutex<Vec<RetrieveCall>>,
}

impl StaticRetriever {
    pub fn new(context: &[&str]) -> Self {
        Self {
            context: context.iter().map(|s| s.to_string()).collect(),
            calls: Mutex::new(vec![]),
        }
    }

    pub fn calls(&self) -> Vec<RetrieveCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ContextRetriever for StaticRetriever {
    fn retrieve(&self, query: &str, city_filter: Option<&str>, top_k: usize) -> Vec<String> {
        self.calls.lock().unwrap().push(RetrieveCall {
            query: query.to_string(),
            city_filter: city_filter.map(str::to_owned),
            top_k,
        });
        self.context.iter().take(top_k).cloned().collect()
    }
}

/// Answers with the prompt it was given.
pub struct EchoLlm;

#[async_trait]
impl LlmClient for EchoLlm {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        Ok(prompt.to_string())
    }
}

pub struct FailingLlm;

#[async_trait]
impl LlmClient for FailingLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Status {
            status: 503,
            body: "provider unavailable".to_string(),
        })
    }
}
