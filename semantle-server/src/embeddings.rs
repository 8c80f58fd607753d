use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use semantle_core::{ScoringEngine, ScoringError, normalize_word};

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Cannot embed an empty word")]
    EmptyWord,
    #[error("Embedding request timed out")]
    Timeout,
    #[error("Embedding request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("Embedding provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Embedding provider returned no vector")]
    EmptyEmbedding,
    #[error("No embedding for '{word}'")]
    UnknownWord { word: String },
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EmbeddingError::Timeout
        } else {
            EmbeddingError::Request(err)
        }
    }
}

/// Source of word vectors. Every vector from one provider must have the
/// same length.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, word: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for an OpenAI-compatible `/embeddings` endpoint.
pub struct OpenAiEmbeddingProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiEmbeddingProvider {
    pub fn new(
        api_key: String,
        base_url: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, word: &str) -> Result<Vec<f32>, EmbeddingError> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: word,
            encoding_format: "float",
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse = response.json().await?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .filter(|embedding| !embedding.is_empty())
            .ok_or(EmbeddingError::EmptyEmbedding)
    }
}

/// Caching front for an [`EmbeddingProvider`].
///
/// Keys are normalized words, so "Cat" and "cat" share an entry. Entries are
/// never evicted.
pub struct EmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
    cache: RwLock<HashMap<String, Arc<Vec<f32>>>>,
    timeout: Option<Duration>,
}

impl EmbeddingService {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            cache: RwLock::new(HashMap::new()),
            timeout: None,
        }
    }

    /// Bound every provider call; an expired call fails with
    /// [`EmbeddingError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn get_embedding(&self, word: &str) -> Result<Arc<Vec<f32>>, EmbeddingError> {
        let word = normalize_word(word);
        if word.is_empty() {
            return Err(EmbeddingError::EmptyWord);
        }

        if let Some(embedding) = self.cache.read().await.get(&word) {
            debug!("Embedding cache hit for '{}'", word);
            return Ok(embedding.clone());
        }

        debug!("Embedding cache miss for '{}'", word);
        let embedding = Arc::new(self.fetch(&word).await?);

        let mut cache = self.cache.write().await;
        Ok(cache.entry(word).or_insert(embedding).clone())
    }

    async fn fetch(&self, word: &str) -> Result<Vec<f32>, EmbeddingError> {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.provider.embed(word))
                .await
                .map_err(|_| EmbeddingError::Timeout)?,
            None => self.provider.embed(word).await,
        }
    }

    /// A word is valid when the provider can embed it.
    pub async fn is_word_valid(&self, word: &str) -> bool {
        let word = normalize_word(word);
        if word.is_empty() {
            return false;
        }

        match self.get_embedding(&word).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Word '{}' is not valid: {}", word, e);
                false
            }
        }
    }

    /// Similarity in [0, 1]. Identical words score exactly 1.0 without any
    /// embedding lookup.
    pub async fn similarity(&self, target: &str, guess: &str) -> Result<f64, EmbeddingError> {
        if ScoringEngine::is_exact_match(guess, target) {
            return Ok(1.0);
        }

        let target = self.get_embedding(target).await?;
        let guess = self.get_embedding(guess).await?;
        Ok(ScoringEngine::similarity(&target, &guess)?)
    }

    pub async fn cached_words(&self) -> usize {
        self.cache.read().await.len()
    }
}
