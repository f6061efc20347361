//! Sentence embeddings and similarity scoring

use crate::error::{CvRankerError, Result};
use anyhow::Context;
use log::debug;
use model2vec_rs::model::StaticModel;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;

/// Anything that turns texts into fixed-length vectors
pub trait Embedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
    fn model_name(&self) -> &str;
}

/// Model2Vec static embedding model
pub struct StaticEmbedder {
    model: StaticModel,
    model_name: String,
}

impl StaticEmbedder {
    /// Load from a local model folder or a Hugging Face repo id
    pub fn from_pretrained(repo_or_path: &str) -> Result<Self> {
        let start_time = Instant::now();

        let model = StaticModel::from_pretrained(
            Path::new(repo_or_path),
            None, // token
            None, // normalize
            None, // subfolder
        )
        .with_context(|| format!("cannot load {}", repo_or_path))?;

        debug!("Model {} loaded in {:.2?}", repo_or_path, start_time.elapsed());

        Ok(Self {
            model,
            model_name: repo_or_path.to_string(),
        })
    }
}

impl Embedder for StaticEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // The tokenizer inside model2vec panics instead of returning errors
        panic::catch_unwind(AssertUnwindSafe(|| self.model.encode(texts)))
            .map_err(|_| CvRankerError::Embedding("tokenization failed".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Cosine similarity of two vectors, in [-1, 1]. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(CvRankerError::Processing(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

/// Scores candidate texts against a query with a shared embedder
pub struct SimilarityScorer<'a> {
    embedder: &'a dyn Embedder,
}

impl<'a> SimilarityScorer<'a> {
    pub fn new(embedder: &'a dyn Embedder) -> Self {
        Self { embedder }
    }

    /// Cosine similarity between the embeddings of both texts (not clamped)
    pub fn score(&self, query_text: &str, candidate_text: &str) -> Result<f32> {
        let embeddings = self
            .embedder
            .encode(&[query_text.to_string(), candidate_text.to_string()])?;

        match embeddings.as_slice() {
            [query, candidate] => cosine_similarity(query, candidate),
            other => Err(CvRankerError::Embedding(format!(
                "expected 2 embeddings, got {}",
                other.len()
            ))),
        }
    }

    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embedder
            .encode(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| CvRankerError::Embedding("model returned no embedding".to_string()))
    }

    /// Same as [`score`](Self::score) with the query already embedded
    pub fn score_embedded(&self, query_embedding: &[f32], candidate_text: &str) -> Result<f32> {
        let candidate = self.embed(candidate_text)?;
        cosine_similarity(query_embedding, &candidate)
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }
}
