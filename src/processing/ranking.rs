//! Ranking of candidate documents against a job query

use crate::error::Result;
use crate::input::text_extractor::DocumentTextExtractor;
use crate::processing::document::{CandidateBatch, CandidateDocument, JobQuery};
use crate::processing::embeddings::SimilarityScorer;
use log::{debug, info, warn};
use serde::{Serialize, Serializer};
use std::fmt;

/// Why a document was ranked without a similarity score
#[derive(Debug, Clone, PartialEq)]
pub enum RankNote {
    NoTextExtracted,
    Failed(String),
}

impl fmt::Display for RankNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankNote::NoTextExtracted => write!(f, "no text extracted"),
            RankNote::Failed(message) => write!(f, "error: {}", message),
        }
    }
}

impl Serialize for RankNote {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    #[serde(rename = "fichier")]
    pub filename: String,
    pub score: f32,
    #[serde(rename = "pertinence_%")]
    pub percentage: f64,
    pub note: Option<RankNote>,
}

impl RankedResult {
    /// Scores are clamped to [0, 1] so percentages are never negative.
    /// NaN and `-0.0` both become `+0.0`, which keeps ties in input order.
    pub fn scored(filename: &str, similarity: f32) -> Self {
        let score = if similarity > 0.0 { similarity.min(1.0) } else { 0.0 };
        Self {
            filename: filename.to_string(),
            score,
            percentage: to_percentage(score),
            note: None,
        }
    }

    pub fn unscored(filename: &str, note: RankNote) -> Self {
        Self {
            filename: filename.to_string(),
            score: 0.0,
            percentage: 0.0,
            note: Some(note),
        }
    }

    pub fn is_readable(&self) -> bool {
        self.note != Some(RankNote::NoTextExtracted)
    }

    pub fn note_text(&self) -> String {
        self.note.as_ref().map(|n| n.to_string()).unwrap_or_default()
    }
}

/// `score * 100` rounded to two decimals
pub fn to_percentage(score: f32) -> f64 {
    (f64::from(score) * 100.0 * 100.0).round() / 100.0
}

/// Results sorted by score, highest first; ties keep input order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    results: Vec<RankedResult>,
}

impl ResultSet {
    pub fn from_unsorted(mut results: Vec<RankedResult>) -> Self {
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self { results }
    }

    pub fn results(&self) -> &[RankedResult] {
        &self.results
    }

    pub fn top(&self, k: usize) -> &[RankedResult] {
        &self.results[..k.min(self.results.len())]
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, filename: &str) -> Option<&RankedResult> {
        self.results.iter().find(|r| r.filename == filename)
    }

    /// Results whose file name is in `filenames`, in ranked order
    pub fn shortlist(&self, filenames: &[String]) -> Vec<&RankedResult> {
        self.results
            .iter()
            .filter(|r| filenames.iter().any(|f| f == &r.filename))
            .collect()
    }

    /// File names of the first `min(n, len)` results
    pub fn default_shortlist(&self, n: usize) -> Vec<String> {
        self.top(n).iter().map(|r| r.filename.clone()).collect()
    }

    /// The first `k` results that had extractable text
    pub fn readable_top(&self, k: usize) -> Vec<&RankedResult> {
        self.results.iter().filter(|r| r.is_readable()).take(k).collect()
    }
}

/// Extracts and scores every document of a batch, one at a time
pub struct RankingPipeline<'a> {
    extractor: &'a DocumentTextExtractor,
    scorer: SimilarityScorer<'a>,
}

impl<'a> RankingPipeline<'a> {
    pub fn new(extractor: &'a DocumentTextExtractor, scorer: SimilarityScorer<'a>) -> Self {
        Self { extractor, scorer }
    }

    pub fn rank(&self, query: &JobQuery, documents: &CandidateBatch) -> Result<ResultSet> {
        self.rank_with_progress(query, documents, |_| {})
    }

    /// Rank the whole batch; `on_document` runs after each document.
    ///
    /// Per-document failures end up in the result's note. Only a failure to
    /// embed the query itself is returned as an error.
    pub fn rank_with_progress<F>(
        &self,
        query: &JobQuery,
        documents: &CandidateBatch,
        mut on_document: F,
    ) -> Result<ResultSet>
    where
        F: FnMut(&RankedResult),
    {
        info!(
            "Ranking {} document(s) with {} against: {}",
            documents.len(),
            self.scorer.model_name(),
            query.text()
        );
        let query_embedding = self.scorer.embed(query.text())?;

        let mut results = Vec::with_capacity(documents.len());
        for document in documents.iter() {
            let result = self.rank_document(&query_embedding, document);
            on_document(&result);
            results.push(result);
        }

        Ok(ResultSet::from_unsorted(results))
    }

    fn rank_document(&self, query_embedding: &[f32], document: &CandidateDocument) -> RankedResult {
        let name = document.filename.as_str();

        let text = match self.extractor.extract_text(name, &document.content) {
            Ok(text) => text,
            Err(e) => {
                warn!("Extraction failed for {}: {}", name, e);
                return RankedResult::unscored(name, RankNote::Failed(e.to_string()));
            }
        };

        // Whitespace-only text has nothing to embed
        if text.trim().is_empty() {
            warn!("No text extracted from {}", name);
            return RankedResult::unscored(name, RankNote::NoTextExtracted);
        }

        match self.scorer.score_embedded(query_embedding, &text) {
            Ok(similarity) => {
                debug!("{} scored {:.4}", name, similarity);
                RankedResult::scored(name, similarity)
            }
            Err(e) => {
                warn!("Scoring failed for {}: {}", name, e);
                RankedResult::unscored(name, RankNote::Failed(e.to_string()))
            }
        }
    }
}
