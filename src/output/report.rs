//! Ranking report handed to the formatters

use crate::processing::document::JobQuery;
use crate::processing::ranking::{RankedResult, ResultSet};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub job_title: String,
    pub query: String,
    pub detected_skills: Vec<String>,
    /// Results truncated to the requested top-K
    pub results: Vec<RankedResult>,
    pub total_documents: usize,
    pub unreadable_documents: usize,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub embedding_model: String,
    pub top_k: usize,
}

impl RankingReport {
    pub fn new(query: &JobQuery, results: &ResultSet, top_k: usize, embedding_model: &str) -> Self {
        Self {
            job_title: query.title().to_string(),
            query: query.text().to_string(),
            detected_skills: query.skills().to_vec(),
            results: results.top(top_k).to_vec(),
            total_documents: results.len(),
            unreadable_documents: results.results().iter().filter(|r| !r.is_readable()).count(),
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                embedding_model: embedding_model.to_string(),
                top_k,
            },
        }
    }
}
