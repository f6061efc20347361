//! Skill extraction from job offers
//!
//! Keyphrases are chosen by embedding similarity to the whole offer, with
//! Maximal Marginal Relevance re-ranking so the selected phrases do not all
//! say the same thing. Selected phrases are then split into atomic terms.

use crate::config::SkillConfig;
use crate::error::{CvRankerError, Result};
use crate::processing::embeddings::{cosine_similarity, Embedder};
use crate::processing::text_processor::TextProcessor;
use log::debug;
use regex::Regex;
use std::collections::HashSet;

/// A selected keyphrase with its similarity to the whole text
#[derive(Debug, Clone, PartialEq)]
pub struct Keyphrase {
    pub phrase: String,
    pub relevance: f32,
}

pub struct SkillExtractor<'a> {
    embedder: &'a dyn Embedder,
    processor: TextProcessor,
    settings: SkillConfig,
    separator_regex: Regex,
    enumeration_regex: Regex,
}

impl<'a> SkillExtractor<'a> {
    pub fn new(embedder: &'a dyn Embedder, settings: SkillConfig) -> Self {
        let separator_regex = Regex::new("[•\\-\u{2022},;/\n]+").expect("Invalid separator regex");
        let enumeration_regex = Regex::new(r"^\d+\.?\s*").expect("Invalid enumeration regex");

        Self {
            embedder,
            processor: TextProcessor::new(),
            settings,
            separator_regex,
            enumeration_regex,
        }
    }

    /// Up to `top_k` distinct skill phrases, in selection order
    pub fn extract_skills(&self, text: &str, top_k: usize) -> Result<Vec<String>> {
        if text.trim().is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let keyphrases = self.extract_keyphrases(text, top_k)?;

        let mut seen = HashSet::new();
        let mut skills = Vec::new();
        for keyphrase in &keyphrases {
            for part in self.split_phrase(&keyphrase.phrase) {
                if seen.insert(part.clone()) {
                    skills.push(part);
                }
            }
        }

        skills.truncate(top_k);
        debug!("Detected {} skill(s): {}", skills.len(), skills.join(", "));
        Ok(skills)
    }

    /// Keyphrases of the normalized text, diversified with MMR
    pub fn extract_keyphrases(&self, text: &str, top_n: usize) -> Result<Vec<Keyphrase>> {
        let normalized = self.processor.normalize(text);
        let candidates = self.candidates(&normalized);
        if candidates.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let mut inputs = Vec::with_capacity(candidates.len() + 1);
        inputs.push(normalized);
        inputs.extend(candidates.iter().cloned());

        let mut embeddings = self.embedder.encode(&inputs)?;
        if embeddings.len() != inputs.len() {
            return Err(CvRankerError::Embedding(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                embeddings.len()
            )));
        }
        let candidate_embeddings = embeddings.split_off(1);
        let document_embedding = &embeddings[0];

        let relevance = candidate_embeddings
            .iter()
            .map(|c| cosine_similarity(c, document_embedding))
            .collect::<Result<Vec<f32>>>()?;

        // Pool of the most relevant candidates; the stable sort keeps text order on ties
        let mut pool: Vec<usize> = (0..candidates.len()).collect();
        pool.sort_by(|&a, &b| relevance[b].total_cmp(&relevance[a]));
        pool.truncate(self.settings.candidate_pool);

        let pool_embeddings: Vec<&[f32]> = pool.iter().map(|&i| candidate_embeddings[i].as_slice()).collect();
        let pool_relevance: Vec<f32> = pool.iter().map(|&i| relevance[i]).collect();

        let selected = maximal_marginal_relevance(&pool_relevance, &pool_embeddings, top_n, self.settings.diversity)?;

        Ok(selected
            .into_iter()
            .map(|i| Keyphrase {
                phrase: candidates[pool[i]].clone(),
                relevance: pool_relevance[i],
            })
            .collect())
    }

    /// Unique n-grams of the lowercased tokens, in order of first appearance
    pub fn candidates(&self, text: &str) -> Vec<String> {
        let tokens = self.processor.tokenize(text);
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for n in self.settings.ngram_min..=self.settings.ngram_max {
            if n == 0 || n > tokens.len() {
                continue;
            }
            for window in tokens.windows(n) {
                let phrase = window.join(" ");
                if seen.insert(phrase.clone()) {
                    candidates.push(phrase);
                }
            }
        }
        candidates
    }

    /// Split a phrase on list separators and clean each part
    pub fn split_phrase(&self, phrase: &str) -> Vec<String> {
        self.separator_regex
            .split(phrase)
            .filter_map(|chunk| {
                let collapsed = self.processor.collapse_whitespace(chunk);
                let stripped = collapsed.trim_matches(|c: char| " .;,-·\t".contains(c));
                let cleaned = self.enumeration_regex.replace(stripped, "");
                if cleaned.is_empty() {
                    None
                } else {
                    Some(cleaned.into_owned())
                }
            })
            .collect()
    }
}

/// Select up to `top_n` indices balancing relevance against redundancy.
///
/// Starts with the most relevant item, then repeatedly takes the item
/// maximizing `(1 - diversity) * relevance - diversity * max_sim_to_selected`.
pub fn maximal_marginal_relevance(
    relevance: &[f32],
    embeddings: &[&[f32]],
    top_n: usize,
    diversity: f32,
) -> Result<Vec<usize>> {
    if relevance.len() != embeddings.len() {
        return Err(CvRankerError::Processing(format!(
            "{} relevance scores for {} embeddings",
            relevance.len(),
            embeddings.len()
        )));
    }
    if relevance.is_empty() || top_n == 0 {
        return Ok(Vec::new());
    }

    let first = argmax(relevance.iter().copied().enumerate());
    let mut selected = vec![first];
    let mut remaining: Vec<usize> = (0..relevance.len()).filter(|&i| i != first).collect();

    // Highest similarity of each item to anything selected so far
    let mut redundancy = vec![f32::NEG_INFINITY; relevance.len()];

    while selected.len() < top_n && !remaining.is_empty() {
        let last = selected[selected.len() - 1];
        for &i in &remaining {
            let sim = cosine_similarity(embeddings[i], embeddings[last])?;
            redundancy[i] = redundancy[i].max(sim);
        }

        let best = argmax(
            remaining
                .iter()
                .enumerate()
                .map(|(pos, &i)| (pos, (1.0 - diversity) * relevance[i] - diversity * redundancy[i])),
        );
        selected.push(remaining.remove(best));
    }

    Ok(selected)
}

/// Index of the first maximum
fn argmax(values: impl Iterator<Item = (usize, f32)>) -> usize {
    let mut best = (0, f32::NEG_INFINITY);
    for (index, value) in values {
        if value > best.1 {
            best = (index, value);
        }
    }
    best.0
}
