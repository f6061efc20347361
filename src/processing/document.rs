//! Candidate documents and batches

use serde::Serialize;

/// A résumé as supplied by the user: a file name and its raw bytes
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateDocument {
    pub filename: String,
    pub content: Vec<u8>,
}

impl CandidateDocument {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }
}

/// Documents of one ranking request, in upload order, unique by file name
#[derive(Debug, Clone, Default)]
pub struct CandidateBatch {
    documents: Vec<CandidateDocument>,
}

impl CandidateBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document. A repeated file name replaces the earlier content but
    /// keeps the earlier position.
    pub fn push(&mut self, document: CandidateDocument) {
        match self.documents.iter_mut().find(|d| d.filename == document.filename) {
            Some(existing) => existing.content = document.content,
            None => self.documents.push(document),
        }
    }

    pub fn get(&self, filename: &str) -> Option<&CandidateDocument> {
        self.documents.iter().find(|d| d.filename == filename)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateDocument> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<CandidateDocument> for CandidateBatch {
    fn from_iter<I: IntoIterator<Item = CandidateDocument>>(iter: I) -> Self {
        let mut batch = Self::new();
        for document in iter {
            batch.push(document);
        }
        batch
    }
}

/// The text the candidates are scored against
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobQuery {
    title: String,
    skills: Vec<String>,
    text: String,
}

impl JobQuery {
    /// `"{title}{connector}{skill, skill, ...}"`, or the bare title when no
    /// skills were detected
    pub fn new(title: &str, skills: Vec<String>, connector: &str) -> Self {
        let title = title.trim().to_string();
        let text = if skills.is_empty() {
            title.clone()
        } else {
            format!("{}{}{}", title, connector, skills.join(", "))
        };
        Self { title, skills, text }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
