//! Input manager: reads résumés and job offers from disk

use crate::error::{CvRankerError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::DocumentTextExtractor;
use crate::processing::document::{CandidateBatch, CandidateDocument};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct InputManager {
    extractor: DocumentTextExtractor,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            extractor: DocumentTextExtractor::new(),
        }
    }

    /// Read the job offer file and return its text (PDF, TXT or Markdown)
    pub async fn read_offer(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(CvRankerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let name = file_name(path);
        if FileType::from_name(&name) == FileType::Unknown {
            return Err(CvRankerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            )));
        }

        info!("Extracting offer text from: {}", path.display());
        let bytes = fs::read(path).await?;
        self.extractor.extract_text(&name, &bytes)
    }

    /// Collect résumé files from the given paths. Directories contribute
    /// their PDF and TXT files, sorted by name.
    pub async fn load_resumes(&self, paths: &[PathBuf]) -> Result<CandidateBatch> {
        let mut batch = CandidateBatch::new();

        for path in paths {
            if !path.exists() {
                return Err(CvRankerError::InvalidInput(format!(
                    "File does not exist: {}",
                    path.display()
                )));
            }

            let files = if path.is_dir() {
                self.list_resume_files(path).await?
            } else {
                vec![path.clone()]
            };

            for file in files {
                let name = file_name(&file);
                if !FileType::from_name(&name).is_resume() {
                    warn!("Skipping unsupported résumé file: {}", file.display());
                    continue;
                }
                debug!("Reading résumé: {}", file.display());
                let content = fs::read(&file).await?;
                batch.push(CandidateDocument::new(name, content));
            }
        }

        info!("Loaded {} résumé(s)", batch.len());
        Ok(batch)
    }

    async fn list_resume_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = fs::read_dir(dir).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_file() && FileType::from_name(&file_name(&path)).is_resume() {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
