//! Job title options, read from a CSV file

use crate::error::{CvRankerError, Result};
use log::warn;
use std::path::Path;

/// Load the job titles found in `column` of the CSV at `path`.
///
/// Never fails: a missing or malformed file, or a missing column, yields an
/// empty list; [`check_job_title`] then accepts any non-blank title.
pub fn load_job_titles(path: &Path, column: &str) -> Vec<String> {
    match read_column(path, column) {
        Ok(titles) => titles,
        Err(e) => {
            warn!("No job titles loaded from {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

fn read_column(path: &Path, column: &str) -> std::result::Result<Vec<String>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| e.to_string())?;

    let index = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| format!("column '{}' not found", column))?;

    let mut titles = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        if let Some(value) = record.get(index) {
            let value = value.trim();
            if !value.is_empty() {
                titles.push(value.to_string());
            }
        }
    }
    Ok(titles)
}

/// A title is required. When a title list is available it must be one of its
/// entries; without a list any non-blank title is accepted.
pub fn check_job_title(title: &str, titles: &[String]) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CvRankerError::InvalidInput("Job title is required".to_string()));
    }

    if titles.is_empty() {
        warn!("No job title list available, using '{}' as given", title);
    } else if !titles.iter().any(|t| t == title) {
        return Err(CvRankerError::InvalidInput(format!(
            "Unknown job title '{}'. Run `cv-ranker titles` to list them",
            title
        )));
    }
    Ok(())
}
