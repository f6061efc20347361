//! Shortlist export and copies of readable résumés

use crate::error::Result;
use crate::processing::document::CandidateBatch;
use crate::processing::ranking::RankedResult;
use log::info;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const SHORTLIST_HEADER: [&str; 2] = ["fichier", "pertinence_%"];
pub const TABLE_HEADER: [&str; 3] = ["fichier", "pertinence_%", "note"];

#[derive(Serialize)]
struct ShortlistRow<'a> {
    fichier: &'a str,
    #[serde(rename = "pertinence_%")]
    pertinence: f64,
}

#[derive(Serialize)]
struct TableRow<'a> {
    fichier: &'a str,
    #[serde(rename = "pertinence_%")]
    pertinence: f64,
    note: String,
}

/// Write `fichier,pertinence_%` rows; the header is written even for an empty list
pub fn write_shortlist<W: Write>(writer: W, rows: &[&RankedResult]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(SHORTLIST_HEADER)?;

    for row in rows {
        csv_writer.serialize(ShortlistRow {
            fichier: &row.filename,
            pertinence: row.percentage,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the ranked table with its `note` column
pub fn write_table<W: Write>(writer: W, rows: &[RankedResult]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(TABLE_HEADER)?;

    for row in rows {
        csv_writer.serialize(TableRow {
            fichier: &row.filename,
            pertinence: row.percentage,
            note: row.note_text(),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn export_shortlist(path: &Path, rows: &[&RankedResult]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_shortlist(file, rows)?;
    info!("Shortlist of {} candidate(s) written to {}", rows.len(), path.display());
    Ok(())
}

/// `shortlist_Data_Engineer.csv` for "Data Engineer"
pub fn shortlist_file_name(job_title: &str) -> String {
    format!("shortlist_{}.csv", job_title.trim().replace(' ', "_"))
}

/// Copy the original bytes of the given results into `dir`
pub async fn copy_documents(batch: &CandidateBatch, results: &[&RankedResult], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).await?;

    let mut written = Vec::new();
    for result in results {
        if let Some(document) = batch.get(&result.filename) {
            let target = dir.join(&document.filename);
            fs::write(&target, &document.content).await?;
            written.push(target);
        }
    }

    info!("Copied {} résumé(s) to {}", written.len(), dir.display());
    Ok(written)
}
