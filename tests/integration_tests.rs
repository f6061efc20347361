//! Integration tests for the CV ranker

mod common;

use approx::assert_relative_eq;
use common::{empty_pdf, text_pdf, HashingEmbedder};
use cv_ranker::config::SkillConfig;
use cv_ranker::input::job_titles::load_job_titles;
use cv_ranker::input::manager::InputManager;
use cv_ranker::input::text_extractor::{DocumentTextExtractor, PdfExtractor};
use cv_ranker::output::export::{copy_documents, export_shortlist};
use cv_ranker::processing::document::{CandidateBatch, CandidateDocument, JobQuery};
use cv_ranker::processing::embeddings::SimilarityScorer;
use cv_ranker::processing::keywords::SkillExtractor;
use cv_ranker::processing::ranking::{RankNote, RankingPipeline, ResultSet};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONNECTOR: &str = " avec compétences en ";

fn skill_settings() -> SkillConfig {
    SkillConfig {
        top_k: 20,
        ngram_min: 1,
        ngram_max: 3,
        diversity: 0.7,
        candidate_pool: 80,
    }
}

#[test]
fn test_pdf_with_text_layer_is_extracted() {
    let bytes = text_pdf("Python developer");
    let text = PdfExtractor::new().extract(&bytes).unwrap();

    assert!(!text.is_empty());
    assert!(text.contains("Python"));
}

#[test]
fn test_pdf_without_text_yields_empty_string() {
    let text = PdfExtractor::new().extract(&empty_pdf()).unwrap();
    assert_eq!(text, "");
}

#[test]
fn test_garbage_pdf_is_an_error() {
    assert!(PdfExtractor::new().extract(b"definitely not a pdf").is_err());
}

#[test]
fn test_ranking_isolates_unreadable_documents() {
    let embedder = HashingEmbedder::new(256);
    let extractor = DocumentTextExtractor::new();
    let pipeline = RankingPipeline::new(&extractor, SimilarityScorer::new(&embedder));

    let query = JobQuery::new("Data Engineer", vec!["python".to_string(), "sql".to_string()], CONNECTOR);
    let batch: CandidateBatch = vec![
        CandidateDocument::new("scan.pdf", empty_pdf()),
        CandidateDocument::new("broken.pdf", b"not a pdf at all".to_vec()),
        CandidateDocument::new("valid.txt", b"Data engineer with Python and SQL".to_vec()),
    ]
    .into_iter()
    .collect();

    let results = pipeline.rank(&query, &batch).unwrap();
    assert_eq!(results.len(), 3);

    let valid = &results.results()[0];
    assert_eq!(valid.filename, "valid.txt");
    assert!(valid.score > 0.0);
    assert!(valid.note.is_none());

    let scan = &results.results()[1];
    assert_eq!(scan.filename, "scan.pdf");
    assert_eq!(scan.percentage, 0.0);
    assert_eq!(scan.note, Some(RankNote::NoTextExtracted));

    let broken = &results.results()[2];
    assert_eq!(broken.filename, "broken.pdf");
    assert_eq!(broken.percentage, 0.0);
    assert!(matches!(broken.note, Some(RankNote::Failed(_))));
    assert!(broken.note_text().starts_with("error: "));
}

#[test]
fn test_matching_resume_ranks_first() {
    let embedder = HashingEmbedder::new(512);
    let extractor = DocumentTextExtractor::new();
    let pipeline = RankingPipeline::new(&extractor, SimilarityScorer::new(&embedder));

    let skills = SkillExtractor::new(&embedder, skill_settings())
        .extract_skills("Required: Python, SQL, Spark, Airflow", 10)
        .unwrap();
    assert!(!skills.is_empty());

    let query = JobQuery::new("Data Engineer", skills, CONNECTOR);
    let batch: CandidateBatch = vec![
        CandidateDocument::new("baker.txt", b"Pastry chef, bread and croissants".to_vec()),
        CandidateDocument::new("engineer.txt", b"Data engineer: Python, SQL, Spark and Airflow pipelines".to_vec()),
    ]
    .into_iter()
    .collect();

    let results = pipeline.rank(&query, &batch).unwrap();
    assert_eq!(results.results()[0].filename, "engineer.txt");
    assert!(results.results()[0].score > results.results()[1].score);
    assert!(results.results().iter().all(|r| (0.0..=1.0).contains(&r.score)));
}

#[test]
fn test_query_scores_itself_at_one() {
    let embedder = HashingEmbedder::new(128);
    let scorer = SimilarityScorer::new(&embedder);
    let query = JobQuery::new("Data Engineer", vec!["python".to_string()], CONNECTOR);

    assert_relative_eq!(scorer.score(query.text(), query.text()).unwrap(), 1.0, epsilon = 1e-5);
}

#[test]
fn test_empty_offer_gives_title_only_query() {
    let embedder = HashingEmbedder::new(128);
    let skills = SkillExtractor::new(&embedder, skill_settings())
        .extract_skills("", 20)
        .unwrap();
    assert!(skills.is_empty());

    let query = JobQuery::new("Data Engineer", skills, CONNECTOR);
    assert_eq!(query.text(), "Data Engineer");
}

#[test]
fn test_shortlist_export() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("exports").join("shortlist_Data_Engineer.csv");

    let results = ResultSet::from_unsorted(vec![
        cv_ranker::processing::ranking::RankedResult::scored("a.pdf", 0.42),
        cv_ranker::processing::ranking::RankedResult::scored("b.pdf", 0.8),
        cv_ranker::processing::ranking::RankedResult::scored("c.pdf", 0.1),
    ]);
    let rows = results.shortlist(&["a.pdf".to_string(), "b.pdf".to_string()]);
    export_shortlist(&path, &rows).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = written.lines().collect();
    assert_eq!(lines, vec!["fichier,pertinence_%", "b.pdf,80.0", "a.pdf,42.0"]);
}

#[test]
fn test_missing_job_titles_file_gives_empty_list() {
    let titles = load_job_titles(Path::new("does/not/exist.csv"), "job_title");
    assert!(titles.is_empty());
}

#[test]
fn test_job_titles_from_fixture() {
    let titles = load_job_titles(Path::new("tests/fixtures/job_titles.csv"), "job_title");
    assert_eq!(titles, vec!["Data Engineer", "Data Scientist", "Développeur Rust"]);
}

#[tokio::test]
async fn test_offer_from_markdown_fixture() {
    let manager = InputManager::new();
    let text = manager
        .read_offer(Path::new("tests/fixtures/offer_data_engineer.md"))
        .await
        .unwrap();

    assert!(text.contains("Data Engineer"));
    assert!(text.contains("Python"));
    // Markdown markup is gone
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_unsupported_offer_type() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("offer.docx");
    fs::write(&path, b"whatever").unwrap();

    let result = InputManager::new().read_offer(&path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_load_resumes_from_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b_resume.txt"), b"Rust developer").unwrap();
    fs::write(dir.path().join("a_resume.pdf"), text_pdf("Python developer")).unwrap();
    fs::write(dir.path().join("notes.docx"), b"ignored").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();

    let batch = InputManager::new()
        .load_resumes(&[dir.path().to_path_buf()])
        .await
        .unwrap();

    let names: Vec<_> = batch.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, vec!["a_resume.pdf", "b_resume.txt"]);
}

#[tokio::test]
async fn test_missing_resume_path_is_an_error() {
    let result = InputManager::new()
        .load_resumes(&[Path::new("tests/fixtures/nope").to_path_buf()])
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_copy_readable_documents() {
    let dir = TempDir::new().unwrap();
    let batch: CandidateBatch = vec![
        CandidateDocument::new("good.txt", b"Python SQL".to_vec()),
        CandidateDocument::new("scan.pdf", empty_pdf()),
    ]
    .into_iter()
    .collect();

    let embedder = HashingEmbedder::new(64);
    let extractor = DocumentTextExtractor::new();
    let pipeline = RankingPipeline::new(&extractor, SimilarityScorer::new(&embedder));
    let query = JobQuery::new("Data Engineer", vec!["python".to_string()], CONNECTOR);
    let results = pipeline.rank(&query, &batch).unwrap();

    let target = dir.path().join("readable");
    let written = copy_documents(&batch, &results.readable_top(10), &target).await.unwrap();

    assert_eq!(written, vec![target.join("good.txt")]);
    assert_eq!(fs::read(target.join("good.txt")).unwrap(), b"Python SQL");
    assert!(!target.join("scan.pdf").exists());
}
