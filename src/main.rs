//! cv-ranker: rank resumes against a job profile with sentence embeddings

use clap::Parser;
use cv_ranker::cli::{self, Cli, Commands, ConfigAction, ModelAction, OfferSource};
use cv_ranker::config::{check_top_k, Config};
use cv_ranker::error::{CvRankerError, Result};
use cv_ranker::input::job_titles::{check_job_title, load_job_titles};
use cv_ranker::input::manager::InputManager;
use cv_ranker::input::text_extractor::DocumentTextExtractor;
use cv_ranker::output::export::{copy_documents, export_shortlist, shortlist_file_name};
use cv_ranker::output::formatter::ReportGenerator;
use cv_ranker::output::report::RankingReport;
use cv_ranker::processing::document::JobQuery;
use cv_ranker::processing::embedding_manager::{is_valid_model_dir, ModelFetcher, ModelLoader};
use cv_ranker::processing::embeddings::{Embedder, SimilarityScorer, StaticEmbedder};
use cv_ranker::processing::keywords::SkillExtractor;
use cv_ranker::processing::ranking::RankingPipeline;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.verbose).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, verbose: bool) -> Result<()> {
    match command {
        Commands::Rank {
            title,
            offer,
            resumes,
            top_k,
            skills_top_k,
            shortlist,
            export,
            copy_readable,
            output,
        } => {
            let title = title.trim().to_string();
            let titles = load_job_titles(&config.job_titles.path, &config.job_titles.column);
            check_job_title(&title, &titles)?;

            let top_k = top_k.unwrap_or(config.ranking.top_k);
            check_top_k("--top-k", top_k)?;
            let skills_top_k = skills_top_k.unwrap_or(config.skills.top_k);
            check_top_k("--skills-top-k", skills_top_k)?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(CvRankerError::InvalidInput)?,
                None => config.output.format,
            };

            let input_manager = InputManager::new();
            let batch = input_manager.load_resumes(&resumes).await?;
            if batch.is_empty() {
                return Err(CvRankerError::InvalidInput("No PDF or TXT resume found".to_string()));
            }

            println!("🧠 Loading embedding model...");
            let model = load_model(&config)?;

            let offer_text = read_offer(&input_manager, &offer).await?;
            if verbose && !offer_text.is_empty() {
                println!("\n📝 Offer preview:\n{}\n", truncate_text(&offer_text, 300));
            }

            let extractor = SkillExtractor::new(&model, config.skills.clone());
            let skills = extractor.extract_skills(&offer_text, skills_top_k)?;
            print_skills(&skills, !offer_text.trim().is_empty());

            let query = JobQuery::new(&title, skills, &config.ranking.query_connector);
            info!("Query: {}", query.text());

            let text_extractor = DocumentTextExtractor::new();
            let pipeline = RankingPipeline::new(&text_extractor, SimilarityScorer::new(&model));

            let progress = ProgressBar::new(batch.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            let results = pipeline.rank_with_progress(&query, &batch, |result| {
                progress.set_message(result.filename.clone());
                progress.inc(1);
            })?;
            progress.finish_and_clear();

            let report = RankingReport::new(&query, &results, top_k, model.model_name());
            let generator = ReportGenerator::new(config.output.color_output);
            println!("{}", generator.generate(&report, output_format)?);

            // Shortlist
            let selected = if shortlist.is_empty() {
                results.default_shortlist(config.ranking.default_shortlist)
            } else {
                for name in shortlist.iter().filter(|name| results.get(name).is_none()) {
                    warn!("'{}' is not among the ranked files", name);
                }
                shortlist
            };
            let rows = results.shortlist(&selected);
            if rows.is_empty() {
                println!("⚠️  Empty shortlist, nothing exported");
            } else {
                let path = export.unwrap_or_else(|| PathBuf::from(shortlist_file_name(&title)));
                export_shortlist(&path, &rows)?;
                println!("✅ Shortlist ({} file(s)) saved to {}", rows.len(), path.display());
            }

            // Readable resumes
            if let Some(dir) = copy_readable {
                let readable = results.readable_top(top_k);
                if readable.is_empty() {
                    println!("⚠️  No readable resume found");
                } else {
                    let written = copy_documents(&batch, &readable, &dir).await?;
                    println!("📂 {} readable resume(s) copied to {}", written.len(), dir.display());
                }
            }
        }

        Commands::Skills { offer, top_k } => {
            let top_k = top_k.unwrap_or(config.skills.top_k);
            check_top_k("--top-k", top_k)?;

            let input_manager = InputManager::new();
            let offer_text = read_offer(&input_manager, &offer).await?;
            if offer_text.trim().is_empty() {
                return Err(CvRankerError::InvalidInput("Provide --offer or --offer-text".to_string()));
            }

            let model = load_model(&config)?;
            let extractor = SkillExtractor::new(&model, config.skills.clone());
            let skills = extractor.extract_skills(&offer_text, top_k)?;
            print_skills(&skills, true);
        }

        Commands::Titles => {
            let titles = load_job_titles(&config.job_titles.path, &config.job_titles.column);
            if titles.is_empty() {
                println!("⚠️  No job titles found in {}", config.job_titles.path.display());
            } else {
                println!("🧭 Job titles ({}):", titles.len());
                for title in titles {
                    println!("  • {}", title);
                }
            }
        }

        Commands::Models { action } => match action {
            ModelAction::Fetch { force } => {
                let target = config.local_model_path();
                println!("⬇️  Downloading {} to {}", config.models.public_model_id, target.display());
                let fetcher = ModelFetcher::new()?;
                let path = fetcher.fetch(&config.models.public_model_id, &target, force).await?;
                println!("✅ Model ready in {}", path.display());
            }

            ModelAction::Info => {
                let local = config.local_model_path();
                let status = if is_valid_model_dir(&local) { "✅ present" } else { "❌ missing" };
                println!("📋 Embedding model sources (tried in order)\n");
                println!("1. Local folder: {} [{}]", local.display(), status);
                println!("2. Hub model:    {}", config.models.public_model_id);
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Config file: {}", Config::config_path().display());
                println!("Local model: {}", config.local_model_path().display());
                println!("Public model: {}", config.models.public_model_id);
                println!("Job titles: {} (column '{}')", config.job_titles.path.display(), config.job_titles.column);
                println!("\nSkills:");
                println!("  Top K: {}", config.skills.top_k);
                println!("  N-grams: {}..={}", config.skills.ngram_min, config.skills.ngram_max);
                println!("  Diversity: {:.2}", config.skills.diversity);
                println!("  Candidate pool: {}", config.skills.candidate_pool);
                println!("\nRanking:");
                println!("  Top K: {}", config.ranking.top_k);
                println!("  Default shortlist: {}", config.ranking.default_shortlist);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save()?;
                println!("✅ Configuration reset successfully!");
            }
        },
    }

    Ok(())
}

fn load_model(config: &Config) -> Result<StaticEmbedder> {
    ModelLoader::from_config(config).load()
}

async fn read_offer(input_manager: &InputManager, source: &OfferSource) -> Result<String> {
    match (&source.offer, &source.offer_text) {
        (Some(path), _) => {
            cli::validate_file_extension(path, &["pdf", "txt", "md", "markdown"])
                .map_err(|e| CvRankerError::InvalidInput(format!("Offer file: {}", e)))?;
            input_manager.read_offer(path).await
        }
        (None, Some(text)) => Ok(text.clone()),
        (None, None) => Ok(String::new()),
    }
}

fn print_skills(skills: &[String], had_offer: bool) {
    if skills.is_empty() {
        if had_offer {
            println!("⚠️  No skill detected in this offer");
        }
        return;
    }
    println!("✅ Detected skills:");
    for skill in skills {
        println!("  - {}", skill);
    }
}

/// Truncate text to a maximum length with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((end, _)) => {
            let truncated = &text[..end];
            // Find the last word boundary to avoid cutting words
            let cut = truncated.rfind(' ').unwrap_or(end);
            format!("{}...", &text[..cut])
        }
    }
}
