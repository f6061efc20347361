//! CLI interface for the CV ranker

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cv-ranker")]
#[command(about = "Rank resumes against a job profile with sentence embeddings")]
#[command(
    long_about = "Detect the key skills of a job offer, score every resume against the job title and skills, and export a shortlist"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Where the job offer comes from
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct OfferSource {
    /// Job offer file (PDF, TXT, MD)
    #[arg(long)]
    pub offer: Option<PathBuf>,

    /// Job offer text pasted on the command line
    #[arg(long)]
    pub offer_text: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank resumes against a job title and offer
    Rank {
        /// Target job title
        #[arg(short, long)]
        title: String,

        #[command(flatten)]
        offer: OfferSource,

        /// Resume files (PDF, TXT) or directories containing them
        #[arg(required = true)]
        resumes: Vec<PathBuf>,

        /// Number of resumes to show (1-100)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Number of skills to detect in the offer
        #[arg(long)]
        skills_top_k: Option<usize>,

        /// Files to shortlist (defaults to the best three)
        #[arg(long, num_args = 1..)]
        shortlist: Vec<String>,

        /// Shortlist CSV path (defaults to shortlist_<title>.csv)
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Copy readable top resumes into this directory
        #[arg(long)]
        copy_readable: Option<PathBuf>,

        /// Output format: console, json, markdown, csv
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show the skills detected in a job offer
    Skills {
        #[command(flatten)]
        offer: OfferSource,

        /// Number of skills to detect
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// List the configured job titles
    Titles,

    /// Embedding model management
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// Download the public model into the local model folder
    Fetch {
        /// Download again even if the model is present
        #[arg(short, long)]
        force: bool,
    },

    /// Show where the model is loaded from
    Info,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        "csv" => Ok(crate::config::OutputFormat::Csv),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, csv",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &std::path::Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
