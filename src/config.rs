//! Configuration management for the CV ranker

use crate::error::{CvRankerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub skills: SkillConfig,
    pub ranking: RankingConfig,
    pub job_titles: JobTitleConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Directory holding bundled models
    pub models_dir: PathBuf,
    /// Folder name of the bundled model inside `models_dir`
    pub local_model: String,
    /// Hub identifier used when the bundled model is missing
    pub public_model_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillConfig {
    pub top_k: usize,
    pub ngram_min: usize,
    pub ngram_max: usize,
    pub diversity: f32,
    pub candidate_pool: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    pub top_k: usize,
    pub default_shortlist: usize,
    /// Text placed between the job title and the skill list in the query
    pub query_connector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTitleConfig {
    pub path: PathBuf,
    pub column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Csv,
}

pub const MAX_TOP_K: usize = 100;

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cv-ranker")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                local_model: "potion-base-8M".to_string(),
                public_model_id: "minishlab/potion-base-8M".to_string(),
            },
            skills: SkillConfig {
                top_k: 20,
                ngram_min: 1,
                ngram_max: 3,
                diversity: 0.7,
                candidate_pool: 80,
            },
            ranking: RankingConfig {
                top_k: 10,
                default_shortlist: 3,
                query_connector: " avec compétences en ".to_string(),
            },
            job_titles: JobTitleConfig {
                path: PathBuf::from("job_titles.csv"),
                column: "job_title".to_string(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from an explicit file, or from the user config dir (created with defaults)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let config_path = Self::config_path();
                if config_path.exists() {
                    Self::load_from(&config_path)
                } else {
                    let config = Self::default();
                    config.save()?;
                    Ok(config)
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| CvRankerError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CvRankerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("cv-ranker")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        check_top_k("ranking.top_k", self.ranking.top_k)?;
        check_top_k("skills.top_k", self.skills.top_k)?;

        if !(0.0..=1.0).contains(&self.skills.diversity) {
            return Err(CvRankerError::Configuration(format!(
                "skills.diversity must be within [0, 1], got {}",
                self.skills.diversity
            )));
        }
        if self.skills.ngram_min == 0 || self.skills.ngram_min > self.skills.ngram_max {
            return Err(CvRankerError::Configuration(format!(
                "invalid n-gram range {}..={}",
                self.skills.ngram_min, self.skills.ngram_max
            )));
        }
        if self.skills.candidate_pool == 0 {
            return Err(CvRankerError::Configuration(
                "skills.candidate_pool must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn local_model_path(&self) -> PathBuf {
        self.models.models_dir.join(&self.models.local_model)
    }
}

/// Top-K values accepted from configuration and the command line
pub fn check_top_k(name: &str, value: usize) -> Result<()> {
    if value == 0 || value > MAX_TOP_K {
        return Err(CvRankerError::Configuration(format!(
            "{} must be within 1..={}, got {}",
            name, MAX_TOP_K, value
        )));
    }
    Ok(())
}
