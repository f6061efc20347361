//! Embedding model resolution and download
//!
//! The model is looked up in an ordered list of sources: the bundled local
//! folder first, then the public hub identifier. Only when every source fails
//! is loading reported as an error.

use crate::config::Config;
use crate::error::{CvRankerError, Result};
use crate::processing::embeddings::StaticEmbedder;
use hf_hub::api::tokio::Api;
use log::{info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files model2vec needs to load a model folder
pub const REQUIRED_MODEL_FILES: [&str; 3] = ["tokenizer.json", "model.safetensors", "config.json"];

#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    Local(PathBuf),
    Hub(String),
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::Local(path) => write!(f, "local folder {}", path.display()),
            ModelSource::Hub(id) => write!(f, "hub model {}", id),
        }
    }
}

impl ModelSource {
    fn load(&self) -> Result<StaticEmbedder> {
        match self {
            ModelSource::Local(path) => {
                if !is_valid_model_dir(path) {
                    return Err(CvRankerError::ModelLoading(format!(
                        "no model files in {}",
                        path.display()
                    )));
                }
                StaticEmbedder::from_pretrained(&path.to_string_lossy())
            }
            ModelSource::Hub(id) => StaticEmbedder::from_pretrained(id),
        }
    }
}

pub struct ModelLoader {
    sources: Vec<ModelSource>,
}

impl ModelLoader {
    pub fn new(sources: Vec<ModelSource>) -> Self {
        Self { sources }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(vec![
            ModelSource::Local(config.local_model_path()),
            ModelSource::Hub(config.models.public_model_id.clone()),
        ])
    }

    pub fn sources(&self) -> &[ModelSource] {
        &self.sources
    }

    /// Load from the first source that works
    pub fn load(&self) -> Result<StaticEmbedder> {
        self.load_with(ModelSource::load)
    }

    /// Try `load_source` on each source in order and return the first model it
    /// produces. Later sources are not tried once one succeeds.
    pub fn load_with<M, F>(&self, mut load_source: F) -> Result<M>
    where
        F: FnMut(&ModelSource) -> Result<M>,
    {
        let mut failures = Vec::new();

        for source in &self.sources {
            match load_source(source) {
                Ok(model) => {
                    info!("Embedding model loaded from {}", source);
                    return Ok(model);
                }
                Err(e) => {
                    warn!("Could not load model from {}: {}", source, e);
                    failures.push(format!("{}: {}", source, e));
                }
            }
        }

        Err(CvRankerError::ModelLoading(if failures.is_empty() {
            "no model source configured".to_string()
        } else {
            failures.join("; ")
        }))
    }
}

pub fn is_valid_model_dir(path: &Path) -> bool {
    path.is_dir() && REQUIRED_MODEL_FILES.iter().all(|file| path.join(file).is_file())
}

/// Downloads the public model into the bundled local folder
pub struct ModelFetcher {
    api: Api,
}

impl ModelFetcher {
    pub fn new() -> Result<Self> {
        let api = Api::new()
            .map_err(|e| CvRankerError::ModelLoading(format!("Failed to initialize HF API: {}", e)))?;
        Ok(Self { api })
    }

    pub async fn fetch(&self, repo_id: &str, target_dir: &Path, force: bool) -> Result<PathBuf> {
        if !force && is_valid_model_dir(target_dir) {
            info!("Model already present in {}", target_dir.display());
            return Ok(target_dir.to_path_buf());
        }

        fs::create_dir_all(target_dir).await?;
        let repo = self.api.repo(hf_hub::Repo::model(repo_id.to_string()));

        for file in REQUIRED_MODEL_FILES {
            let cached = repo.get(file).await.map_err(|e| {
                CvRankerError::ModelLoading(format!("Failed to download required file {}: {}", file, e))
            })?;
            fs::copy(&cached, target_dir.join(file)).await?;
            info!("Downloaded {} from {}", file, repo_id);
        }

        Ok(target_dir.to_path_buf())
    }
}
