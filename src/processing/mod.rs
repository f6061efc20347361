//! Text processing, embeddings, skill extraction and ranking

pub mod document;
pub mod embedding_manager;
pub mod embeddings;
pub mod keywords;
pub mod ranking;
pub mod text_processor;
