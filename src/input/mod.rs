//! Input processing module
//! Handles file detection, text extraction, and input management

pub mod file_detector;
pub mod job_titles;
pub mod manager;
pub mod text_extractor;
