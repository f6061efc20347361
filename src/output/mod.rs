//! Report formatting and shortlist export

pub mod export;
pub mod formatter;
pub mod report;
