//! Offer Builder: a guided offer questionnaire with value-equation scoring
//! and an optional LLM advisor.

pub mod advisor;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod scoring;
pub mod wizard;
