//! Candidate profiles: document text, heuristic and structured extraction.

pub mod demo;
pub mod document;
pub mod handlers;
pub mod heuristic;
pub mod models;
pub mod parser;
pub mod prompts;
