// Interview flow: candidate intake, question generation, answer scoring, report.
// All LLM calls go through the llm_client::TextGenerator seam.

pub mod controller;
pub mod evaluator;
pub mod handlers;
pub mod models;
pub mod parsing;
pub mod prompts;
pub mod questions;
pub mod store;
