// Interview flow: question generation, answer evaluation, final scoring.
// All generator calls go through llm_client::TextGenerator.

pub mod handlers;
pub mod prompts;
pub mod question_parser;
pub mod scoring;
pub mod session;
pub mod store;
