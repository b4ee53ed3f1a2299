// Résumé ingestion: uploaded document → text → structured résumé data.

pub mod extract;
pub mod handlers;
pub mod parser;
pub mod prompts;
