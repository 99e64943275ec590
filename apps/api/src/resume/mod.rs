// Resume ingestion: PDF → plain text → LLM-structured profile → latest resume row.
// The newest row is what the workflow scores against.

pub mod extract;
pub mod handlers;
pub mod parser;
pub mod prompts;
