// Match scoring: one posting against the candidate profile.
// All LLM calls go through llm_client; no direct API calls here.

pub mod normalize;
pub mod prompts;
pub mod scorer;
