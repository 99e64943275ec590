// Shared prompt fragments. Each service that calls the LLM keeps its own
// prompts.rs alongside it; only cross-cutting pieces live here.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every prompt that reads candidate data.
pub const HONESTY_INSTRUCTION: &str = "\
    Only use facts present in the provided text. Do NOT infer, interpolate, or invent \
    skills, employers, dates, or credentials. If something is not stated, treat it as absent.";
