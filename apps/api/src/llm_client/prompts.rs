// Shared prompt fragments. Each collaborator in `analysis` defines its own
// prompts in `analysis::prompts` and appends these where needed.

/// Appended to system prompts whose reply must be a bare JSON array.
pub const JSON_ARRAY_ONLY: &str = "\
    Return ONLY a valid JSON array. \
    Do NOT use markdown code fences. \
    Do NOT add text before or after the array.";

/// Appended to prompts that must not invent anything beyond the input.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Only use information present in the input. \
    Do NOT infer experience the candidate did not state.";
