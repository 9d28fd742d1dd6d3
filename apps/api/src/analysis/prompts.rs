// All LLM prompt constants for the interview collaborators.
// Placeholders in `{braces}` are replaced before sending.

/// System prompt for skill extraction from a job description.
pub const SKILL_EXTRACT_SYSTEM: &str = "You are an expert job analyst and recruiter \
    for hands-on, trade and blue collar roles. \
    Extract every skill explicitly mentioned in the job description and add the \
    well-known skills commonly required for this type of role. \
    Include technical, equipment, safety/certification, physical, license and soft skills. \
    Use specific skill names (\"Power Tool Operation\", not \"tools\").";

/// Replace `{jd_text}` and `{max_skills}`.
pub const SKILL_EXTRACT_PROMPT_TEMPLATE: &str = r#"Job Description:
{jd_text}

Extract the {max_skills} most important skills for this role, most important first.

Return a JSON array with this EXACT schema:
[
  {"skill": "Carpentry", "category": "Trade Skill"},
  {"skill": "Forklift Operation", "category": "Equipment Operation"},
  {"skill": "OSHA 10", "category": "Safety & Certification"}
]

CATEGORIES (pick one per skill):
- Trade Skill
- Equipment Operation
- Safety & Certification
- Technical Skill
- Physical Ability
- Soft Skill
- License/Credential
- Language"#;

/// System prompt for interview question generation.
pub const QUESTION_GEN_SYSTEM: &str = "You are an experienced interviewer for hands-on roles. \
    Write one natural, conversational question per skill that invites the candidate \
    to describe real examples from past work. Keep questions short and plain.";

/// Replace `{skills}` and `{count}`.
pub const QUESTION_GEN_PROMPT_TEMPLATE: &str = r#"Create exactly {count} interview questions, one for each of these skills, in the same order:

{skills}

QUESTION STYLE:
- Trade skills: "Tell me about your experience with [skill]."
- Equipment: "Have you operated [skill] before? For how long?"
- Certifications: "Do you have [skill]? When did you get it?"
- Physical abilities: "Are you comfortable with [skill]?"
- Soft skills: "How would you describe your [skill]?"
- Licenses: "Do you currently have a valid [skill]?"

Return a JSON array of strings:
["question 1", "question 2"]"#;

/// System prompt for speech-to-text cleanup.
pub const CLEANUP_SYSTEM: &str = "You are a transcription correction assistant. \
    Fix speech recognition errors while preserving the original meaning: \
    misheard words and homophones, missing punctuation, run-on sentences, \
    capitalization, and misheard technical terms. \
    Return ONLY the corrected text without any explanation or commentary.";

/// Replace `{text}`.
pub const CLEANUP_PROMPT_TEMPLATE: &str = r#"Fix any transcription errors in this text:

"{text}"

Corrected text:"#;

/// System prompt for skill detection in a candidate's answer.
pub const SKILL_DETECT_SYSTEM: &str = "You analyze interview answers for hands-on roles. \
    Identify which skills from the provided list the candidate has demonstrated or claimed. \
    Count explicit claims (\"I have\", \"I can\", \"I'm certified in\"), experience \
    (\"I operated\", \"I installed\", \"5 years of\") and licenses. \
    Match by meaning, not exact wording: \"I can drive a forklift\" means \"Forklift Operation\". \
    Answer with exact skill names copied from the list.";

/// Replace `{skills}` and `{text}`.
pub const SKILL_DETECT_PROMPT_TEMPLATE: &str = r#"AVAILABLE SKILLS TO DETECT:
{skills}

CANDIDATE'S STATEMENT:
"{text}"

Which skills from the list does the candidate have?
Return a JSON array of exact skill names from the list. If none, return []."#;
