//! Skill extraction: turns a raw job description into the interview's skill list.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::analysis::prompts::{SKILL_EXTRACT_PROMPT_TEMPLATE, SKILL_EXTRACT_SYSTEM};
use crate::interview::collaborators::{CollaboratorError, SkillExtractor};
use crate::interview::models::{Skill, DEFAULT_SKILL_CATEGORY};
use crate::llm_client::prompts::JSON_ARRAY_ONLY;
use crate::llm_client::{parse_json_reply, LlmClient};

/// One item of the model's reply. `category` is optional in practice.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedSkill {
    pub skill: String,
    #[serde(default)]
    pub category: Option<String>,
}

pub struct LlmSkillExtractor {
    llm: LlmClient,
    max_skills: usize,
}

impl LlmSkillExtractor {
    pub fn new(llm: LlmClient, max_skills: usize) -> Self {
        Self { llm, max_skills }
    }
}

#[async_trait]
impl SkillExtractor for LlmSkillExtractor {
    async fn extract(&self, job_description: &str) -> Result<Vec<Skill>, CollaboratorError> {
        let prompt = SKILL_EXTRACT_PROMPT_TEMPLATE
            .replace("{jd_text}", job_description)
            .replace("{max_skills}", &self.max_skills.to_string());
        let system = format!("{SKILL_EXTRACT_SYSTEM} {JSON_ARRAY_ONLY}");

        let reply = self.llm.call_text(&prompt, &system).await?;
        let skills = skills_from_reply(&reply, self.max_skills);

        if skills.is_empty() {
            return Err(CollaboratorError::Rejected(
                "no skills found in job description".to_string(),
            ));
        }
        info!("Extracted {} skills from job description", skills.len());
        Ok(skills)
    }
}

/// Skills used when the model reply yields nothing usable.
const DEFAULT_SKILLS: &[(&str, &str)] = &[
    ("Hand Tool Operation", "Equipment Operation"),
    ("Power Tool Operation", "Equipment Operation"),
    ("Basic Carpentry", "Trade Skill"),
    ("Concrete Work", "Trade Skill"),
    ("Blueprint Reading", "Technical Skill"),
    ("Heavy Lifting (50+ lbs)", "Physical Ability"),
    ("OSHA Safety Training", "Safety & Certification"),
    ("Driver's License", "License/Credential"),
    ("Teamwork", "Soft Skill"),
    ("Communication", "Soft Skill"),
    ("Reliability", "Soft Skill"),
    ("Attention to Detail", "Soft Skill"),
];

const LIST_MARKERS: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', '-', '*', '•', '>', '+'];
const WRAPPING: &[char] = &[' ', '-', '"', '\'', '(', ')', '[', ']', '{', '}'];
const PROSE_WORDS: &[&str] = &["the", "this", "that", "are", "is", "was", "were"];

/// JSON reply first, then a line-by-line read of the same reply, then the
/// default skill set. Each stage goes through `normalize_extracted`.
pub fn skills_from_reply(reply: &str, max_skills: usize) -> Vec<Skill> {
    match parse_json_reply::<Vec<ExtractedSkill>>(reply) {
        Ok(extracted) => {
            let skills = normalize_extracted(extracted, max_skills);
            if !skills.is_empty() {
                return skills;
            }
            warn!("Skill reply held no usable skills, reading it line by line");
        }
        Err(e) => warn!("Skill reply was not valid JSON ({e}), reading it line by line"),
    }

    let skills = normalize_extracted(parse_skill_lines(reply), max_skills);
    if !skills.is_empty() {
        return skills;
    }

    warn!("No skills found in the reply, using the default skill set");
    normalize_extracted(default_skills(), max_skills)
}

/// Reads `skill: category`, `skill - category`, and bare list items.
/// JSON punctuation lines and prose sentences are skipped.
pub fn parse_skill_lines(text: &str) -> Vec<ExtractedSkill> {
    text.lines().filter_map(parse_skill_line).collect()
}

fn parse_skill_line(line: &str) -> Option<ExtractedSkill> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(['[', '{', '}', ']']) {
        return None;
    }

    if line.contains(':') || line.contains('-') {
        let cleaned = line.trim_start_matches(LIST_MARKERS).trim_start();
        let (skill, category) = cleaned
            .split_once(':')
            .or_else(|| cleaned.split_once(" - "))
            .unwrap_or((cleaned, DEFAULT_SKILL_CATEGORY));
        let skill = skill.trim_matches(WRAPPING);
        let category = category.trim_matches(WRAPPING);
        if !is_plausible_name(skill) || skill.to_lowercase().starts_with("note") {
            return None;
        }
        return Some(ExtractedSkill {
            skill: skill.to_string(),
            category: Some(category.to_string()),
        });
    }

    let lower = line.to_lowercase();
    let is_prose = lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| PROSE_WORDS.contains(&word));
    if line.chars().count() >= 50 || is_prose {
        return None;
    }
    let skill = line.trim_start_matches(LIST_MARKERS).trim_matches(WRAPPING);
    is_plausible_name(skill).then(|| ExtractedSkill {
        skill: skill.to_string(),
        category: None,
    })
}

fn is_plausible_name(name: &str) -> bool {
    (2..=50).contains(&name.chars().count())
}

pub fn default_skills() -> Vec<ExtractedSkill> {
    DEFAULT_SKILLS
        .iter()
        .map(|(skill, category)| ExtractedSkill {
            skill: skill.to_string(),
            category: Some(category.to_string()),
        })
        .collect()
}

/// Trims names, drops blanks, defaults categories, removes case-insensitive
/// duplicates (first wins), and caps the list.
pub fn normalize_extracted(extracted: Vec<ExtractedSkill>, max_skills: usize) -> Vec<Skill> {
    let mut seen = HashSet::new();
    extracted
        .into_iter()
        .filter_map(|item| {
            let name = item.skill.trim();
            if name.is_empty() || !seen.insert(name.to_lowercase()) {
                return None;
            }
            let category = item
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_SKILL_CATEGORY);
            Some(Skill::new(name, category))
        })
        .take(max_skills)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(skill: &str, category: Option<&str>) -> ExtractedSkill {
        ExtractedSkill {
            skill: skill.to_string(),
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn test_reply_without_category_deserializes() {
        let json = r#"[{"skill": "Carpentry", "category": "Trade Skill"}, {"skill": "CPR"}]"#;
        let parsed: Vec<ExtractedSkill> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].category, None);
    }

    #[test]
    fn test_missing_category_defaults_to_general() {
        let skills = normalize_extracted(vec![item("CPR", None), item("Framing", Some(" "))], 8);
        assert_eq!(skills[0].category, "General");
        assert_eq!(skills[1].category, "General");
    }

    #[test]
    fn test_duplicates_and_blanks_are_dropped() {
        let skills = normalize_extracted(
            vec![
                item("Welding", Some("Trade Skill")),
                item("  ", Some("Trade Skill")),
                item("welding ", Some("Technical Skill")),
                item("OSHA 30", Some("Safety & Certification")),
            ],
            8,
        );
        let names: Vec<_> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Welding", "OSHA 30"]);
        assert_eq!(skills[0].category, "Trade Skill");
    }

    #[test]
    fn test_json_reply_is_used_when_valid() {
        let reply = r#"```json
[{"skill": "Drywall Installation", "category": "Trade Skill"}]
```"#;
        let skills = skills_from_reply(reply, 8);
        assert_eq!(skills, vec![Skill::new("Drywall Installation", "Trade Skill")]);
    }

    #[test]
    fn test_line_parser_reads_colon_and_dash_pairs() {
        let parsed = parse_skill_lines(
            "1. Forklift Operation: Equipment Operation\n\
             - OSHA 10 - Safety & Certification\n\
             * \"Blueprint Reading\" -\n\
             Note: verify certifications on site",
        );
        let pairs: Vec<_> = parsed
            .iter()
            .map(|p| (p.skill.as_str(), p.category.as_deref()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Forklift Operation", Some("Equipment Operation")),
                ("OSHA 10", Some("Safety & Certification")),
                ("Blueprint Reading", Some("General")),
            ]
        );
    }

    #[test]
    fn test_line_parser_reads_bare_items_and_skips_prose() {
        let parsed = parse_skill_lines("[\nWelding\nThe candidate should weld\nCPR\nx\n]");
        let names: Vec<_> = parsed.iter().map(|p| p.skill.as_str()).collect();
        assert_eq!(names, vec!["Welding", "CPR"]);
        assert!(parsed.iter().all(|p| p.category.is_none()));
    }

    #[test]
    fn test_prose_filter_matches_whole_words() {
        let parsed = parse_skill_lines("Thermal Imaging\nAsbestos Awareness\nThis is required");
        let names: Vec<_> = parsed.iter().map(|p| p.skill.as_str()).collect();
        assert_eq!(names, vec!["Thermal Imaging", "Asbestos Awareness"]);
    }

    #[test]
    fn test_unparseable_reply_falls_back_to_lines() {
        let skills = skills_from_reply("Welding: Trade Skill\nForklift: Equipment Operation", 8);
        assert_eq!(
            skills,
            vec![
                Skill::new("Welding", "Trade Skill"),
                Skill::new("Forklift", "Equipment Operation"),
            ]
        );
    }

    #[test]
    fn test_empty_json_array_falls_back_to_defaults() {
        let skills = skills_from_reply("[]", 12);
        assert_eq!(skills.len(), 12);
        assert_eq!(skills[0], Skill::new("Hand Tool Operation", "Equipment Operation"));
        assert_eq!(skills[11], Skill::new("Attention to Detail", "Soft Skill"));
    }

    #[test]
    fn test_default_skills_are_capped() {
        let skills = skills_from_reply("", 8);
        assert_eq!(skills.len(), 8);
        assert_eq!(default_skills().len(), 12);
    }

    #[test]
    fn test_list_is_capped() {
        let extracted = (0..12).map(|i| item(&format!("Skill {i}"), None)).collect();
        let skills = normalize_extracted(extracted, 8);
        assert_eq!(skills.len(), 8);
        assert_eq!(skills[7].name, "Skill 7");
    }
}
