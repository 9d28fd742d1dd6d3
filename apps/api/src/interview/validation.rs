//! Normalization of the skill and question lists a session is started with.

use std::collections::HashSet;

use crate::interview::error::InterviewError;
use crate::interview::models::{Question, Skill, DEFAULT_SKILL_CATEGORY};

/// Trims names, defaults blank categories, and rejects empty or duplicate
/// (case-insensitive) skill names.
pub fn normalize_skills(skills: Vec<Skill>) -> Result<Vec<Skill>, InterviewError> {
    if skills.is_empty() {
        return Err(InterviewError::Validation(
            "at least one skill is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(skills.len());

    for skill in skills {
        let name = skill.name.trim().to_string();
        if name.is_empty() {
            return Err(InterviewError::Validation(
                "skill names cannot be blank".to_string(),
            ));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(InterviewError::Validation(format!(
                "duplicate skill '{name}'"
            )));
        }
        let category = match skill.category.trim() {
            "" => DEFAULT_SKILL_CATEGORY.to_string(),
            c => c.to_string(),
        };
        normalized.push(Skill { name, category });
    }

    Ok(normalized)
}

/// Trims question texts and assigns indices 0..n in the given order.
pub fn normalize_questions(questions: Vec<String>) -> Result<Vec<Question>, InterviewError> {
    if questions.is_empty() {
        return Err(InterviewError::Validation(
            "at least one question is required".to_string(),
        ));
    }

    questions
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let text = text.trim().to_string();
            if text.is_empty() {
                Err(InterviewError::Validation(format!(
                    "question {index} is blank"
                )))
            } else {
                Ok(Question { index, text })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_skills_rejected() {
        assert!(matches!(
            normalize_skills(vec![]),
            Err(InterviewError::Validation(_))
        ));
    }

    #[test]
    fn test_duplicate_skill_names_rejected_case_insensitively() {
        let result = normalize_skills(vec![
            Skill::new("Forklift Operation", "Equipment Operation"),
            Skill::new("forklift operation ", "Equipment Operation"),
        ]);
        assert!(matches!(result, Err(InterviewError::Validation(msg)) if msg.contains("duplicate")));
    }

    #[test]
    fn test_blank_category_defaults_to_general() {
        let skills = normalize_skills(vec![Skill::new("  Teamwork ", " ")]).unwrap();
        assert_eq!(skills, vec![Skill::new("Teamwork", "General")]);
    }

    #[test]
    fn test_blank_skill_name_rejected() {
        assert!(normalize_skills(vec![Skill::new("   ", "Soft Skill")]).is_err());
    }

    #[test]
    fn test_questions_reindexed_in_order() {
        let questions = normalize_questions(vec![
            " Do you have OSHA 10? ".to_string(),
            "Have you driven a forklift?".to_string(),
        ])
        .unwrap();
        assert_eq!(questions[0].index, 0);
        assert_eq!(questions[0].text, "Do you have OSHA 10?");
        assert_eq!(questions[1].index, 1);
    }

    #[test]
    fn test_blank_question_rejected() {
        assert!(normalize_questions(vec!["ok?".to_string(), "  ".to_string()]).is_err());
        assert!(normalize_questions(vec![]).is_err());
    }
}
