//! Conquistas: resultados cujo snippet cita prêmios ou reconhecimentos.

use once_cell::sync::Lazy;

use super::ExtractionRule;
use crate::types::{Achievement, ProviderResult};
use crate::utils::{clean_text, non_empty, normalize_key};

/// Palavras que marcam um resultado como conquista
const ACHIEVEMENT_KEYWORDS: &[&str] = &["award", "achievement", "recognition", "honor", "honour", "prize"];

/// Data por extenso: "March 3, 2021", "Dec 1 2019"
pub static DATE_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![ExtractionRule::new(
        "achievement-date",
        "achievements.date",
        r"(?i)\b((?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+\d{1,2},?\s+\d{4})\b",
    )]
});

/// Primeira data por extenso no texto
pub fn extract_date(text: &str) -> Option<String> {
    DATE_RULES.iter().find_map(|rule| rule.first_capture(text)).map(String::from)
}

fn mentions_achievement(text: &str) -> bool {
    let lower = text.to_lowercase();
    ACHIEVEMENT_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Um `Achievement` por resultado cujo snippet cita prêmio/reconhecimento
///
/// Só o snippet é consultado; o título é ignorado.
/// Data: primeira data por extenso no snippet; senão, a data do resultado.
pub fn extract_achievements(results: &[ProviderResult]) -> Vec<Achievement> {
    let mut seen = std::collections::HashSet::new();

    results
        .iter()
        .filter(|r| mentions_achievement(&r.snippet))
        .filter_map(|r| {
            let title = clean_text(&r.title);
            if title.is_empty() || !seen.insert(normalize_key(&title)) {
                return None;
            }
            Some(Achievement {
                title,
                description: non_empty(&clean_text(&r.snippet)),
                date: extract_date(&r.snippet).or_else(|| r.date.clone()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_date() {
        assert_eq!(
            extract_date("Received on March 3, 2021 in London"),
            Some("March 3, 2021".to_string())
        );
        assert_eq!(extract_date("Dec. 1 2019"), Some("Dec. 1 2019".to_string()));
        assert_eq!(extract_date("in 2019"), None);
    }

    #[test]
    fn test_achievement_with_snippet_date() {
        let results = vec![ProviderResult::new(
            "Ada wins Royal Society prize",
            "Awarded on June 10, 1840 for her notes.",
            "https://news.example.com/ada",
        )];
        let achievements = extract_achievements(&results);
        assert_eq!(achievements.len(), 1);
        assert_eq!(achievements[0].title, "Ada wins Royal Society prize");
        assert_eq!(achievements[0].date.as_deref(), Some("June 10, 1840"));
    }

    #[test]
    fn test_achievement_falls_back_to_result_date() {
        let results = vec![ProviderResult::new(
            "Recognition for pioneering work",
            "The board honored her contributions.",
            "https://example.com/a",
        )
        .with_date("2 days ago")];
        let achievements = extract_achievements(&results);
        assert_eq!(achievements[0].date.as_deref(), Some("2 days ago"));
    }

    #[test]
    fn test_unrelated_results_skipped() {
        let results = vec![ProviderResult::new("Ada Lovelace", "A mathematician.", "https://example.com")];
        assert!(extract_achievements(&results).is_empty());
    }

    #[test]
    fn test_keyword_only_in_title_is_ignored() {
        let results = vec![ProviderResult::new(
            "Award-winning restaurant review",
            "Dinner was fine.",
            "https://food.example.com/review",
        )];
        assert!(extract_achievements(&results).is_empty());
    }
}
