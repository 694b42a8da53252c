//! Skills: listas após frases-gatilho ("skills:", "expert in", ...) e
//! objetos de verbos de liderança ("led", "managed", "founded", "developed").

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::ExtractionRule;
use crate::utils::{normalize_phrase, trim_fragment, word_count};

/// Tamanho mínimo de um fragmento (caracteres)
const MIN_SKILL_LEN: usize = 3;

/// Fragmentos mais longos que isso são frases, não skills
const MAX_SKILL_WORDS: usize = 5;

/// Listas de skills após gatilhos e objetos de verbos de liderança
pub static SKILL_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![
        ExtractionRule::new(
            "skill-list",
            "skills",
            r"(?i)\b(?:skills|expertise|specialized in|specializes in|specialised in|proficient in|expert in|known for)\b\s*(?::|\s(?:include|includes|including|in|are|such as)\b)?\s*([^.!?\n]+)",
        ),
        ExtractionRule::new(
            "skill-verb-object",
            "skills",
            r"(?i)\b(?:led|managed|founded|developed)\s+([^.!?\n,;]+)",
        ),
    ]
});

/// Separadores de lista; "/" faz parte de nomes como "CI/CD"
static SKILL_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*(?:,|&|;|\band\b)\s*").unwrap());

/// Fragmento aceito como skill
fn is_skill_fragment(fragment: &str) -> bool {
    fragment.chars().count() >= MIN_SKILL_LEN
        && word_count(fragment) <= MAX_SKILL_WORDS
        && !fragment.to_lowercase().contains("more")
}

/// Extrai skills normalizadas (trim, whitespace único, minúsculas)
///
/// A ordem é a da primeira menção; duplicatas são descartadas.
pub fn extract_skills(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut skills = Vec::new();

    for rule in SKILL_RULES.iter() {
        for captured in rule.all_captures(text) {
            for fragment in SKILL_SEPARATOR.split(captured) {
                let fragment = trim_fragment(fragment);
                if !is_skill_fragment(fragment) {
                    continue;
                }
                let skill = normalize_phrase(fragment);
                if seen.insert(skill.clone()) {
                    skills.push(skill);
                }
            }
        }
    }

    skills
}
