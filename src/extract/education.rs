//! Formação acadêmica: gatilho ("studied", "graduated", ...) seguido de
//! "at/from <Instituição>" e, opcionalmente, "in <ano>".

use std::collections::HashSet;

use once_cell::sync::Lazy;

use super::ExtractionRule;
use crate::types::{Education, NOT_SPECIFIED};
use crate::utils::{normalize_key, trim_fragment};

/// Gatilho de formação seguido de "at/from <Instituição>" e ano opcional
pub static EDUCATION_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![ExtractionRule::new(
        "education-institution",
        "education",
        r"(?i:\b(?:studied|graduated|graduate|degree|attended|alumnus|alumna|alumni|educated)\b)[^.\n]*?[^\S\n](?:at|from)[^\S\n]+(?P<institution>(?:St\.|\p{Lu}[\w'&-]*)(?:[^\S\n]+(?:(?:of|and|the|for|de|&)[^\S\n]+)?(?:St\.|\p{Lu}[\w'&-]*))*)(?:[^\S\n]+in[^\S\n]+(?P<year>\d{4}))?",
    )]
});

/// Grau acadêmico citado na frase, se houver
fn detect_degree(clause: &str) -> Option<&'static str> {
    let lower = clause.to_lowercase();
    if lower.contains("phd") || lower.contains("ph.d") || lower.contains("doctorate") {
        Some("PhD")
    } else if lower.contains("mba") {
        Some("MBA")
    } else if lower.contains("master") {
        Some("Master's")
    } else if lower.contains("bachelor") {
        Some("Bachelor's")
    } else {
        None
    }
}

/// Extrai formações do texto concatenado
///
/// `degree` e `field` ficam como "Not specified" quando o texto não diz.
pub fn extract_education(text: &str) -> Vec<Education> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for rule in EDUCATION_RULES.iter() {
        for caps in rule.regex().captures_iter(text) {
            let institution = caps
                .name("institution")
                .map(|m| trim_fragment(m.as_str()))
                .unwrap_or("");
            if institution.is_empty() || !seen.insert(normalize_key(institution)) {
                continue;
            }

            let clause = caps.get(0).map(|m| m.as_str()).unwrap_or("");
            entries.push(Education {
                institution: institution.to_string(),
                degree: detect_degree(clause).unwrap_or(NOT_SPECIFIED).to_string(),
                field: NOT_SPECIFIED.to_string(),
                year: caps.name("year").map(|m| m.as_str().to_string()),
            });
        }
    }

    entries
}
