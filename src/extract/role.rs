//! Cargo atual (a partir do título do resultado profissional) e
//! histórico de posições (a partir do texto livre).

use std::collections::HashSet;

use once_cell::sync::Lazy;

use super::ExtractionRule;
use crate::types::{CurrentRole, JobPosition};
use crate::utils::{clean_text, normalize_key, trim_fragment};

/// Valor de `start_date` para o cargo atual
pub const PRESENT: &str = "Present";

/// Padrões de título, avaliados em ordem
pub static ROLE_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![
        // "Ada Lovelace - Lead Analyst at Babbage Engines | LinkedIn"
        ExtractionRule::new(
            "role-at-company",
            "currentRole",
            r"^(?P<name>.+?)\s+[-–]\s+(?P<title>.+?)\s+(?:at|@)\s+(?P<company>.+?)\s*(?:\|.*)?$",
        ),
        // "Ada Lovelace - Lead Analyst - Babbage Engines | LinkedIn"
        ExtractionRule::new(
            "name-role-company",
            "currentRole",
            r"^(?P<name>[^|]+?)\s+[-–]\s+(?P<title>[^|]+?)\s+[-–]\s+(?P<company>[^|]+?)\s*(?:\|.*)?$",
        ),
        // "Lead Analyst - Babbage Engines"
        ExtractionRule::new(
            "role-company",
            "currentRole",
            r"^(?P<title>[^|]+?)\s+[-–]\s+(?P<company>[^|]+?)\s*(?:\|.*)?$",
        ),
    ]
});

/// Gatilhos de posição anterior seguidos de "at/of/for <Empresa>"
pub static JOB_HISTORY_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![ExtractionRule::new(
        "job-history",
        "jobHistory",
        r"(?i:\b(?P<trigger>former|formerly|previously|worked|served|co-founder|founder|ceo|executive)\b)[^.\n]*?[^\S\n](?:at|of|for)[^\S\n]+(?P<company>\p{Lu}[\w'&-]*(?:[^\S\n]+(?:(?:of|and|the|&)[^\S\n]+)?\p{Lu}[\w'&-]*)*)",
    )]
});

/// Rótulos de plataforma que aparecem no fim de títulos e não são empresas
fn is_platform_label(text: &str) -> bool {
    matches!(
        normalize_key(text).as_str(),
        "linkedin" | "twitter" | "x" | "github" | "wikipedia" | "facebook" | "instagram"
    )
}

/// Extrai o cargo atual do título do resultado profissional
///
/// Rejeita capturas em que o "cargo" é o próprio nome do sujeito ou em
/// que a "empresa" é o rótulo da plataforma.
pub fn extract_current_role(title: &str, subject_name: &str) -> Option<CurrentRole> {
    let title = clean_text(title);
    let subject_key = normalize_key(subject_name);

    for rule in ROLE_RULES.iter() {
        let Some(caps) = rule.regex().captures(&title) else {
            continue;
        };

        if rule.tag == "name-role-company" {
            let name = caps.name("name").map(|m| m.as_str()).unwrap_or("");
            if normalize_key(name) != subject_key {
                continue;
            }
        }

        let role_title = caps.name("title").map(|m| trim_fragment(m.as_str())).unwrap_or("");
        let company = caps.name("company").map(|m| trim_fragment(m.as_str())).unwrap_or("");

        if role_title.is_empty() || company.is_empty() {
            continue;
        }
        if normalize_key(role_title) == subject_key || is_platform_label(company) {
            continue;
        }

        return Some(CurrentRole {
            title: role_title.to_string(),
            company: company.to_string(),
            start_date: PRESENT.to_string(),
        });
    }

    None
}

/// Título da posição a partir do gatilho que casou
fn title_for_trigger(trigger: &str) -> &'static str {
    match trigger.to_lowercase().as_str() {
        "ceo" => "CEO",
        "founder" | "co-founder" => "Founder",
        "executive" => "Executive",
        _ => "Previous Position",
    }
}

/// Extrai posições anteriores do texto concatenado
///
/// Uma entrada por empresa (chave normalizada); a primeira menção vence.
pub fn extract_job_history(text: &str) -> Vec<JobPosition> {
    let mut seen = HashSet::new();
    let mut positions = Vec::new();

    for rule in JOB_HISTORY_RULES.iter() {
        for caps in rule.regex().captures_iter(text) {
            let company = caps.name("company").map(|m| trim_fragment(m.as_str())).unwrap_or("");
            let key = normalize_key(company);
            if key.is_empty() || !seen.insert(key) {
                continue;
            }

            let trigger = caps.name("trigger").map(|m| m.as_str()).unwrap_or("");
            let clause = caps.get(0).map(|m| trim_fragment(m.as_str())).unwrap_or("");

            positions.push(JobPosition {
                title: title_for_trigger(trigger).to_string(),
                company: company.to_string(),
                duration: crate::types::NOT_SPECIFIED.to_string(),
                location: None,
                description: Some(clause.to_string()).filter(|d| !d.is_empty()),
            });
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_at_company() {
        let role = extract_current_role(
            "Ada Lovelace - Lead Analyst at Babbage Engines | LinkedIn",
            "Ada Lovelace",
        )
        .unwrap();
        assert_eq!(role.title, "Lead Analyst");
        assert_eq!(role.company, "Babbage Engines");
        assert_eq!(role.start_date, "Present");
    }

    #[test]
    fn test_role_with_at_sign() {
        let role = extract_current_role("Grace Hopper - Rear Admiral @ US Navy", "Grace Hopper").unwrap();
        assert_eq!(role.title, "Rear Admiral");
        assert_eq!(role.company, "US Navy");
    }

    #[test]
    fn test_name_role_company() {
        let role = extract_current_role(
            "Ada Lovelace - Lead Analyst - Babbage Engines | LinkedIn",
            "Ada Lovelace",
        )
        .unwrap();
        assert_eq!(role.title, "Lead Analyst");
        assert_eq!(role.company, "Babbage Engines");
    }

    #[test]
    fn test_role_company_without_name() {
        let role = extract_current_role("CEO - Acme Corp | LinkedIn", "Wile Coyote").unwrap();
        assert_eq!(role.title, "CEO");
        assert_eq!(role.company, "Acme Corp");
    }

    #[test]
    fn test_name_only_title_yields_nothing() {
        assert!(extract_current_role("Ada Lovelace - LinkedIn", "Ada Lovelace").is_none());
        assert!(extract_current_role("Ada Lovelace - Babbage Engines", "Ada Lovelace").is_none());
        assert!(extract_current_role("Ada Lovelace", "Ada Lovelace").is_none());
        assert!(extract_current_role("", "Ada Lovelace").is_none());
    }

    #[test]
    fn test_job_history_triggers() {
        let text = "She previously worked at Analytical Engines Ltd.\nFounder of Difference Labs and mentor.";
        let history = extract_job_history(text);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].company, "Analytical Engines Ltd");
        assert_eq!(history[0].title, "Previous Position");
        assert_eq!(history[0].duration, "Not specified");
        assert_eq!(history[1].company, "Difference Labs");
        assert_eq!(history[1].title, "Founder");
    }

    #[test]
    fn test_job_history_title_for_ceo() {
        let history = extract_job_history("Former CEO of Acme Robotics, now retired.");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].title, "Previous Position");
        assert_eq!(history[0].company, "Acme Robotics");

        let history = extract_job_history("She was CEO at Initech until 2019.");
        assert_eq!(history[0].title, "CEO");
        assert_eq!(history[0].company, "Initech");
    }

    #[test]
    fn test_job_history_dedup_by_company() {
        let text = "Worked at Acme. Former executive at ACME.";
        let history = extract_job_history(text);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_job_history_requires_capitalised_company() {
        assert!(extract_job_history("He worked at home for years.").is_empty());
    }

    #[test]
    fn test_job_history_company_stops_at_snippet_boundary() {
        let history = extract_job_history("Former engineer at Acme\nBerlin Marathon results");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].company, "Acme");
    }
}
