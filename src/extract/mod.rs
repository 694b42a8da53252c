// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// EXTRATORES DE SNIPPETS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Conjunto ordenado de regras (padrão rotulado → campo) aplicadas sobre o
// texto livre dos resultados de busca. Cada extrator é uma função pura;
// texto que não casa gera ausência, nunca um palpite.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use regex::Regex;

use crate::types::{ProviderCategory, ProviderOutput, ProviderResult, PartialProfile, SubjectDescriptor};
use crate::utils::clean_text;

pub mod achievements;
pub mod bio;
pub mod company;
pub mod education;
pub mod location;
pub mod media;
pub mod role;
pub mod skills;
pub mod social;

/// Regra de extração: padrão regex rotulado com o campo que alimenta
#[derive(Debug)]
pub struct ExtractionRule {
    /// Identificador da regra (único no catálogo)
    pub tag: &'static str,
    /// Campo do perfil alimentado pela regra
    pub field: &'static str,
    pattern: Regex,
}

impl ExtractionRule {
    /// Compila a regra. Padrões são literais do crate; falha aqui é bug.
    pub fn new(tag: &'static str, field: &'static str, pattern: &str) -> Self {
        Self {
            tag,
            field,
            pattern: Regex::new(pattern).unwrap(),
        }
    }

    /// Regex compilada
    pub fn regex(&self) -> &Regex {
        &self.pattern
    }

    /// Primeiro grupo de captura da primeira ocorrência
    pub fn first_capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// Primeiro grupo de captura de cada ocorrência
    pub fn all_captures<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.pattern
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    /// Verifica se a regra casa com o texto
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Catálogo completo de regras, na ordem em que são avaliadas
pub fn rule_catalog() -> Vec<&'static ExtractionRule> {
    let mut rules = Vec::new();
    rules.extend(role::ROLE_RULES.iter());
    rules.extend(role::JOB_HISTORY_RULES.iter());
    rules.extend(education::EDUCATION_RULES.iter());
    rules.extend(skills::SKILL_RULES.iter());
    rules.extend(location::LOCATION_RULES.iter());
    rules.extend(achievements::DATE_RULES.iter());
    rules.extend(bio::BIO_RULES.iter());
    rules.extend(media::TOPIC_RULES.iter());
    rules.extend(media::ACTIVITY_RULES.iter());
    rules
}

/// Texto concatenado dos snippets, um por linha
///
/// A quebra de linha funciona como fronteira de sentença para as regras.
pub fn concatenated_text(results: &[ProviderResult]) -> String {
    results
        .iter()
        .map(|r| clean_text(&r.snippet))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Aplica os extratores aos resultados de um provedor
///
/// Extratores de texto rodam para todas as categorias; os que dependem
/// do formato do resultado (título, URL, miniatura) só rodam onde o
/// provedor devolve esse formato.
pub fn extract_provider(
    category: ProviderCategory,
    results: &[ProviderResult],
    subject: &SubjectDescriptor,
) -> ProviderOutput {
    let mut profile = PartialProfile::default();
    if results.is_empty() {
        return ProviderOutput { category, profile };
    }

    let text = concatenated_text(results);

    profile.education = education::extract_education(&text);
    profile.job_history = role::extract_job_history(&text);
    profile.skills = skills::extract_skills(&text);
    profile.current_location = location::extract_location(&text);
    profile.achievements = achievements::extract_achievements(results);
    profile.interests.topics = media::extract_topics(results);
    profile.interests.public_activities = media::extract_public_activities(results);

    match category {
        ProviderCategory::Professional => {
            let top = &results[0];
            profile.current_role = role::extract_current_role(&top.title, &subject.name);
            profile.short_bio = bio::top_snippet_bio(results);
            profile.profile_picture_url = top.thumbnail.clone();
            profile.social.linked_in = social::extract_social(results).linked_in;
        }
        ProviderCategory::Encyclopedia => {
            profile.short_bio = bio::top_snippet_bio(results);
            if profile.current_location.is_none() {
                profile.current_location = location::location_from_title(&results[0].title);
            }
        }
        ProviderCategory::News => {
            profile.short_bio = bio::extract_bio(&text);
            profile.media.news_articles = media::extract_news_articles(results);
            profile.media.interviews = media::extract_interviews(results);
            profile.media.publications = media::extract_publications(results);
        }
        ProviderCategory::Social => {
            profile.social = social::extract_social(results);
        }
        ProviderCategory::Company => {
            profile.companies = company::extract_companies(results, subject);
        }
    }

    ProviderOutput { category, profile }
}
