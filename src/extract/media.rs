//! Presença na mídia (notícias, entrevistas, publicações) e interesses
//! (tópicos, atividades públicas).

use std::collections::HashSet;

use once_cell::sync::Lazy;

use super::ExtractionRule;
use crate::search::{extract_hostname, host_matches, source_name};
use crate::types::{Interview, NewsArticle, ProviderResult, PublicActivity, Publication};
use crate::utils::{clean_text, first_sentence, non_empty, normalize_key, trim_fragment, word_count};

/// Máximo de notícias por provedor
pub const MAX_NEWS_ARTICLES: usize = 5;

/// Valor de fonte/data quando o resultado não informa
pub const UNKNOWN: &str = "Unknown";

/// Tipo de toda publicação extraída
const PUBLICATION_KIND: &str = "article";

/// Tipo de toda atividade pública extraída
const ACTIVITY_KIND: &str = "Public Activity";

/// Tópicos reconhecidos por palavra-chave: (tag, rótulo, padrão)
const TOPIC_TABLE: &[(&str, &str, &str)] = &[
    ("topic-technology", "Technology", r"(?i)\b(?:technology|tech industry|software)\b"),
    ("topic-ai", "Artificial Intelligence", r"\bAI\b|(?i:\b(?:artificial intelligence|machine learning)\b)"),
    ("topic-space", "Space Exploration", r"(?i)\b(?:space exploration|spaceflight|aerospace|spacex|nasa)\b"),
    ("topic-ev", "Electric Vehicles", r"(?i)\belectric (?:vehicles?|cars?)\b"),
    ("topic-finance", "Finance", r"(?i)\b(?:finance|investing|investment|venture capital|banking)\b"),
    ("topic-health", "Healthcare", r"(?i)\b(?:healthcare|health care|medicine|medical)\b"),
    ("topic-education", "Education", r"(?i)\b(?:education|teaching)\b"),
    ("topic-climate", "Sustainability", r"(?i)\b(?:climate|sustainability|renewable energy)\b"),
];

/// Uma regra por tópico da tabela, mais "interested in X, Y"
pub static TOPIC_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    let mut rules: Vec<ExtractionRule> = TOPIC_TABLE
        .iter()
        .map(|&(tag, _, pattern)| ExtractionRule::new(tag, "interests.topics", pattern))
        .collect();
    rules.push(ExtractionRule::new(
        "topic-interested-in",
        "interests.topics",
        r"(?i)\b(?:interested in|passionate about|interests include)\s+([^.!?\n]+)",
    ));
    rules
});

/// Verbos de atividade pública (founded, launched, volunteer, ...)
pub static ACTIVITY_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![ExtractionRule::new(
        "public-activity",
        "interests.publicActivities",
        r"(?i)\b(?:founded|launched|started|established|volunteers?|volunteered|mentors?|mentored|keynote|speaker)\b",
    )]
});

fn mentions_any(result: &ProviderResult, keywords: &[&str]) -> bool {
    let text = result.text().to_lowercase();
    keywords.iter().any(|k| text.contains(k))
}

/// Nome da fonte: campo do backend ou rótulo do host
fn result_source(result: &ProviderResult) -> String {
    result
        .source
        .as_deref()
        .and_then(non_empty)
        .or_else(|| source_name(&result.link))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn result_date(result: &ProviderResult) -> String {
    result
        .date
        .as_deref()
        .and_then(non_empty)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Notícias: todo resultado fora do LinkedIn, no máximo `MAX_NEWS_ARTICLES`
pub fn extract_news_articles(results: &[ProviderResult]) -> Vec<NewsArticle> {
    results
        .iter()
        .filter(|r| {
            extract_hostname(&r.link)
                .map(|host| !host_matches(&host, "linkedin.com"))
                .unwrap_or(false)
        })
        .take(MAX_NEWS_ARTICLES)
        .map(|r| NewsArticle {
            title: clean_text(&r.title),
            source: result_source(r),
            date: result_date(r),
            url: r.link.clone(),
            snippet: non_empty(&clean_text(&r.snippet)),
        })
        .collect()
}

/// Entrevistas e podcasts
pub fn extract_interviews(results: &[ProviderResult]) -> Vec<Interview> {
    results
        .iter()
        .filter(|r| mentions_any(r, &["interview", "podcast"]))
        .map(|r| Interview {
            title: clean_text(&r.title),
            platform: result_source(r),
            date: result_date(r),
            url: r.link.clone(),
        })
        .collect()
}

/// Artigos publicados pelo sujeito
pub fn extract_publications(results: &[ProviderResult]) -> Vec<Publication> {
    results
        .iter()
        .filter(|r| mentions_any(r, &["published", "publication", "op-ed", "author of"]))
        .map(|r| Publication {
            title: clean_text(&r.title),
            platform: result_source(r),
            date: result_date(r),
            url: r.link.clone(),
            kind: PUBLICATION_KIND.to_string(),
        })
        .collect()
}

/// Tópicos de interesse: tabela de palavras-chave + "interested in X, Y"
pub fn extract_topics(results: &[ProviderResult]) -> Vec<String> {
    let text = results.iter().map(|r| r.text()).collect::<Vec<_>>().join("\n");
    let mut seen = HashSet::new();
    let mut topics = Vec::new();

    let mut push = |topic: &str| {
        let topic = trim_fragment(topic);
        if topic.chars().count() >= 3 && word_count(topic) <= 4 && seen.insert(normalize_key(topic)) {
            topics.push(topic.to_string());
        }
    };

    for (rule, &(_, label, _)) in TOPIC_RULES.iter().zip(TOPIC_TABLE) {
        if rule.is_match(&text) {
            push(label);
        }
    }

    if let Some(rule) = TOPIC_RULES.get(TOPIC_TABLE.len()) {
        for captured in rule.all_captures(&text) {
            for topic in captured.split([',', ';']).flat_map(|part| part.split(" and ")) {
                push(topic);
            }
        }
    }

    topics
}

/// Atividades públicas: primeira sentença do snippet que cita fundação,
/// lançamento, voluntariado, mentoria ou palestras
pub fn extract_public_activities(results: &[ProviderResult]) -> Vec<PublicActivity> {
    let mut seen = HashSet::new();

    results
        .iter()
        .filter_map(|r| {
            let snippet = clean_text(&r.snippet);
            if !ACTIVITY_RULES.iter().any(|rule| rule.is_match(&snippet)) {
                return None;
            }
            let description = first_sentence(&snippet).trim().to_string();
            if description.is_empty() || !seen.insert(normalize_key(&description)) {
                return None;
            }
            Some(PublicActivity {
                kind: ACTIVITY_KIND.to_string(),
                description,
                source: Some(result_source(r)),
            })
        })
        .collect()
}
