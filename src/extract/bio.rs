//! Bio curta.

use once_cell::sync::Lazy;

use super::ExtractionRule;
use crate::types::ProviderResult;
use crate::utils::{clean_text, non_empty};

/// Bios maiores que isso são cortadas na última palavra
const MAX_BIO_CHARS: usize = 300;

/// Cláusula descritiva "is/was a ..." usada como bio
pub static BIO_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![ExtractionRule::new(
        "bio-descriptor",
        "shortBio",
        r"(?i)(\b(?:is|was)\s+(?:an?|the)\s+[^.!?\n]+)",
    )]
});

fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind(' ') {
        Some(pos) => format!("{}...", cut[..pos].trim_end()),
        None => format!("{}...", cut),
    }
}

/// Snippet do primeiro resultado com texto
pub fn top_snippet_bio(results: &[ProviderResult]) -> Option<String> {
    results
        .iter()
        .find_map(|r| non_empty(&clean_text(&r.snippet)))
        .map(|bio| truncate_words(&bio, MAX_BIO_CHARS))
}

/// Oração descritiva "is/was a/an/the ..." no texto livre
pub fn extract_bio(text: &str) -> Option<String> {
    BIO_RULES
        .iter()
        .find_map(|rule| rule.first_capture(text))
        .and_then(non_empty)
        .map(|bio| truncate_words(&bio, MAX_BIO_CHARS))
}
