//! Localização atual: "based in", "lives in", ... seguido de um lugar
//! com inicial maiúscula.

use once_cell::sync::Lazy;

use super::ExtractionRule;
use crate::utils::trim_fragment;

/// Rótulos de lugar em sequência: "San Francisco, California"
const PLACE: &str = r"(\p{Lu}[\w'-]*(?:(?:[^\S\n]+|,[^\S\n]*)\p{Lu}[\w'-]*)*)";

/// Regras de localização no texto livre, avaliadas em ordem
pub static LOCATION_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![
        ExtractionRule::new(
            "location-explicit",
            "currentLocation",
            &format!(r"(?i:\b(?:based in|located in|lives in|living in|residing in|resides in)[^\S\n]+){}", PLACE),
        ),
        // "is from X" / "hails from X"; "graduated from X" não é localização
        ExtractionRule::new(
            "location-origin",
            "currentLocation",
            &format!(r"(?i:\b(?:is|was|hails|originally)[^\S\n]+from[^\S\n]+){}", PLACE),
        ),
    ]
});

/// "Ada Lovelace, mathematician from London" → "London"
pub static TITLE_LOCATION_RULE: Lazy<ExtractionRule> = Lazy::new(|| {
    ExtractionRule::new("location-title", "currentLocation", &format!(r"\bfrom[^\S\n]+{}\s*$", PLACE))
});

/// Primeira localização encontrada, na ordem das regras
pub fn extract_location(text: &str) -> Option<String> {
    LOCATION_RULES
        .iter()
        .find_map(|rule| rule.first_capture(text))
        .map(trim_fragment)
        .filter(|place| !place.is_empty())
        .map(String::from)
}

/// Localização no fim do título da enciclopédia ("... from <Lugar>")
pub fn location_from_title(title: &str) -> Option<String> {
    let title = title.trim();
    let title = title.strip_suffix(" - Wikipedia").unwrap_or(title);
    TITLE_LOCATION_RULE
        .first_capture(title)
        .map(trim_fragment)
        .filter(|place| !place.is_empty())
        .map(String::from)
}
