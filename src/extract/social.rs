//! Perfis sociais a partir das URLs dos resultados.
//!
//! O host decide a plataforma (domínio exato ou subdomínio); o primeiro
//! segmento do caminho é o handle, exceto segmentos reservados de
//! navegação ("search", "hashtag", "explore", ...).

use std::collections::HashSet;

use crate::search::host_matches;
use crate::types::{GithubProfile, LinkedInProfile, OtherProfile, ProviderResult, SocialProfiles, TwitterProfile};
use crate::utils::{clean_text, non_empty};

/// Segmentos de caminho que nunca são handles
const RESERVED_SEGMENTS: &[&str] = &[
    "search", "hashtag", "explore", "i", "home", "intent", "share", "settings", "login", "signup",
    "topics", "features", "about", "orgs", "marketplace", "trending", "collections", "sponsors",
    "notifications", "messages", "media", "likes", "followers", "following", "with_replies",
    "highlights", "status", "lists", "repositories", "stars", "pulls", "issues", "p", "reel",
    "watch", "company", "jobs", "in", "pub",
];

/// Plataforma reconhecida a partir do host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Platform {
    LinkedIn,
    Twitter,
    Github,
    Other,
}

fn platform_for_host(host: &str) -> Platform {
    if host_matches(host, "linkedin.com") {
        Platform::LinkedIn
    } else if host_matches(host, "twitter.com") || host_matches(host, "x.com") {
        Platform::Twitter
    } else if host_matches(host, "github.com") {
        Platform::Github
    } else {
        Platform::Other
    }
}

/// Nome da plataforma: rótulo de segundo nível do host ("instagram")
fn platform_name(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    match labels.len() {
        0 => String::new(),
        1 => labels[0].to_string(),
        n => labels[n - 2].to_string(),
    }
}

fn is_valid_handle(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !RESERVED_SEGMENTS.contains(&segment.to_lowercase().as_str())
}

/// URL sem query string nem fragmento
fn canonical_url(parsed: &url::Url) -> String {
    let mut clean = parsed.clone();
    clean.set_query(None);
    clean.set_fragment(None);
    clean.to_string().trim_end_matches('/').to_string()
}

/// Handle: primeiro segmento do caminho, se não for reservado
fn first_segment_handle(parsed: &url::Url) -> Option<String> {
    let segment = parsed.path_segments()?.find(|s| !s.is_empty())?;
    let segment = segment.trim_start_matches('@');
    if is_valid_handle(segment) {
        Some(segment.to_string())
    } else {
        None
    }
}

/// LinkedIn: só caminhos de perfil ("/in/<slug>")
fn linkedin_profile(parsed: &url::Url) -> Option<LinkedInProfile> {
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some("in"), Some(slug)) if !slug.is_empty() => Some(LinkedInProfile {
            url: canonical_url(parsed),
        }),
        _ => None,
    }
}

/// Agrupa os perfis encontrados nos resultados
///
/// Um slot por plataforma: o primeiro resultado válido vence. Perfis de
/// outras plataformas são acumulados sem repetir URL.
pub fn extract_social(results: &[ProviderResult]) -> SocialProfiles {
    let mut social = SocialProfiles::default();
    let mut seen_other = HashSet::new();

    for result in results {
        let Ok(parsed) = url::Url::parse(result.link.trim()) else {
            continue;
        };
        let Some(host) = parsed.host_str().map(|h| h.to_lowercase()) else {
            continue;
        };

        match platform_for_host(&host) {
            Platform::LinkedIn => {
                if social.linked_in.is_none() {
                    social.linked_in = linkedin_profile(&parsed);
                }
            }
            Platform::Twitter => {
                if social.twitter.is_none() {
                    if let Some(handle) = first_segment_handle(&parsed) {
                        social.twitter = Some(TwitterProfile {
                            url: canonical_url(&parsed),
                            handle,
                            bio: non_empty(&clean_text(&result.snippet)),
                        });
                    }
                }
            }
            Platform::Github => {
                if social.github.is_none() {
                    if let Some(username) = first_segment_handle(&parsed) {
                        social.github = Some(GithubProfile {
                            url: canonical_url(&parsed),
                            username,
                        });
                    }
                }
            }
            Platform::Other => {
                let url = canonical_url(&parsed);
                if seen_other.insert(url.clone()) {
                    social.other.push(OtherProfile {
                        platform: platform_name(&host),
                        username: first_segment_handle(&parsed),
                        url,
                    });
                }
            }
        }
    }

    social
}
