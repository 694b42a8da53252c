// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AGREGADOR / MERGE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Combina as saídas dos provedores em um único EnrichedProfile:
// - Escalares: primeiro valor não vazio, em ordem de precedência
// - Arrays: concatenação em ordem de precedência + dedup por chave normalizada
// - Social: um slot por plataforma, primeiro não vazio vence
//
// A ordem de chegada das respostas nunca influencia o resultado.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::HashSet;

use crate::types::{EnrichedProfile, ProviderOutput, SubjectDescriptor};
use crate::utils::{normalize_key, normalize_phrase};

/// Preenche o slot só se ainda vazio e o candidato não for branco
fn first_text(slot: &mut Option<String>, candidate: Option<String>) {
    if slot.is_none() {
        *slot = candidate.filter(|c| !c.trim().is_empty());
    }
}

fn first_some<T>(slot: &mut Option<T>, candidate: Option<T>) {
    if slot.is_none() {
        *slot = candidate;
    }
}

/// Mantém a primeira ocorrência de cada chave; chaves vazias são descartadas
fn dedup_by_key<T>(items: &mut Vec<T>, key: impl Fn(&T) -> String) {
    let mut seen = HashSet::new();
    items.retain(|item| {
        let k = key(item);
        !k.is_empty() && seen.insert(k)
    });
}

/// Chave de URL: sem esquema, sem barra final, minúscula
fn url_key(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    without_scheme.to_lowercase()
}

/// Combina as saídas dos provedores
///
/// `basic_info.name` vem sempre do sujeito. Função pura.
pub fn merge(subject: &SubjectDescriptor, mut outputs: Vec<ProviderOutput>) -> EnrichedProfile {
    outputs.sort_by_key(|o| o.category.precedence());

    let mut profile = EnrichedProfile::empty(subject.name.clone());

    for ProviderOutput { profile: part, .. } in outputs {
        let basic = &mut profile.basic_info;
        first_text(&mut basic.current_location, part.current_location);
        first_text(&mut basic.profile_picture_url, part.profile_picture_url);
        first_text(&mut basic.short_bio, part.short_bio);

        let professional = &mut profile.professional;
        first_some(&mut professional.current_role, part.current_role);
        professional.job_history.extend(part.job_history);
        professional.education.extend(part.education);
        professional.skills.extend(part.skills);
        professional.achievements.extend(part.achievements);

        let social = &mut profile.social;
        first_some(&mut social.linked_in, part.social.linked_in);
        first_some(&mut social.twitter, part.social.twitter);
        first_some(&mut social.github, part.social.github);
        social.other.extend(part.social.other);

        let media = &mut profile.media_presence;
        media.news_articles.extend(part.media.news_articles);
        media.interviews.extend(part.media.interviews);
        media.publications.extend(part.media.publications);

        let interests = &mut profile.interests;
        interests.topics.extend(part.interests.topics);
        interests.hobbies.extend(part.interests.hobbies);
        interests.public_activities.extend(part.interests.public_activities);

        profile.companies.extend(part.companies);
    }

    let professional = &mut profile.professional;
    dedup_by_key(&mut professional.job_history, |j| normalize_key(&j.company));
    dedup_by_key(&mut professional.education, |e| normalize_key(&e.institution));
    professional.skills = professional.skills.iter().map(|s| normalize_phrase(s)).collect();
    dedup_by_key(&mut professional.skills, |s| s.clone());
    dedup_by_key(&mut professional.achievements, |a| normalize_key(&a.title));

    dedup_by_key(&mut profile.social.other, |o| url_key(&o.url));

    let media = &mut profile.media_presence;
    dedup_by_key(&mut media.news_articles, |n| url_key(&n.url));
    dedup_by_key(&mut media.interviews, |i| url_key(&i.url));
    dedup_by_key(&mut media.publications, |p| url_key(&p.url));

    let interests = &mut profile.interests;
    dedup_by_key(&mut interests.topics, |t| normalize_key(t));
    dedup_by_key(&mut interests.hobbies, |h| normalize_key(h));
    dedup_by_key(&mut interests.public_activities, |a| normalize_key(&a.description));

    dedup_by_key(&mut profile.companies, |c| normalize_key(&c.name));

    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CurrentRole, GithubProfile, JobPosition, NewsArticle, PartialProfile, ProviderCategory,
        TwitterProfile, NOT_SPECIFIED,
    };

    fn output(category: ProviderCategory, profile: PartialProfile) -> ProviderOutput {
        ProviderOutput { category, profile }
    }

    fn role(title: &str) -> Option<CurrentRole> {
        Some(CurrentRole {
            title: title.into(),
            company: "Acme".into(),
            start_date: "Present".into(),
        })
    }

    #[test]
    fn test_name_comes_from_subject() {
        let subject = SubjectDescriptor::new("Ada Lovelace");
        let profile = merge(&subject, vec![]);
        assert_eq!(profile.basic_info.name, "Ada Lovelace");
        assert!(profile.professional.skills.is_empty());
    }

    #[test]
    fn test_scalar_precedence_ignores_input_order() {
        let subject = SubjectDescriptor::new("Ada");
        let news = output(
            ProviderCategory::News,
            PartialProfile {
                current_role: role("Columnist"),
                short_bio: Some("news bio".into()),
                current_location: Some("Paris".into()),
                ..Default::default()
            },
        );
        let professional = output(
            ProviderCategory::Professional,
            PartialProfile {
                current_role: role("Lead Analyst"),
                short_bio: Some("  ".into()),
                ..Default::default()
            },
        );

        let profile = merge(&subject, vec![news, professional]);
        assert_eq!(profile.professional.current_role.unwrap().title, "Lead Analyst");
        assert_eq!(profile.basic_info.short_bio.as_deref(), Some("news bio"));
        assert_eq!(profile.basic_info.current_location.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_skills_case_and_whitespace_variants_collapse() {
        let subject = SubjectDescriptor::new("Ada");
        let a = output(
            ProviderCategory::Professional,
            PartialProfile {
                skills: vec!["Python".into()],
                ..Default::default()
            },
        );
        let b = output(
            ProviderCategory::News,
            PartialProfile {
                skills: vec!["python ".into(), "Rust".into()],
                ..Default::default()
            },
        );

        let profile = merge(&subject, vec![b, a]);
        assert_eq!(profile.professional.skills, vec!["python", "rust"]);
    }

    #[test]
    fn test_job_history_dedup_keeps_higher_precedence() {
        let job = |title: &str, company: &str| JobPosition {
            title: title.into(),
            company: company.into(),
            duration: NOT_SPECIFIED.into(),
            location: None,
            description: None,
        };
        let subject = SubjectDescriptor::new("Ada");
        let news = output(
            ProviderCategory::News,
            PartialProfile {
                job_history: vec![job("Previous Position", "ACME, Inc.")],
                ..Default::default()
            },
        );
        let encyclopedia = output(
            ProviderCategory::Encyclopedia,
            PartialProfile {
                job_history: vec![job("Founder", "Acme Inc")],
                ..Default::default()
            },
        );

        let profile = merge(&subject, vec![news, encyclopedia]);
        assert_eq!(profile.professional.job_history.len(), 1);
        assert_eq!(profile.professional.job_history[0].title, "Founder");
    }

    #[test]
    fn test_social_slots_are_independent() {
        let subject = SubjectDescriptor::new("Ada");
        let mut first = PartialProfile::default();
        first.social.twitter = Some(TwitterProfile {
            handle: "ada".into(),
            url: "https://x.com/ada".into(),
            bio: None,
        });
        let mut second = PartialProfile::default();
        second.social.twitter = Some(TwitterProfile {
            handle: "other".into(),
            url: "https://x.com/other".into(),
            bio: None,
        });
        second.social.github = Some(GithubProfile {
            username: "ada-gh".into(),
            url: "https://github.com/ada-gh".into(),
        });

        let profile = merge(
            &subject,
            vec![
                output(ProviderCategory::Company, second),
                output(ProviderCategory::Social, first),
            ],
        );
        assert_eq!(profile.social.twitter.unwrap().handle, "ada");
        assert_eq!(profile.social.github.unwrap().username, "ada-gh");
    }

    #[test]
    fn test_news_dedup_by_url() {
        let article = |url: &str| NewsArticle {
            title: "t".into(),
            source: "s".into(),
            date: "Unknown".into(),
            url: url.into(),
            snippet: None,
        };
        let subject = SubjectDescriptor::new("Ada");
        let mut part = PartialProfile::default();
        part.media.news_articles = vec![
            article("https://bbc.co.uk/a"),
            article("http://BBC.co.uk/a/"),
            article("https://bbc.co.uk/b"),
        ];

        let profile = merge(&subject, vec![output(ProviderCategory::News, part)]);
        assert_eq!(profile.media_presence.news_articles.len(), 2);
    }

    #[test]
    fn test_url_key() {
        assert_eq!(url_key("https://Example.com/a/"), "example.com/a");
        assert_eq!(url_key("http://example.com/a"), "example.com/a");
    }
}
