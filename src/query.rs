// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GERADOR DE QUERIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Monta uma query por categoria de provedor a partir do SubjectDescriptor.
// Cada componente é URL-encoded; componentes são unidos por '+'.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::types::{ProviderCategory, SubjectDescriptor};

/// Filtro de site / categoria por provedor
fn category_filter(category: ProviderCategory) -> &'static str {
    match category {
        ProviderCategory::Professional => "site:linkedin.com/in/",
        ProviderCategory::News => "(interview OR article OR news OR press)",
        ProviderCategory::Social => "(site:twitter.com OR site:x.com OR site:github.com OR site:instagram.com)",
        ProviderCategory::Company => "company information funding",
        ProviderCategory::Encyclopedia => "biography",
    }
}

/// Filtro usado na query de empresa quando o sujeito não informa empresa
const COMPANY_FALLBACK_FILTER: &str = "company founder business";

/// Conjunto de queries, uma por categoria
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySet {
    pub professional: String,
    pub news: String,
    pub social: String,
    pub company: String,
    pub encyclopedia: String,
}

impl QuerySet {
    /// Query da categoria
    pub fn get(&self, category: ProviderCategory) -> &str {
        match category {
            ProviderCategory::Professional => &self.professional,
            ProviderCategory::News => &self.news,
            ProviderCategory::Social => &self.social,
            ProviderCategory::Company => &self.company,
            ProviderCategory::Encyclopedia => &self.encyclopedia,
        }
    }

    /// Itera (categoria, query) em ordem de precedência
    pub fn iter(&self) -> impl Iterator<Item = (ProviderCategory, &str)> {
        ProviderCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Une componentes não vazios, cada um URL-encoded
fn join_encoded(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| urlencoding::encode(p).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

/// Gera as queries de busca para um sujeito
///
/// - O nome está sempre presente
/// - A empresa atual entra nas queries profissional, notícias, empresa e enciclopédia
/// - O cônjuge entra na query social
/// - Sem campos opcionais, cai para queries só com o nome
pub fn generate_queries(subject: &SubjectDescriptor) -> QuerySet {
    let name = subject.name.trim();
    let company = subject
        .current_company()
        .map(|c| c.company_name.trim())
        .unwrap_or("");
    let spouse = subject.spouse().unwrap_or("");

    let company_query = if company.is_empty() {
        join_encoded(&[name, COMPANY_FALLBACK_FILTER])
    } else {
        join_encoded(&[name, company, category_filter(ProviderCategory::Company)])
    };

    QuerySet {
        professional: join_encoded(&[name, company, category_filter(ProviderCategory::Professional)]),
        news: join_encoded(&[name, company, category_filter(ProviderCategory::News)]),
        social: join_encoded(&[name, spouse, category_filter(ProviderCategory::Social)]),
        company: company_query,
        encyclopedia: join_encoded(&[name, company, category_filter(ProviderCategory::Encyclopedia)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only_queries() {
        let queries = generate_queries(&SubjectDescriptor::new("Ada Lovelace"));

        for (_, query) in queries.iter() {
            assert!(query.starts_with("Ada%20Lovelace+"), "query sem nome: {}", query);
        }
        assert_eq!(queries.professional, "Ada%20Lovelace+site%3Alinkedin.com%2Fin%2F");
        assert!(queries.company.ends_with("company%20founder%20business"));
    }

    #[test]
    fn test_company_appended_to_professional_news_company() {
        let subject = SubjectDescriptor::new("Ada Lovelace").with_company("Babbage & Co", "Founder");
        let queries = generate_queries(&subject);

        assert!(queries.professional.contains("Babbage%20%26%20Co"));
        assert!(queries.news.contains("Babbage%20%26%20Co"));
        assert!(queries.company.starts_with("Ada%20Lovelace+Babbage%20%26%20Co+"));
        for (_, query) in queries.iter() {
            assert!(query.starts_with("Ada%20Lovelace+"), "query sem nome: {}", query);
        }
        assert!(!queries.social.contains("Babbage"));
    }

    #[test]
    fn test_spouse_only_in_social_query() {
        let subject = SubjectDescriptor::new("Ada Lovelace").with_spouse("William King");
        let queries = generate_queries(&subject);

        assert!(queries.social.contains("William%20King"));
        assert!(!queries.professional.contains("William"));
        assert!(!queries.news.contains("William"));
    }

    #[test]
    fn test_each_query_has_category_filter() {
        let queries = generate_queries(&SubjectDescriptor::new("Ada"));
        assert!(queries.news.contains("interview%20OR%20article"));
        assert!(queries.social.contains("site%3Agithub.com"));
        assert!(queries.encyclopedia.ends_with("biography"));
    }

    #[test]
    fn test_iter_follows_precedence() {
        let queries = generate_queries(&SubjectDescriptor::new("Ada"));
        let order: Vec<_> = queries.iter().map(|(c, _)| c).collect();
        assert_eq!(order, ProviderCategory::ALL.to_vec());
    }
}
