//! Empresas associadas ao sujeito, a partir do resultado principal do
//! provedor de empresas.

use crate::types::{CompanyInfo, ProviderResult, SubjectDescriptor};
use crate::utils::{clean_text, non_empty, trim_fragment};

/// Papel usado quando o sujeito não declara participação
const UNKNOWN_ROLE: &str = "Unknown";

/// Nome da empresa: título até o primeiro " - " ou " | "
fn company_name_from_title(title: &str) -> String {
    let title = clean_text(title);
    let cut = [" - ", " | ", " – "]
        .iter()
        .filter_map(|sep| title.find(sep))
        .min()
        .unwrap_or(title.len());
    trim_fragment(&title[..cut]).to_string()
}

/// Uma entrada a partir do resultado principal
///
/// O papel vem da primeira participação declarada pelo sujeito.
pub fn extract_companies(results: &[ProviderResult], subject: &SubjectDescriptor) -> Vec<CompanyInfo> {
    let Some(top) = results.first() else {
        return Vec::new();
    };

    let name = company_name_from_title(&top.title);
    if name.is_empty() {
        return Vec::new();
    }

    let role = subject
        .company_ownership
        .first()
        .and_then(|c| non_empty(&c.role))
        .unwrap_or_else(|| UNKNOWN_ROLE.to_string());

    vec![CompanyInfo {
        name,
        role,
        description: non_empty(&clean_text(&top.snippet)),
        website: non_empty(&top.link),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_from_top_result() {
        let subject = SubjectDescriptor::new("Ada Lovelace").with_company("Babbage Engines", "Founder");
        let results = vec![
            ProviderResult::new(
                "Babbage Engines - Funding, Financials | Crunchbase",
                "Babbage Engines builds analytical machines.",
                "https://www.crunchbase.com/organization/babbage-engines",
            ),
            ProviderResult::new("Other", "ignored", "https://example.com"),
        ];

        let companies = extract_companies(&results, &subject);
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Babbage Engines");
        assert_eq!(companies[0].role, "Founder");
        assert_eq!(companies[0].website.as_deref(), Some("https://www.crunchbase.com/organization/babbage-engines"));
    }

    #[test]
    fn test_role_unknown_without_ownership() {
        let results = vec![ProviderResult::new("Acme Corp", "", "https://acme.com/about")];
        let companies = extract_companies(&results, &SubjectDescriptor::new("Wile"));
        assert_eq!(companies[0].role, "Unknown");
        assert!(companies[0].description.is_none());
    }

    #[test]
    fn test_no_results_no_companies() {
        assert!(extract_companies(&[], &SubjectDescriptor::new("Wile")).is_empty());
    }
}
