// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS COMPARTILHADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Entrada (SubjectDescriptor), resultado bruto de busca (ProviderResult)
// e o documento de saída (EnrichedProfile) com suas seções.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tipo de URL (alias para String)
pub type Url = String;

/// Valor literal usado quando grau/curso/duração não aparecem no snippet.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Categorias de provedor de busca
///
/// A ordem das variantes é a ordem de precedência do merge:
/// a primeira categoria vence conflitos de campos escalares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderCategory {
    /// Perfil profissional (LinkedIn via busca web)
    Professional,
    /// Enciclopédia (Wikipedia)
    Encyclopedia,
    /// Notícias e mídia
    News,
    /// Redes sociais
    Social,
    /// Informações da empresa atual
    Company,
}

impl ProviderCategory {
    /// Todas as categorias, em ordem de precedência
    pub const ALL: [ProviderCategory; 5] = [
        Self::Professional,
        Self::Encyclopedia,
        Self::News,
        Self::Social,
        Self::Company,
    ];

    /// Posição na ordem de precedência (0 = maior)
    pub fn precedence(&self) -> usize {
        Self::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or(Self::ALL.len())
    }

    /// Retorna a categoria como string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Encyclopedia => "encyclopedia",
            Self::News => "news",
            Self::Social => "social",
            Self::Company => "company",
        }
    }

    /// Engine do backend de busca usada pela categoria
    pub fn engine(&self) -> &'static str {
        match self {
            Self::Encyclopedia => "wikipedia",
            _ => "google",
        }
    }
}

impl fmt::Display for ProviderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ENTRADA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Detalhes familiares do sujeito
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyDetails {
    /// Nome do cônjuge (usado para desambiguar a busca social)
    pub spouse: Option<String>,
    /// Número de filhos
    pub children: Option<u32>,
    /// Número de dependentes
    pub dependents: Option<u32>,
}

/// Participação societária
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOwnership {
    /// Nome da empresa
    pub company_name: String,
    /// Cargo na empresa
    pub role: String,
    /// Percentual de participação
    pub ownership_percentage: Option<f64>,
}

/// Descritor do sujeito a ser enriquecido
///
/// Imutável durante uma chamada de enriquecimento. Apenas `name`,
/// `family_details.spouse` e a primeira entrada de `company_ownership`
/// influenciam a busca; os demais campos são repassados.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDescriptor {
    /// Nome completo (obrigatório, não vazio)
    pub name: String,
    /// Email
    pub email: Option<String>,
    /// Data de nascimento
    pub date_of_birth: Option<String>,
    /// Estado civil
    pub marital_status: Option<String>,
    /// Detalhes familiares
    pub family_details: Option<FamilyDetails>,
    /// Participações societárias (a primeira é a "empresa atual")
    #[serde(default)]
    pub company_ownership: Vec<CompanyOwnership>,
}

impl SubjectDescriptor {
    /// Cria descritor apenas com o nome
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adiciona uma participação societária
    pub fn with_company(mut self, company_name: impl Into<String>, role: impl Into<String>) -> Self {
        self.company_ownership.push(CompanyOwnership {
            company_name: company_name.into(),
            role: role.into(),
            ownership_percentage: None,
        });
        self
    }

    /// Define o cônjuge
    pub fn with_spouse(mut self, spouse: impl Into<String>) -> Self {
        self.family_details
            .get_or_insert_with(FamilyDetails::default)
            .spouse = Some(spouse.into());
        self
    }

    /// Empresa atual: primeira participação com nome não vazio
    pub fn current_company(&self) -> Option<&CompanyOwnership> {
        self.company_ownership
            .first()
            .filter(|c| !c.company_name.trim().is_empty())
    }

    /// Nome do cônjuge, se informado
    pub fn spouse(&self) -> Option<&str> {
        self.family_details
            .as_ref()
            .and_then(|f| f.spouse.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RESULTADO BRUTO DE BUSCA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Um hit de busca, já validado na fronteira do cliente
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    /// Título do resultado
    pub title: String,
    /// Snippet de texto livre
    pub snippet: String,
    /// URL absoluta do resultado
    pub link: Url,
    /// Data informada pelo backend
    pub date: Option<String>,
    /// Nome da fonte (ex: "Forbes")
    pub source: Option<String>,
    /// Miniatura associada ao resultado
    pub thumbnail: Option<Url>,
}

impl ProviderResult {
    /// Cria resultado com título, snippet e link
    pub fn new(title: impl Into<String>, snippet: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            link: link.into(),
            ..Default::default()
        }
    }

    /// Define a data do resultado
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Título e snippet concatenados
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.snippet)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PERFIL ENRIQUECIDO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Informações básicas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    /// Sempre igual a `SubjectDescriptor::name`
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_bio: Option<String>,
}

/// Cargo atual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRole {
    pub title: String,
    pub company: String,
    pub start_date: String,
}

/// Posição no histórico profissional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosition {
    pub title: String,
    pub company: String,
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Formação acadêmica
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    /// `NOT_SPECIFIED` quando ausente
    pub degree: String,
    /// `NOT_SPECIFIED` quando ausente
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

/// Conquista / prêmio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Seção profissional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Professional {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_role: Option<CurrentRole>,
    pub job_history: Vec<JobPosition>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub achievements: Vec<Achievement>,
}

/// Perfil do LinkedIn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedInProfile {
    pub url: Url,
}

/// Perfil do Twitter / X
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwitterProfile {
    pub handle: String,
    pub url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Perfil do GitHub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubProfile {
    pub username: String,
    pub url: Url,
}

/// Perfil em outra plataforma
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherProfile {
    pub platform: String,
    pub url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Seção social: um slot por plataforma
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialProfiles {
    #[serde(rename = "linkedIn", skip_serializing_if = "Option::is_none")]
    pub linked_in: Option<LinkedInProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<TwitterProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<GithubProfile>,
    pub other: Vec<OtherProfile>,
}

/// Artigo de notícia
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub source: String,
    pub date: String,
    pub url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Entrevista
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub title: String,
    pub platform: String,
    pub date: String,
    pub url: Url,
}

/// Publicação
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    pub platform: String,
    pub date: String,
    pub url: Url,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Presença na mídia
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaPresence {
    pub news_articles: Vec<NewsArticle>,
    pub interviews: Vec<Interview>,
    pub publications: Vec<Publication>,
}

/// Atividade pública
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicActivity {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Interesses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Interests {
    pub topics: Vec<String>,
    pub hobbies: Vec<String>,
    pub public_activities: Vec<PublicActivity>,
}

/// Empresa associada ao sujeito
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<Url>,
}

/// Perfil público enriquecido
///
/// Todo campo de array está sempre presente (possivelmente vazio);
/// `basic_info.name` é sempre o nome do sujeito, nunca um valor extraído.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedProfile {
    pub basic_info: BasicInfo,
    #[serde(default)]
    pub professional: Professional,
    #[serde(default)]
    pub social: SocialProfiles,
    #[serde(default)]
    pub media_presence: MediaPresence,
    #[serde(default)]
    pub interests: Interests,
    #[serde(default)]
    pub companies: Vec<CompanyInfo>,
}

impl EnrichedProfile {
    /// Perfil vazio ancorado no nome do sujeito
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            basic_info: BasicInfo {
                name: name.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PERFIL PARCIAL (POR PROVEDOR)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Fatos extraídos dos resultados de um único provedor
///
/// Mesmo formato do `EnrichedProfile`, sem o nome: a âncora de
/// identidade só é definida no merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialProfile {
    pub current_location: Option<String>,
    pub profile_picture_url: Option<Url>,
    pub short_bio: Option<String>,
    pub current_role: Option<CurrentRole>,
    pub job_history: Vec<JobPosition>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub achievements: Vec<Achievement>,
    pub social: SocialProfiles,
    pub media: MediaPresence,
    pub interests: Interests,
    pub companies: Vec<CompanyInfo>,
}

impl PartialProfile {
    /// Verifica se nenhum fato foi extraído
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Saída de um provedor após extração
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOutput {
    pub category: ProviderCategory,
    pub profile: PartialProfile,
}
