// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTES DE BUSCA (PROVEDORES)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Trait e implementações para os provedores de busca.
// Um cliente por categoria; cada chamada é um único GET HTTP.
// Falhas viram lista vazia na fronteira (search_fail_soft).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::config::EnrichmentConfig;
use crate::types::{ProviderCategory, ProviderResult};

/// Erros do cliente de busca
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("HTTP status {0}")]
    Http(u16),

    #[error("Search API error: {0}")]
    Api(String),

    #[error("Invalid response format: {0}")]
    Parse(String),
}

/// Trait principal para provedores de busca
///
/// Implementações são stateless (além da própria chamada de rede).
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Categoria atendida pelo provedor
    fn category(&self) -> ProviderCategory;

    /// Provedor sem credenciais é pulado sem chamada de rede
    fn is_configured(&self) -> bool {
        true
    }

    /// Executa uma busca e retorna até `limit` resultados validados
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ProviderResult>, ProviderError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FRONTEIRA FAIL-SOFT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Resultado de uma chamada de provedor, já sem erro propagável
#[derive(Debug, Clone)]
pub struct ProviderOutcome {
    pub category: ProviderCategory,
    pub results: Vec<ProviderResult>,
    /// Motivo da degradação (None = sucesso ou pulado)
    pub degraded: Option<ProviderError>,
    /// Provedor não configurado: nenhuma chamada feita
    pub skipped: bool,
    pub latency_ms: u64,
}

impl ProviderOutcome {
    fn skipped(category: ProviderCategory) -> Self {
        Self {
            category,
            results: Vec::new(),
            degraded: None,
            skipped: true,
            latency_ms: 0,
        }
    }

    /// Verifica se o provedor falhou
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// Executa a busca convertendo qualquer falha em lista vazia
///
/// Transporte, timeout, 429 e respostas não-2xx são tratados igualmente:
/// resultado vazio + evento de degradação logado. Sem retry.
pub async fn search_fail_soft(
    provider: &dyn SearchProvider,
    query: &str,
    limit: usize,
    timeout: Duration,
) -> ProviderOutcome {
    let category = provider.category();

    if !provider.is_configured() || query.trim().is_empty() {
        log::debug!("⏭️ Provedor {} pulado (sem configuração)", category);
        return ProviderOutcome::skipped(category);
    }

    let start = Instant::now();
    let result = match tokio::time::timeout(timeout, provider.search(query, limit)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(timeout.as_millis() as u64)),
    };
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(mut results) => {
            results.truncate(limit);
            log::debug!(
                "🔍 Provedor {}: {} resultados em {}ms",
                category,
                results.len(),
                latency_ms
            );
            ProviderOutcome {
                category,
                results,
                degraded: None,
                skipped: false,
                latency_ms,
            }
        }
        Err(e) => {
            log::warn!("⚠️ Provedor {} degradado após {}ms: {}", category, latency_ms, e);
            ProviderOutcome {
                category,
                results: Vec::new(),
                degraded: Some(e),
                skipped: false,
                latency_ms,
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO SERPAPI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Item bruto da resposta do backend
#[derive(Debug, Deserialize)]
struct RawResult {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
    date: Option<String>,
    source: Option<String>,
    thumbnail: Option<String>,
}

/// Resposta do backend: lista direta ou objeto com `organic_results`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    List(Vec<RawResult>),
    Wrapped {
        #[serde(default)]
        organic_results: Vec<RawResult>,
        error: Option<String>,
    },
}

/// O backend responde busca vazia com um corpo de erro
/// ("Google hasn't returned any results for this query.")
fn is_no_results_message(message: &str) -> bool {
    message.to_lowercase().contains("returned any results")
}

/// Valida itens brutos na fronteira do cliente
///
/// Itens sem link http(s) válido são descartados; título e snippet
/// ausentes viram string vazia.
fn validate_results(raw: Vec<RawResult>, limit: usize) -> Vec<ProviderResult> {
    raw.into_iter()
        .filter_map(|item| {
            let link = item.link?.trim().to_string();
            let parsed = url::Url::parse(&link).ok()?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return None;
            }
            Some(ProviderResult {
                title: item.title.unwrap_or_default().trim().to_string(),
                snippet: item.snippet.unwrap_or_default().trim().to_string(),
                link,
                date: item.date.filter(|d| !d.trim().is_empty()),
                source: item.source.filter(|s| !s.trim().is_empty()),
                thumbnail: item.thumbnail.filter(|t| t.starts_with("http")),
            })
        })
        .take(limit)
        .collect()
}

/// Cliente SerpApi para uma categoria
pub struct SerpApiClient {
    category: ProviderCategory,
    api_key: Option<String>,
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl SerpApiClient {
    /// Cria cliente para a categoria; `api_key = None` desativa o provedor
    pub fn new(
        category: ProviderCategory,
        api_key: Option<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            category,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            endpoint: endpoint.into(),
            timeout,
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Cria cliente a partir da configuração
    pub fn from_config(category: ProviderCategory, config: &EnrichmentConfig) -> Self {
        Self::new(
            category,
            config.api_key(category).map(String::from),
            config.search_endpoint.clone(),
            config.timeout,
        )
    }

    /// Monta a URL da requisição (query já vem URL-encoded)
    fn request_url(&self, query: &str, limit: usize, api_key: &str) -> String {
        format!(
            "{}?engine={}&q={}&num={}&api_key={}",
            self.endpoint,
            self.category.engine(),
            query,
            limit,
            urlencoding::encode(api_key)
        )
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    fn category(&self) -> ProviderCategory {
        self.category
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ProviderResult>, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };

        let response = self
            .client
            .get(self.request_url(query, limit, api_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout.as_millis() as u64)
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(ProviderError::Http(status.as_u16()));
        }

        let body = response
            .json::<SearchResponse>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let raw = match body {
            SearchResponse::List(items) => items,
            SearchResponse::Wrapped {
                error: Some(message),
                ..
            } if is_no_results_message(&message) => {
                log::debug!("🔍 Provedor {}: busca sem resultados", self.category);
                Vec::new()
            }
            SearchResponse::Wrapped {
                error: Some(message),
                ..
            } => return Err(ProviderError::Api(message)),
            SearchResponse::Wrapped { organic_results, .. } => organic_results,
        };

        Ok(validate_results(raw, limit))
    }
}

/// Cria um cliente por categoria a partir da configuração
pub fn providers_from_config(config: &EnrichmentConfig) -> Vec<std::sync::Arc<dyn SearchProvider>> {
    ProviderCategory::ALL
        .into_iter()
        .map(|category| {
            std::sync::Arc::new(SerpApiClient::from_config(category, config)) as std::sync::Arc<dyn SearchProvider>
        })
        .collect()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Provedor mock com resultados fixos, atraso e falha programáveis
#[derive(Debug)]
pub struct MockSearchProvider {
    category: ProviderCategory,
    results: Vec<ProviderResult>,
    failure: Option<ProviderError>,
    delay: Option<Duration>,
    configured: bool,
    calls: AtomicUsize,
}

impl MockSearchProvider {
    /// Mock sem resultados, configurado
    pub fn new(category: ProviderCategory) -> Self {
        Self {
            category,
            results: Vec::new(),
            failure: None,
            delay: None,
            configured: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Resultados devolvidos em toda chamada
    pub fn with_results(mut self, results: Vec<ProviderResult>) -> Self {
        self.results = results;
        self
    }

    /// Atraso antes de responder
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Toda chamada falha com o erro
    pub fn failing(mut self, error: ProviderError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Marca como não configurado (pulado sem chamada)
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    /// Número de chamadas recebidas
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    fn category(&self) -> ProviderCategory {
        self.category
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<ProviderResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.results.iter().take(limit).cloned().collect()),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// UTILITÁRIOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Extrai hostname de uma URL
pub fn extract_hostname(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

/// Nome curto da fonte: primeiro rótulo do host, sem "www."
pub fn source_name(url: &str) -> Option<String> {
    let host = extract_hostname(url)?;
    let host = host.strip_prefix("www.").unwrap_or(&host);
    host.split('.').next().filter(|s| !s.is_empty()).map(String::from)
}

/// Verifica se o host é o domínio informado ou um subdomínio dele
pub fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(link: Option<&str>) -> RawResult {
        RawResult {
            title: Some(" Title ".into()),
            link: link.map(String::from),
            snippet: None,
            date: Some("".into()),
            source: None,
            thumbnail: Some("data:image/png".into()),
        }
    }

    #[test]
    fn test_extract_hostname() {
        assert_eq!(
            extract_hostname("https://www.Example.com/path"),
            Some("www.example.com".into())
        );
        assert_eq!(extract_hostname("invalid"), None);
    }

    #[test]
    fn test_source_name() {
        assert_eq!(source_name("https://www.forbes.com/a"), Some("forbes".into()));
        assert_eq!(source_name("https://techcrunch.com/b"), Some("techcrunch".into()));
        assert_eq!(source_name("nope"), None);
    }

    #[test]
    fn test_host_matches() {
        assert!(host_matches("x.com", "x.com"));
        assert!(host_matches("mobile.x.com", "x.com"));
        assert!(!host_matches("dropbox.com", "x.com"));
    }

    #[test]
    fn test_validate_results_drops_invalid_links() {
        let results = validate_results(
            vec![
                raw(Some("https://example.com/a")),
                raw(None),
                raw(Some("not a url")),
                raw(Some("ftp://example.com/file")),
            ],
            10,
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Title");
        assert_eq!(results[0].snippet, "");
        assert!(results[0].date.is_none());
        assert!(results[0].thumbnail.is_none());
    }

    #[test]
    fn test_validate_results_respects_limit() {
        let items = (0..5)
            .map(|i| raw(Some(&format!("https://example.com/{}", i))))
            .collect();
        assert_eq!(validate_results(items, 2).len(), 2);
    }

    #[test]
    fn test_search_response_shapes() {
        let wrapped: SearchResponse =
            serde_json::from_str(r#"{"organic_results":[{"title":"a","link":"https://a.com"}]}"#).unwrap();
        assert!(matches!(wrapped, SearchResponse::Wrapped { ref organic_results, .. } if organic_results.len() == 1));

        let list: SearchResponse = serde_json::from_str(r#"[{"title":"a","link":"https://a.com"}]"#).unwrap();
        assert!(matches!(list, SearchResponse::List(ref items) if items.len() == 1));
    }

    #[test]
    fn test_no_results_message() {
        assert!(is_no_results_message("Google hasn't returned any results for this query."));
        assert!(is_no_results_message("Wikipedia hasn't returned any results for this query."));
        assert!(!is_no_results_message("Invalid API key. Your API key should be here: https://serpapi.com/manage-api-key"));
    }

    #[test]
    fn test_unconfigured_client() {
        let client = SerpApiClient::new(
            ProviderCategory::News,
            Some("  ".into()),
            "http://localhost",
            Duration::from_secs(1),
        );
        assert!(!client.is_configured());
    }

    #[test]
    fn test_request_url_uses_category_engine() {
        let client = SerpApiClient::new(
            ProviderCategory::Encyclopedia,
            Some("k".into()),
            "https://serpapi.com/search.json",
            Duration::from_secs(1),
        );
        let url = client.request_url("Ada%20Lovelace", 5, "k&y");
        assert_eq!(
            url,
            "https://serpapi.com/search.json?engine=wikipedia&q=Ada%20Lovelace&num=5&api_key=k%26y"
        );
    }

    #[tokio::test]
    async fn test_fail_soft_converts_error_to_empty() {
        let provider = MockSearchProvider::new(ProviderCategory::News).failing(ProviderError::RateLimited);
        let outcome = search_fail_soft(&provider, "q", 5, Duration::from_secs(1)).await;

        assert!(outcome.results.is_empty());
        assert_eq!(outcome.degraded, Some(ProviderError::RateLimited));
        assert!(!outcome.skipped);
    }

    #[tokio::test]
    async fn test_fail_soft_timeout() {
        let provider = MockSearchProvider::new(ProviderCategory::Social)
            .with_results(vec![ProviderResult::new("t", "s", "https://x.com/ada")])
            .with_delay(Duration::from_millis(200));
        let outcome = search_fail_soft(&provider, "q", 5, Duration::from_millis(20)).await;

        assert!(outcome.results.is_empty());
        assert!(matches!(outcome.degraded, Some(ProviderError::Timeout(20))));
    }

    #[tokio::test]
    async fn test_fail_soft_skips_unconfigured_without_calling() {
        let provider = MockSearchProvider::new(ProviderCategory::Company).unconfigured();
        let outcome = search_fail_soft(&provider, "q", 5, Duration::from_secs(1)).await;

        assert!(outcome.skipped);
        assert!(!outcome.is_degraded());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_mock_search_respects_limit() {
        let provider = MockSearchProvider::new(ProviderCategory::News).with_results(vec![
            ProviderResult::new("a", "", "https://a.com"),
            ProviderResult::new("b", "", "https://b.com"),
        ]);
        let outcome = search_fail_soft(&provider, "q", 1, Duration::from_secs(1)).await;
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(provider.calls(), 1);
    }
}
