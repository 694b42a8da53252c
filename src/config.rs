// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DO ENRIQUECIMENTO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Chaves de API por provedor, TTL do cache, timeout e limite de resultados.
// Todas as configurações podem ser definidas via .env
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::HashMap;
use std::time::Duration;

use crate::types::ProviderCategory;

/// Endpoint padrão do backend de busca
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://serpapi.com/search.json";

/// TTL padrão do cache: 24 horas
pub const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

/// Timeout padrão por chamada de provedor
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Resultados por query (padrão)
pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// Máximo de resultados por query aceito pelo backend
pub const MAX_RESULT_LIMIT: usize = 10;

/// Prefixo das chaves de cache
pub const DEFAULT_CACHE_PREFIX: &str = "profile_enrichment:";

/// Erros de configuração (fatais no startup)
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("No search provider configured: set SERP_API_KEY or a per-category key")]
    NoProvidersConfigured,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuração do motor de enriquecimento
///
/// Passada explicitamente ao orquestrador; nenhum estado global.
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Chave de API por categoria. Categoria sem chave é pulada.
    pub api_keys: HashMap<ProviderCategory, String>,
    /// URL do backend de busca
    pub search_endpoint: String,
    /// TTL do cache (segundos)
    pub cache_ttl_secs: u64,
    /// Timeout de cada chamada de provedor
    pub timeout: Duration,
    /// Resultados por query
    pub result_limit: usize,
    /// Prefixo das chaves de cache
    pub cache_prefix: String,
    /// URL do cache remoto (ex: redis://localhost:6379)
    pub cache_url: Option<String>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_keys: HashMap::new(),
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            result_limit: DEFAULT_RESULT_LIMIT,
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
            cache_url: None,
        }
    }
}

impl EnrichmentConfig {
    /// Cria configuração padrão (sem provedores)
    pub fn new() -> Self {
        Self::default()
    }

    /// Usa a mesma chave para todas as categorias
    pub fn with_shared_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        for category in ProviderCategory::ALL {
            self.api_keys.insert(category, key.clone());
        }
        self
    }

    /// Define a chave de uma categoria
    pub fn with_key(mut self, category: ProviderCategory, key: impl Into<String>) -> Self {
        self.api_keys.insert(category, key.into());
        self
    }

    /// Chave da categoria (None = provedor não configurado)
    pub fn api_key(&self, category: ProviderCategory) -> Option<&str> {
        self.api_keys
            .get(&category)
            .map(String::as_str)
            .filter(|k| !k.trim().is_empty())
    }

    /// Categorias com chave configurada, em ordem de precedência
    pub fn configured_categories(&self) -> Vec<ProviderCategory> {
        ProviderCategory::ALL
            .into_iter()
            .filter(|c| self.api_key(*c).is_some())
            .collect()
    }

    /// Limite de resultados efetivo (1..=MAX_RESULT_LIMIT)
    pub fn effective_result_limit(&self) -> usize {
        self.result_limit.clamp(1, MAX_RESULT_LIMIT)
    }

    /// Valida a configuração no startup
    ///
    /// Nenhum provedor configurado é um erro fatal; as chamadas
    /// individuais nunca falham por falta de chave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.configured_categories().is_empty() {
            return Err(ConfigError::NoProvidersConfigured);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be greater than zero".into()));
        }
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid("cache TTL must be greater than zero".into()));
        }
        if url::Url::parse(&self.search_endpoint).is_err() {
            return Err(ConfigError::Invalid(format!(
                "search endpoint is not a valid URL: {}",
                self.search_endpoint
            )));
        }
        Ok(())
    }
}

/// Nome da variável de ambiente com a chave de uma categoria
fn category_key_var(category: ProviderCategory) -> String {
    format!("SERP_API_KEY_{}", category.as_str().to_uppercase())
}

/// Lê variável numérica; valor inválido mantém o padrão
fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("⚠️ {}='{}' inválido, usando padrão", name, raw);
            None
        }
    }
}

/// Carrega configuração a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `SERP_API_KEY`: chave compartilhada por todas as categorias
/// - `SERP_API_KEY_PROFESSIONAL`, `_NEWS`, `_SOCIAL`, `_COMPANY`, `_ENCYCLOPEDIA`:
///   chave específica (sobrescreve a compartilhada)
/// - `SEARCH_ENDPOINT`: URL do backend (padrão: serpapi.com)
/// - `ENRICHMENT_CACHE_TTL_SECS`: TTL do cache (padrão: 86400)
/// - `ENRICHMENT_TIMEOUT_SECS`: timeout por chamada (padrão: 10)
/// - `ENRICHMENT_RESULT_LIMIT`: resultados por query (padrão: 10)
/// - `REDIS_URL`: cache remoto (opcional)
///
/// # Exemplo
///
/// ```rust,ignore
/// // .env
/// SERP_API_KEY=abc123
/// ENRICHMENT_TIMEOUT_SECS=5
///
/// // código
/// let config = load_enrichment_config();
/// config.validate()?;
/// ```
pub fn load_enrichment_config() -> EnrichmentConfig {
    let mut config = EnrichmentConfig::default();

    if let Ok(shared) = std::env::var("SERP_API_KEY") {
        if !shared.trim().is_empty() {
            config = config.with_shared_key(shared.trim());
            log::info!("📦 SERP_API_KEY definida (todas as categorias)");
        }
    }

    for category in ProviderCategory::ALL {
        let var = category_key_var(category);
        if let Ok(key) = std::env::var(&var) {
            if !key.trim().is_empty() {
                config.api_keys.insert(category, key.trim().to_string());
                log::info!("📦 {} definida", var);
            }
        }
    }

    if let Ok(endpoint) = std::env::var("SEARCH_ENDPOINT") {
        log::info!("📦 SEARCH_ENDPOINT={}", endpoint);
        config.search_endpoint = endpoint;
    }

    if let Some(ttl) = parse_env::<u64>("ENRICHMENT_CACHE_TTL_SECS") {
        config.cache_ttl_secs = ttl;
        log::info!("📦 ENRICHMENT_CACHE_TTL_SECS={}", ttl);
    }

    if let Some(secs) = parse_env::<u64>("ENRICHMENT_TIMEOUT_SECS") {
        config.timeout = Duration::from_secs(secs);
        log::info!("📦 ENRICHMENT_TIMEOUT_SECS={}", secs);
    }

    if let Some(limit) = parse_env::<usize>("ENRICHMENT_RESULT_LIMIT") {
        config.result_limit = limit;
        log::info!("📦 ENRICHMENT_RESULT_LIMIT={}", limit);
    }

    if let Ok(cache_url) = std::env::var("REDIS_URL") {
        if !cache_url.trim().is_empty() {
            config.cache_url = Some(cache_url);
            log::info!("📦 REDIS_URL definida");
        }
    }

    log::info!(
        "🔧 Provedores configurados: {:?}",
        config
            .configured_categories()
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
    );

    config
}
