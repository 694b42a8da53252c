//! # Profile Enrichment
//!
//! Enriquecimento best-effort de perfis públicos a partir de buscas web
//! paralelas.
//!
//! ## Como funciona
//!
//! Dado um sujeito (nome + contexto opcional de empresa e família):
//! 1. Consulta o cache pela chave do chamador
//! 2. Em caso de miss, gera uma query por categoria de provedor
//! 3. Dispara todas as buscas em paralelo, cada uma com seu timeout
//! 4. Extrai fatos dos snippets com regras regex determinísticas
//! 5. Combina tudo em um único `EnrichedProfile` por precedência
//! 6. Grava o perfil no cache com TTL
//!
//! Falhas de provedor e de cache nunca derrubam a requisição: o resultado
//! é sempre um perfil (possivelmente vazio) ancorado no nome do sujeito.
//!
//! ## Categorias e precedência
//!
//! | Categoria | Engine | Prioridade no merge |
//! |-----------|--------|---------------------|
//! | Professional | google | 1 |
//! | Encyclopedia | wikipedia | 2 |
//! | News | google | 3 |
//! | Social | google | 4 |
//! | Company | google | 5 |
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use profile_enrichment::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_enrichment_config();
//!     let enricher = ProfileEnricher::from_config(config, Arc::new(NoopObserver)).await?;
//!     let subject = SubjectDescriptor::new("Ada Lovelace");
//!     let profile = enricher.enrich(&subject, "ada-lovelace").await?;
//!     println!("{}", serde_json::to_string_pretty(&profile)?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Tipos compartilhados.
///
/// - [`SubjectDescriptor`]: entrada da requisição
/// - [`ProviderResult`]: hit bruto de busca
/// - [`EnrichedProfile`]: documento de saída
/// - [`ProviderCategory`]: categorias e ordem de precedência
pub mod types;

/// Geração determinística de queries por categoria.
pub mod query;

/// Provedores de busca.
///
/// Define a trait `SearchProvider` e implementações para:
/// - SerpApi (uma instância por categoria)
/// - Mock para testes
///
/// Inclui o wrapper fail-soft com timeout por chamada.
pub mod search;

/// Extração de fatos por regras regex.
///
/// Cada regra tem uma tag estável; o catálogo completo é exposto por
/// [`extract::rule_catalog`].
pub mod extract;

/// Merge das saídas por precedência e deduplicação.
pub mod merge;

/// Cache-aside de perfis.
///
/// - Trait `CacheStore` (GET / SETEX)
/// - Store em memória com TTL e eviction
/// - Store Redis (feature `redis`)
/// - Fachada fail-soft `ProfileCache`
pub mod cache;

/// Observabilidade: relatório por requisição, observer e métricas agregadas.
pub mod metrics;

/// Orquestrador: máquina de estados da requisição.
pub mod enrichment;

/// Configuração via variáveis de ambiente.
///
/// - `SERP_API_KEY`: chave compartilhada por todas as categorias
/// - `SERP_API_KEY_<CATEGORIA>`: chave específica (ex: `SERP_API_KEY_NEWS`)
/// - `SEARCH_ENDPOINT`: endpoint do backend
/// - `ENRICHMENT_CACHE_TTL_SECS`: TTL do cache (padrão: 86400)
/// - `ENRICHMENT_TIMEOUT_SECS`: timeout por provedor (padrão: 10)
/// - `ENRICHMENT_RESULT_LIMIT`: resultados por provedor (padrão: 10)
/// - `REDIS_URL`: store remoto (feature `redis`)
pub mod config;

/// Utilitários de texto e timing.
pub mod utils;

// Re-exports principais
pub use cache::{CacheError, CacheStore, MemoryStore, ProfileCache};
pub use config::{load_enrichment_config, ConfigError, EnrichmentConfig};
pub use enrichment::{EnrichmentError, EnrichmentState, ProfileEnricher};
pub use merge::merge;
pub use metrics::{EnrichmentObserver, EnrichmentReport, MetricsCollector, NoopObserver};
pub use query::{generate_queries, QuerySet};
pub use search::{ProviderError, SearchProvider, SerpApiClient};
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
///
/// ```rust,ignore
/// use profile_enrichment::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cache::{CacheStore, MemoryStore, ProfileCache};
    pub use crate::config::{load_enrichment_config, EnrichmentConfig};
    pub use crate::enrichment::{EnrichmentError, EnrichmentState, ProfileEnricher};
    pub use crate::metrics::{EnrichmentObserver, EnrichmentReport, MetricsCollector, NoopObserver};
    pub use crate::search::{MockSearchProvider, ProviderError, SearchProvider, SerpApiClient};
    pub use crate::types::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
