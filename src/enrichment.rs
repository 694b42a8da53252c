// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ORQUESTRADOR DE ENRIQUECIMENTO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Máquina de estados de uma requisição:
//
//   CacheCheck ──hit──► Done
//       │
//      miss
//       ▼
//    Fanout ──► Extract ──► Merge ──► CacheWrite ──► Done
//
// Fanout dispara uma chamada por provedor em paralelo e espera todas
// (uma única barreira). Falha de provedor nunca muda o estado: o pipeline
// sempre chega a Done com o que foi obtido.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use futures::future::join_all;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::cache::{store_from_config, ProfileCache};
use crate::config::{ConfigError, EnrichmentConfig};
use crate::extract::extract_provider;
use crate::merge::merge;
use crate::metrics::{EnrichmentObserver, EnrichmentReport, NoopObserver};
use crate::query::generate_queries;
use crate::search::{providers_from_config, search_fail_soft, ProviderOutcome, SearchProvider};
use crate::types::{EnrichedProfile, ProviderOutput, SubjectDescriptor};
use crate::utils::{ActionTimer, StageTimings};

/// Estados de uma requisição de enriquecimento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnrichmentState {
    CacheCheck,
    Fanout,
    Extract,
    Merge,
    CacheWrite,
    Done,
}

impl EnrichmentState {
    /// Próximo estado; `cache_hit` só importa em `CacheCheck`
    pub fn next(self, cache_hit: bool) -> Self {
        match self {
            Self::CacheCheck if cache_hit => Self::Done,
            Self::CacheCheck => Self::Fanout,
            Self::Fanout => Self::Extract,
            Self::Extract => Self::Merge,
            Self::Merge => Self::CacheWrite,
            Self::CacheWrite | Self::Done => Self::Done,
        }
    }

    /// Estado terminal
    pub fn is_terminal(self) -> bool {
        self == Self::Done
    }
}

/// Erros visíveis ao chamador
#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Invalid subject: {0}")]
    InvalidSubject(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Valida a entrada na fronteira do orquestrador
fn validate_subject(subject: &SubjectDescriptor, cache_key: &str) -> Result<(), EnrichmentError> {
    if subject.name.trim().is_empty() {
        return Err(EnrichmentError::InvalidSubject("name must not be empty".into()));
    }
    if cache_key.trim().is_empty() {
        return Err(EnrichmentError::InvalidSubject("cache key must not be empty".into()));
    }
    Ok(())
}

/// Orquestrador: cache-aside + fan-out + extração + merge
///
/// Configuração, provedores, cache e observador são injetados; nenhum
/// estado global. Seguro para uso concorrente atrás de um `Arc`.
pub struct ProfileEnricher {
    config: EnrichmentConfig,
    providers: Vec<Arc<dyn SearchProvider>>,
    cache: ProfileCache,
    observer: Arc<dyn EnrichmentObserver>,
}

impl ProfileEnricher {
    /// Cria orquestrador com dependências explícitas
    ///
    /// Provedores não configurados são aceitos e pulados sem chamada.
    pub fn new(
        config: EnrichmentConfig,
        providers: Vec<Arc<dyn SearchProvider>>,
        cache: ProfileCache,
        observer: Arc<dyn EnrichmentObserver>,
    ) -> Self {
        Self {
            config,
            providers,
            cache,
            observer,
        }
    }

    /// Cria orquestrador sem observador
    pub fn without_observer(
        config: EnrichmentConfig,
        providers: Vec<Arc<dyn SearchProvider>>,
        cache: ProfileCache,
    ) -> Self {
        Self::new(config, providers, cache, Arc::new(NoopObserver))
    }

    /// Cria orquestrador com clientes SerpApi e store da configuração
    ///
    /// Falha (fatal) se nenhuma categoria tiver chave.
    pub async fn from_config(
        config: EnrichmentConfig,
        observer: Arc<dyn EnrichmentObserver>,
    ) -> Result<Self, EnrichmentError> {
        config.validate()?;

        let store = store_from_config(&config).await;
        let cache = ProfileCache::from_config(store, &config);
        let providers = providers_from_config(&config);

        log::info!(
            "🚀 ProfileEnricher pronto: {} provedores configurados, TTL {}s, timeout {:?}",
            config.configured_categories().len(),
            config.cache_ttl_secs,
            config.timeout
        );

        Ok(Self::new(config, providers, cache, observer))
    }

    /// Configuração em uso
    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Cache em uso
    pub fn cache(&self) -> &ProfileCache {
        &self.cache
    }

    /// Enriquece um sujeito
    ///
    /// Só falha para sujeito inválido; falhas de provedor e de cache são
    /// absorvidas.
    pub async fn enrich(
        &self,
        subject: &SubjectDescriptor,
        cache_key: &str,
    ) -> Result<EnrichedProfile, EnrichmentError> {
        let (profile, _) = self.enrich_with_report(subject, cache_key).await?;
        Ok(profile)
    }

    /// Enriquece um sujeito e devolve o relatório da requisição
    pub async fn enrich_with_report(
        &self,
        subject: &SubjectDescriptor,
        cache_key: &str,
    ) -> Result<(EnrichedProfile, EnrichmentReport), EnrichmentError> {
        validate_subject(subject, cache_key)?;

        let request_id = Uuid::new_v4();
        let short_id = request_id.to_string()[..8].to_string();
        let started = Instant::now();
        let mut timings = StageTimings::default();
        let mut state = EnrichmentState::CacheCheck;

        log::info!("🔎 [{}] Enriquecendo '{}' (key={})", short_id, subject.name, cache_key);

        // ── CacheCheck ──────────────────────────────────────────────────────
        let timer = ActionTimer::start("cache_read");
        let cached = self.cache.get(cache_key).await;
        timings.cache_read_ms = timer.stop_and_log();

        if let Some(profile) = cached {
            self.observer.on_cache_hit(cache_key);
            state = state.next(true);
            log::info!("💾 [{}] Cache hit", short_id);

            let report = EnrichmentReport {
                request_id,
                cache_key: cache_key.to_string(),
                cache_hit: true,
                providers_attempted: Vec::new(),
                providers_degraded: Vec::new(),
                providers_skipped: Vec::new(),
                latency_ms: started.elapsed().as_millis() as u64,
                timings,
                final_state: state,
            };
            self.complete(&report);
            return Ok((profile, report));
        }

        self.observer.on_cache_miss(cache_key);
        state = state.next(false);
        log::debug!("➡️ [{}] {:?}", short_id, state);

        // ── Fanout ──────────────────────────────────────────────────────────
        let timer = ActionTimer::start("fanout");
        let outcomes = self.fan_out(subject).await;
        timings.fanout_ms = timer.stop_and_log();

        let mut providers_attempted = Vec::new();
        let mut providers_degraded = Vec::new();
        let mut providers_skipped = Vec::new();

        for outcome in &outcomes {
            if outcome.skipped {
                providers_skipped.push(outcome.category);
                continue;
            }
            providers_attempted.push(outcome.category);
            match &outcome.degraded {
                Some(error) => {
                    providers_degraded.push(outcome.category);
                    self.observer.on_provider_degraded(outcome.category, error);
                }
                None => self.observer.on_provider_call(
                    outcome.category,
                    Duration::from_millis(outcome.latency_ms),
                    outcome.results.len(),
                ),
            }
        }

        state = state.next(false);
        log::debug!("➡️ [{}] {:?}", short_id, state);

        // ── Extract ─────────────────────────────────────────────────────────
        let timer = ActionTimer::start("extract");
        let outputs: Vec<ProviderOutput> = outcomes
            .par_iter()
            .filter(|outcome| !outcome.results.is_empty())
            .map(|outcome| extract_provider(outcome.category, &outcome.results, subject))
            .collect();
        timings.extract_ms = timer.stop_and_log();

        state = state.next(false);
        log::debug!("➡️ [{}] {:?}", short_id, state);

        // ── Merge ───────────────────────────────────────────────────────────
        let timer = ActionTimer::start("merge");
        let profile = merge(subject, outputs);
        timings.merge_ms = timer.stop_and_log();

        state = state.next(false);
        log::debug!("➡️ [{}] {:?}", short_id, state);

        // ── CacheWrite ──────────────────────────────────────────────────────
        let timer = ActionTimer::start("cache_write");
        self.cache.set(cache_key, &profile).await;
        timings.cache_write_ms = timer.stop_and_log();

        state = state.next(false);

        let report = EnrichmentReport {
            request_id,
            cache_key: cache_key.to_string(),
            cache_hit: false,
            providers_attempted,
            providers_degraded,
            providers_skipped,
            latency_ms: started.elapsed().as_millis() as u64,
            timings,
            final_state: state,
        };
        self.complete(&report);

        Ok((profile, report))
    }

    /// Dispara uma chamada por provedor em paralelo e espera todas
    ///
    /// Cada chamada tem o próprio timeout; um provedor lento não cancela
    /// os demais.
    async fn fan_out(&self, subject: &SubjectDescriptor) -> Vec<ProviderOutcome> {
        let queries = generate_queries(subject);
        let limit = self.config.effective_result_limit();
        let timeout = self.config.timeout;

        let calls = self.providers.iter().map(|provider| {
            let query = queries.get(provider.category()).to_string();
            async move { search_fail_soft(provider.as_ref(), &query, limit, timeout).await }
        });

        join_all(calls).await
    }

    fn complete(&self, report: &EnrichmentReport) {
        log::info!("✅ {}", report.summary());
        log::debug!("⏱️ {}", report.timings.summary());
        self.observer.on_request_complete(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsCollector;
    use crate::search::{MockSearchProvider, ProviderError};
    use crate::types::{ProviderCategory, ProviderResult};

    fn config() -> EnrichmentConfig {
        EnrichmentConfig::new().with_shared_key("test-key")
    }

    fn enricher(providers: Vec<Arc<dyn SearchProvider>>) -> ProfileEnricher {
        let config = config();
        let cache = ProfileCache::in_memory(&config);
        ProfileEnricher::without_observer(config, providers, cache)
    }

    fn professional_result() -> ProviderResult {
        ProviderResult::new(
            "Ada Lovelace - Lead Analyst at Babbage Engines | LinkedIn",
            "Ada Lovelace is a mathematician based in London.",
            "https://www.linkedin.com/in/ada-lovelace",
        )
    }

    #[test]
    fn test_state_machine_paths() {
        let mut state = EnrichmentState::CacheCheck;
        let mut path = vec![state];
        while !state.is_terminal() {
            state = state.next(false);
            path.push(state);
        }
        assert_eq!(
            path,
            vec![
                EnrichmentState::CacheCheck,
                EnrichmentState::Fanout,
                EnrichmentState::Extract,
                EnrichmentState::Merge,
                EnrichmentState::CacheWrite,
                EnrichmentState::Done,
            ]
        );
        assert_eq!(EnrichmentState::CacheCheck.next(true), EnrichmentState::Done);
    }

    #[test]
    fn test_validate_subject() {
        assert!(validate_subject(&SubjectDescriptor::new("Ada"), "k").is_ok());
        assert!(matches!(
            validate_subject(&SubjectDescriptor::new("  "), "k"),
            Err(EnrichmentError::InvalidSubject(_))
        ));
        assert!(matches!(
            validate_subject(&SubjectDescriptor::new("Ada"), ""),
            Err(EnrichmentError::InvalidSubject(_))
        ));
    }

    #[tokio::test]
    async fn test_enrich_end_to_end_with_mock() {
        let provider = Arc::new(
            MockSearchProvider::new(ProviderCategory::Professional).with_results(vec![professional_result()]),
        );
        let enricher = enricher(vec![provider.clone()]);

        let (profile, report) = enricher
            .enrich_with_report(&SubjectDescriptor::new("Ada Lovelace"), "ada")
            .await
            .unwrap();

        assert_eq!(profile.basic_info.name, "Ada Lovelace");
        assert_eq!(profile.professional.current_role.unwrap().company, "Babbage Engines");
        assert_eq!(profile.basic_info.current_location.as_deref(), Some("London"));
        assert_eq!(report.final_state, EnrichmentState::Done);
        assert!(!report.cache_hit);
        assert_eq!(report.providers_attempted, vec![ProviderCategory::Professional]);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let provider = Arc::new(
            MockSearchProvider::new(ProviderCategory::Professional).with_results(vec![professional_result()]),
        );
        let enricher = enricher(vec![provider.clone()]);
        let subject = SubjectDescriptor::new("Ada Lovelace");

        enricher.enrich(&subject, "ada").await.unwrap();
        let (_, report) = enricher.enrich_with_report(&subject, "ada").await.unwrap();

        assert!(report.cache_hit);
        assert_eq!(report.final_state, EnrichmentState::Done);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_all_degraded_still_reaches_done() {
        let provider = Arc::new(
            MockSearchProvider::new(ProviderCategory::News).failing(ProviderError::Http(503)),
        );
        let enricher = enricher(vec![provider.clone()]);
        let subject = SubjectDescriptor::new("Ada Lovelace");

        let (profile, report) = enricher.enrich_with_report(&subject, "ada").await.unwrap();
        assert_eq!(profile, EnrichedProfile::empty("Ada Lovelace"));
        assert_eq!(report.providers_degraded, vec![ProviderCategory::News]);
        assert_eq!(report.final_state, EnrichmentState::Done);

        let (_, second) = enricher.enrich_with_report(&subject, "ada").await.unwrap();
        assert!(second.cache_hit);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_observer_receives_events() {
        let collector = MetricsCollector::new();
        let config = config();
        let cache = ProfileCache::in_memory(&config);
        let providers: Vec<Arc<dyn SearchProvider>> = vec![
            Arc::new(MockSearchProvider::new(ProviderCategory::Professional).with_results(vec![professional_result()])),
            Arc::new(MockSearchProvider::new(ProviderCategory::Social).failing(ProviderError::RateLimited)),
            Arc::new(MockSearchProvider::new(ProviderCategory::Company).unconfigured()),
        ];
        let enricher = ProfileEnricher::new(config, providers, cache, Arc::new(collector.clone()));

        let (_, report) = enricher
            .enrich_with_report(&SubjectDescriptor::new("Ada Lovelace"), "ada")
            .await
            .unwrap();

        assert_eq!(report.providers_skipped, vec![ProviderCategory::Company]);
        let snapshot = collector.snapshot();
        assert_eq!(snapshot.requests, 1);
        assert_eq!(snapshot.cache_misses, 1);
        assert_eq!(snapshot.provider_calls, 2);
        assert_eq!(snapshot.degraded_calls, 1);
        assert_eq!(snapshot.degraded_by_category.get("social"), Some(&1));
    }

    #[tokio::test]
    async fn test_from_config_requires_a_provider() {
        let result = ProfileEnricher::from_config(EnrichmentConfig::default(), Arc::new(NoopObserver)).await;
        assert!(matches!(
            result,
            Err(EnrichmentError::Config(ConfigError::NoProvidersConfigured))
        ));
    }
}
