// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MÉTRICAS DE ENRIQUECIMENTO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Interface de eventos estruturados emitidos pelo orquestrador e um coletor
// com contadores atômicos e percentis de latência.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use uuid::Uuid;

use crate::enrichment::EnrichmentState;
use crate::search::ProviderError;
use crate::types::ProviderCategory;
use crate::utils::StageTimings;

/// Tamanho do buffer de latências (para percentis)
const LATENCY_BUFFER_SIZE: usize = 1000;

/// Relatório de uma requisição de enriquecimento
#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentReport {
    /// ID único da requisição
    pub request_id: Uuid,
    /// Chave de cache informada pelo chamador
    pub cache_key: String,
    /// Perfil servido do cache
    pub cache_hit: bool,
    /// Provedores chamados
    pub providers_attempted: Vec<ProviderCategory>,
    /// Provedores que falharam (resultado vazio)
    pub providers_degraded: Vec<ProviderCategory>,
    /// Provedores pulados (sem chave ou query vazia)
    pub providers_skipped: Vec<ProviderCategory>,
    /// Latência total (ms)
    pub latency_ms: u64,
    /// Tempo por etapa
    pub timings: StageTimings,
    /// Estado final da máquina de estados
    pub final_state: EnrichmentState,
}

impl EnrichmentReport {
    /// Resumo em uma linha para log
    pub fn summary(&self) -> String {
        format!(
            "[{}] cache_hit={} attempted={} degraded={} skipped={} latency={}ms state={:?}",
            &self.request_id.to_string()[..8],
            self.cache_hit,
            self.providers_attempted.len(),
            self.providers_degraded.len(),
            self.providers_skipped.len(),
            self.latency_ms,
            self.final_state
        )
    }
}

/// Observador de eventos do enriquecimento
///
/// Todos os métodos têm implementação vazia; implemente só o que precisar.
pub trait EnrichmentObserver: Send + Sync {
    /// Perfil encontrado no cache
    fn on_cache_hit(&self, _cache_key: &str) {}

    /// Perfil ausente no cache
    fn on_cache_miss(&self, _cache_key: &str) {}

    /// Chamada de provedor concluída com sucesso
    fn on_provider_call(&self, _category: ProviderCategory, _latency: Duration, _result_count: usize) {}

    /// Chamada de provedor degradada (erro convertido em resultado vazio)
    fn on_provider_degraded(&self, _category: ProviderCategory, _error: &ProviderError) {}

    /// Requisição concluída
    fn on_request_complete(&self, _report: &EnrichmentReport) {}
}

/// Observador que ignora todos os eventos
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl EnrichmentObserver for NoopObserver {}

/// Métricas agregadas de enriquecimento
///
/// - Requisições e latência (p50, p95, p99)
/// - Taxa de cache hit
/// - Chamadas de provedor e degradações por categoria
#[derive(Debug)]
pub struct EnrichmentMetrics {
    /// ID único desta instância de métricas
    pub id: Uuid,
    /// Timestamp de criação
    pub created_at: DateTime<Utc>,
    /// Buffer circular de latências de requisição
    latencies: RwLock<VecDeque<u64>>,
    requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    provider_calls: AtomicU64,
    provider_results: AtomicU64,
    degraded_calls: AtomicU64,
    /// Degradações por categoria, indexadas por precedência
    degraded_by_category: [AtomicU64; 5],
    total_latency_ms: AtomicU64,
}

impl Default for EnrichmentMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EnrichmentMetrics {
    /// Cria nova instância de métricas
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            latencies: RwLock::new(VecDeque::with_capacity(LATENCY_BUFFER_SIZE)),
            requests: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            provider_calls: AtomicU64::new(0),
            provider_results: AtomicU64::new(0),
            degraded_calls: AtomicU64::new(0),
            degraded_by_category: Default::default(),
            total_latency_ms: AtomicU64::new(0),
        }
    }

    /// Registra uma requisição concluída
    pub fn record_request(&self, latency_ms: u64) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);

        if let Ok(mut latencies) = self.latencies.write() {
            if latencies.len() >= LATENCY_BUFFER_SIZE {
                latencies.pop_front();
            }
            latencies.push_back(latency_ms);
        }
    }

    /// Registra um cache hit
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Registra um cache miss
    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Registra chamada de provedor bem sucedida
    pub fn record_provider_call(&self, result_count: usize) {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
        self.provider_results.fetch_add(result_count as u64, Ordering::Relaxed);
    }

    /// Registra chamada de provedor degradada
    pub fn record_degraded(&self, category: ProviderCategory) {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
        self.degraded_calls.fetch_add(1, Ordering::Relaxed);
        self.degraded_by_category[category.precedence()].fetch_add(1, Ordering::Relaxed);
    }

    /// Total de requisições
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Total de chamadas de provedor
    pub fn provider_calls(&self) -> u64 {
        self.provider_calls.load(Ordering::Relaxed)
    }

    /// Total de chamadas degradadas
    pub fn degraded_calls(&self) -> u64 {
        self.degraded_calls.load(Ordering::Relaxed)
    }

    /// Degradações de uma categoria
    pub fn degraded_for(&self, category: ProviderCategory) -> u64 {
        self.degraded_by_category[category.precedence()].load(Ordering::Relaxed)
    }

    /// Taxa de cache hit (0.0 - 1.0)
    pub fn cache_hit_rate(&self) -> f64 {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let total = hits + self.cache_misses.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        hits as f64 / total as f64
    }

    /// Taxa de degradação das chamadas de provedor (0.0 - 1.0)
    pub fn degraded_rate(&self) -> f64 {
        let calls = self.provider_calls();
        if calls == 0 {
            return 0.0;
        }
        self.degraded_calls() as f64 / calls as f64
    }

    /// Latência média das requisições em ms
    pub fn avg_latency(&self) -> f64 {
        let total = self.requests();
        if total == 0 {
            return 0.0;
        }
        self.total_latency_ms.load(Ordering::Relaxed) as f64 / total as f64
    }

    /// Calcula percentil de latência
    fn calculate_percentile(&self, percentile: f64) -> u64 {
        if let Ok(latencies) = self.latencies.read() {
            if latencies.is_empty() {
                return 0;
            }

            let mut sorted: Vec<u64> = latencies.iter().copied().collect();
            sorted.sort_unstable();

            let idx = ((percentile / 100.0) * (sorted.len() - 1) as f64).round() as usize;
            sorted.get(idx).copied().unwrap_or(0)
        } else {
            0
        }
    }

    /// Latência p50 (mediana)
    pub fn latency_p50(&self) -> u64 {
        self.calculate_percentile(50.0)
    }

    /// Latência p95
    pub fn latency_p95(&self) -> u64 {
        self.calculate_percentile(95.0)
    }

    /// Latência p99
    pub fn latency_p99(&self) -> u64 {
        self.calculate_percentile(99.0)
    }

    /// Gera snapshot das métricas atuais
    pub fn snapshot(&self) -> MetricsSnapshot {
        let degraded_by_category = ProviderCategory::ALL
            .into_iter()
            .map(|c| (c.as_str().to_string(), self.degraded_for(c)))
            .filter(|(_, count)| *count > 0)
            .collect();

        MetricsSnapshot {
            id: self.id,
            timestamp: Utc::now(),
            requests: self.requests(),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            cache_hit_rate: self.cache_hit_rate(),
            provider_calls: self.provider_calls(),
            provider_results: self.provider_results.load(Ordering::Relaxed),
            degraded_calls: self.degraded_calls(),
            degraded_rate: self.degraded_rate(),
            degraded_by_category,
            latency_avg: self.avg_latency(),
            latency_p50: self.latency_p50(),
            latency_p95: self.latency_p95(),
            latency_p99: self.latency_p99(),
        }
    }

    /// Resumo formatado
    pub fn summary(&self) -> String {
        format!(
            "EnrichmentMetrics [{}]\n\
             Requests: {}\n\
             Cache: {:.1}% hit rate ({} hits, {} misses)\n\
             Providers: {} calls, {} degraded ({:.1}%)\n\
             Latency: avg={:.0}ms, p50={}ms, p95={}ms, p99={}ms",
            &self.id.to_string()[..8],
            self.requests(),
            self.cache_hit_rate() * 100.0,
            self.cache_hits.load(Ordering::Relaxed),
            self.cache_misses.load(Ordering::Relaxed),
            self.provider_calls(),
            self.degraded_calls(),
            self.degraded_rate() * 100.0,
            self.avg_latency(),
            self.latency_p50(),
            self.latency_p95(),
            self.latency_p99()
        )
    }
}

/// Snapshot imutável das métricas em um ponto no tempo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: f64,
    pub provider_calls: u64,
    pub provider_results: u64,
    pub degraded_calls: u64,
    pub degraded_rate: f64,
    /// Só categorias com ao menos uma degradação
    pub degraded_by_category: BTreeMap<String, u64>,
    pub latency_avg: f64,
    pub latency_p50: u64,
    pub latency_p95: u64,
    pub latency_p99: u64,
}

/// Coletor de métricas (thread-safe, clonável)
///
/// Implementa `EnrichmentObserver`; passe um clone ao orquestrador e leia
/// as métricas pelo original.
///
/// # Exemplo
///
/// ```rust,ignore
/// let collector = MetricsCollector::new();
/// let enricher = ProfileEnricher::new(config, providers, cache, Arc::new(collector.clone()));
/// enricher.enrich(&subject, "customer-42").await?;
/// println!("{}", collector.metrics().summary());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    metrics: Arc<EnrichmentMetrics>,
}

impl MetricsCollector {
    /// Cria um novo coletor
    pub fn new() -> Self {
        Self::default()
    }

    /// Referência às métricas
    pub fn metrics(&self) -> &EnrichmentMetrics {
        &self.metrics
    }

    /// Snapshot atual
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Resumo formatado
    pub fn summary(&self) -> String {
        self.metrics.summary()
    }
}

impl EnrichmentObserver for MetricsCollector {
    fn on_cache_hit(&self, _cache_key: &str) {
        self.metrics.record_cache_hit();
    }

    fn on_cache_miss(&self, _cache_key: &str) {
        self.metrics.record_cache_miss();
    }

    fn on_provider_call(&self, _category: ProviderCategory, _latency: Duration, result_count: usize) {
        self.metrics.record_provider_call(result_count);
    }

    fn on_provider_degraded(&self, category: ProviderCategory, _error: &ProviderError) {
        self.metrics.record_degraded(category);
    }

    fn on_request_complete(&self, report: &EnrichmentReport) {
        self.metrics.record_request(report.latency_ms);
    }
}
