// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CACHE DE PERFIS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Cache-aside dos perfis enriquecidos, com TTL fixo.
// Semântica de key-value remoto (GET / SETEX); as duas operações são
// fail-soft: store indisponível vira miss na leitura e no-op na escrita.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::config::EnrichmentConfig;
use crate::types::EnrichedProfile;

/// Capacidade padrão do store em memória
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Erros do store de cache (nunca chegam ao chamador do enriquecimento)
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum CacheError {
    #[error("Cache store unavailable: {0}")]
    Unavailable(String),

    #[error("Cache serialization error: {0}")]
    Serialization(String),
}

/// Store key-value com expiração
///
/// Operações de chave única; nenhuma transação entre chaves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// GET key
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// SETEX key ttl value
    async fn set_ex(&self, key: &str, ttl_secs: u64, value: String) -> Result<(), CacheError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// STORE EM MEMÓRIA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Entrada do cache
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Valor serializado
    pub value: String,
    /// Timestamp de criação
    pub created_at: DateTime<Utc>,
    /// Timestamp de expiração
    pub expires_at: DateTime<Utc>,
    /// Número de leituras com hit
    pub hit_count: u64,
    /// Último acesso
    pub last_accessed: DateTime<Utc>,
}

impl CacheEntry {
    /// Cria nova entrada com TTL em segundos
    pub fn new(value: String, ttl_secs: u64) -> Self {
        let now = Utc::now();
        Self {
            value,
            created_at: now,
            expires_at: now + ChronoDuration::seconds(ttl_secs.min(i64::MAX as u64) as i64),
            hit_count: 0,
            last_accessed: now,
        }
    }

    /// TTL zero expira imediatamente
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Marca como acessado
    pub fn touch(&mut self) {
        self.hit_count += 1;
        self.last_accessed = Utc::now();
    }
}

/// Store thread-safe em memória com TTL e limite de entradas
///
/// Padrão quando nenhum cache remoto está configurado. Ao atingir o
/// limite, remove a entrada acessada há mais tempo.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    max_entries: usize,
    evictions: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }
}

impl MemoryStore {
    /// Cria store com capacidade padrão
    pub fn new() -> Self {
        Self::default()
    }

    /// Cria store com capacidade máxima
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
            evictions: AtomicU64::new(0),
        }
    }

    /// Número de entradas (inclui expiradas ainda não removidas)
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Verifica se está vazio
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entradas removidas por expiração ou capacidade
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Remove entradas expiradas
    pub fn cleanup(&self) -> usize {
        let mut removed = 0;
        if let Ok(mut entries) = self.entries.write() {
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired());
            removed = before - entries.len();
        }
        self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    fn evict_oldest(&self, entries: &mut HashMap<String, CacheEntry>) {
        if let Some(oldest_key) = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(key, _)| key.clone())
        {
            entries.remove(&oldest_key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }
}

fn poisoned() -> CacheError {
    CacheError::Unavailable("memory store lock poisoned".into())
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;

        let expired = match entries.get_mut(key) {
            Some(entry) if !entry.is_expired() => {
                entry.touch();
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        Ok(None)
    }

    async fn set_ex(&self, key: &str, ttl_secs: u64, value: String) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;

        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            self.evict_oldest(&mut entries);
        }
        entries.insert(key.to_string(), CacheEntry::new(value, ttl_secs));
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// STORE REDIS (feature "redis")
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Store Redis sobre um `ConnectionManager` (reconecta sozinho)
#[cfg(feature = "redis")]
#[derive(Clone)]
pub struct RedisStore {
    manager: redis::aio::ConnectionManager,
}

#[cfg(feature = "redis")]
impl RedisStore {
    /// Conecta ao Redis (ex: "redis://localhost:6379")
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(|e| CacheError::Unavailable(e.to_string()))?;
        let manager = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
        Ok(Self { manager })
    }
}

#[cfg(feature = "redis")]
#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        use redis::AsyncCommands;

        let mut conn = self.manager.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }

    async fn set_ex(&self, key: &str, ttl_secs: u64, value: String) -> Result<(), CacheError> {
        use redis::AsyncCommands;

        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }
}

#[cfg(feature = "redis")]
async fn remote_store(config: &EnrichmentConfig) -> Option<Arc<dyn CacheStore>> {
    let url = config.cache_url.as_deref()?;
    match RedisStore::connect(url).await {
        Ok(store) => {
            log::info!("🗄️ Cache Redis conectado");
            Some(Arc::new(store))
        }
        Err(e) => {
            log::warn!("⚠️ Redis indisponível, usando cache em memória: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn remote_store(config: &EnrichmentConfig) -> Option<Arc<dyn CacheStore>> {
    if config.cache_url.is_some() {
        log::warn!("⚠️ REDIS_URL definida mas o crate foi compilado sem a feature 'redis'");
    }
    None
}

/// Escolhe o store a partir da configuração
///
/// Com a feature `redis` e `cache_url` definida, tenta o Redis; falha de
/// conexão cai para o store em memória.
pub async fn store_from_config(config: &EnrichmentConfig) -> Arc<dyn CacheStore> {
    match remote_store(config).await {
        Some(store) => store,
        None => Arc::new(MemoryStore::new()),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FACHADA FAIL-SOFT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Estatísticas do cache de perfis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Total de hits
    pub hits: u64,
    /// Total de misses (inclui leituras com store indisponível)
    pub misses: u64,
    /// Operações que falharam no store
    pub failures: u64,
    /// Taxa de hit (0.0 - 1.0)
    pub hit_rate: f64,
}

/// Cache de perfis enriquecidos
///
/// # Exemplo
///
/// ```rust,ignore
/// let cache = ProfileCache::new(Arc::new(MemoryStore::new()), "profile_enrichment:", 86_400);
///
/// cache.set("customer-42", &profile).await;
/// if let Some(cached) = cache.get("customer-42").await {
///     println!("Cache hit!");
/// }
/// ```
pub struct ProfileCache {
    store: Arc<dyn CacheStore>,
    prefix: String,
    ttl_secs: u64,
    hits: AtomicU64,
    misses: AtomicU64,
    failures: AtomicU64,
}

impl ProfileCache {
    /// Cria cache sobre um store
    pub fn new(store: Arc<dyn CacheStore>, prefix: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            ttl_secs,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Cria cache com prefixo e TTL da configuração
    pub fn from_config(store: Arc<dyn CacheStore>, config: &EnrichmentConfig) -> Self {
        Self::new(store, config.cache_prefix.clone(), config.cache_ttl_secs)
    }

    /// Cache em memória com prefixo e TTL da configuração
    pub fn in_memory(config: &EnrichmentConfig) -> Self {
        Self::from_config(Arc::new(MemoryStore::new()), config)
    }

    /// Chave completa no store
    pub fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// TTL das escritas
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Lê um perfil; qualquer falha vira ausência
    pub async fn get(&self, key: &str) -> Option<EnrichedProfile> {
        let full_key = self.full_key(key);

        let raw = match self.store.get(&full_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                log::warn!("⚠️ Cache GET falhou para '{}': {}", full_key, e);
                return None;
            }
        };

        match serde_json::from_str::<EnrichedProfile>(&raw) {
            Ok(profile) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(profile)
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                log::warn!(
                    "⚠️ Entrada de cache ilegível para '{}': {}",
                    full_key,
                    CacheError::Serialization(e.to_string())
                );
                None
            }
        }
    }

    /// Grava um perfil com o TTL configurado; falhas só são logadas
    pub async fn set(&self, key: &str, profile: &EnrichedProfile) {
        let full_key = self.full_key(key);

        let raw = match serde_json::to_string(profile) {
            Ok(raw) => raw,
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                log::warn!("⚠️ Falha ao serializar perfil para cache: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set_ex(&full_key, self.ttl_secs, raw).await {
            self.failures.fetch_add(1, Ordering::Relaxed);
            log::warn!("⚠️ Cache SETEX falhou para '{}': {}", full_key, e);
        }
    }

    /// Estatísticas acumuladas
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheStats {
            hits,
            misses,
            failures: self.failures.load(Ordering::Relaxed),
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    /// Resumo formatado
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "ProfileCache: {:.1}% hit rate ({} hits, {} misses) | {} failures | TTL: {}s",
            stats.hit_rate * 100.0,
            stats.hits,
            stats.misses,
            stats.failures,
            self.ttl_secs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::{always, eq, function};

    fn profile(name: &str) -> EnrichedProfile {
        let mut profile = EnrichedProfile::empty(name);
        profile.professional.skills.push("rust".into());
        profile
    }

    #[tokio::test]
    async fn test_memory_store_get_set() {
        let store = MemoryStore::new();
        store.set_ex("k", 60, "v".into()).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(store.get("missing").await.unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_zero_ttl_expires() {
        let store = MemoryStore::new();
        store.set_ex("k", 0, "v".into()).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty());
        assert_eq!(store.evictions(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_evicts_oldest_at_capacity() {
        let store = MemoryStore::with_capacity(2);
        store.set_ex("a", 60, "1".into()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        store.set_ex("b", 60, "2".into()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        store.get("a").await.unwrap();
        store.set_ex("c", 60, "3".into()).await.unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.get("b").await.unwrap().is_none());
        assert!(store.get("a").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_memory_store_cleanup() {
        let store = MemoryStore::new();
        store.set_ex("old", 0, "x".into()).await.unwrap();
        store.set_ex("new", 60, "y".into()).await.unwrap();

        assert_eq!(store.cleanup(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_profile_cache_roundtrip_with_prefix() {
        let store = Arc::new(MemoryStore::new());
        let cache = ProfileCache::new(store.clone(), "profile_enrichment:", 86_400);

        assert!(cache.get("ada").await.is_none());
        cache.set("ada", &profile("Ada")).await;

        assert!(store.get("profile_enrichment:ada").await.unwrap().is_some());
        assert_eq!(cache.get("ada").await, Some(profile("Ada")));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[tokio::test]
    async fn test_set_uses_configured_ttl() {
        let mut store = MockCacheStore::new();
        store
            .expect_set_ex()
            .with(function(|key: &str| key == "p:ada"), eq(86_400u64), always())
            .times(1)
            .returning(|_, _, _| Ok(()));

        let cache = ProfileCache::new(Arc::new(store), "p:", 86_400);
        cache.set("ada", &profile("Ada")).await;
        assert_eq!(cache.stats().failures, 0);
    }

    #[tokio::test]
    async fn test_unavailable_store_is_fail_soft() {
        let mut store = MockCacheStore::new();
        store
            .expect_get()
            .returning(|_| Err(CacheError::Unavailable("connection refused".into())));
        store
            .expect_set_ex()
            .returning(|_, _, _| Err(CacheError::Unavailable("connection refused".into())));

        let cache = ProfileCache::new(Arc::new(store), "p:", 60);
        assert!(cache.get("ada").await.is_none());
        cache.set("ada", &profile("Ada")).await;

        let stats = cache.stats();
        assert_eq!(stats.failures, 2);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let mut store = MockCacheStore::new();
        store
            .expect_get()
            .returning(|_| Ok(Some("{not json".to_string())));

        let cache = ProfileCache::new(Arc::new(store), "p:", 60);
        assert!(cache.get("ada").await.is_none());
        assert_eq!(cache.stats().failures, 1);
    }

    #[tokio::test]
    async fn test_store_from_config_defaults_to_memory() {
        let store = store_from_config(&EnrichmentConfig::default()).await;
        store.set_ex("k", 60, "v".into()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
    }
}
