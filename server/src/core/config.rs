use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CORPUS_TIMEOUT_SECS,
    DEFAULT_CORPUS_URL, DEFAULT_HOST, DEFAULT_PORT, POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS, POSTGRES_DEFAULT_MAX_CONNECTIONS,
    POSTGRES_DEFAULT_MAX_LIFETIME_SECS, POSTGRES_DEFAULT_MIN_CONNECTIONS,
    POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
};

// =============================================================================
// Store Backend Enum (SQLite or PostgreSQL)
// =============================================================================

/// Durable document store backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Postgres,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Sqlite => write!(f, "sqlite"),
            StoreBackend::Postgres => write!(f, "postgres"),
        }
    }
}

// =============================================================================
// Cache Backend Enum
// =============================================================================

/// Cache backend type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendType {
    #[default]
    Memory,
    Redis,
}

impl fmt::Display for CacheBackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheBackendType::Memory => write!(f, "memory"),
            CacheBackendType::Redis => write!(f, "redis"),
        }
    }
}

// =============================================================================
// Eviction Policy Enum
// =============================================================================

/// Cache eviction policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// TinyLFU - LRU eviction + LFU admission (near-optimal hit ratio)
    #[default]
    TinyLfu,
    /// Simple LRU (better for recency-biased workloads)
    Lru,
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::TinyLfu => write!(f, "tinylfu"),
            EvictionPolicy::Lru => write!(f, "lru"),
        }
    }
}

// =============================================================================
// File Config (JSON)
// =============================================================================

/// Server configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Redis cache configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RedisFileConfig {
    /// Connection URL for Redis-compatible backends
    pub url: Option<String>,
}

/// Memory cache configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MemoryCacheFileConfig {
    /// Maximum number of cache entries
    pub max_entries: Option<u64>,
    /// Cache eviction policy
    pub eviction_policy: Option<EvictionPolicy>,
}

/// PostgreSQL configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PostgresFileConfig {
    /// PostgreSQL connection URL (or use TYPEAHEAD_POSTGRES_URL env var)
    pub url: Option<String>,
    /// Maximum number of connections in the pool (default: 20)
    pub max_connections: Option<u32>,
    /// Minimum number of connections to keep warm (default: 2)
    pub min_connections: Option<u32>,
    /// Connection acquire timeout in seconds (default: 30)
    pub acquire_timeout_secs: Option<u64>,
    /// Idle connection timeout in seconds (default: 600)
    pub idle_timeout_secs: Option<u64>,
    /// Max connection lifetime in seconds (default: 1800)
    pub max_lifetime_secs: Option<u64>,
    /// Statement timeout in seconds, 0 to disable (default: 60)
    pub statement_timeout_secs: Option<u64>,
}

/// Database configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    /// Document store backend: sqlite (default) or postgres
    pub store: Option<StoreBackend>,
    /// Cache backend: memory (default) or redis
    pub cache: Option<CacheBackendType>,
    /// PostgreSQL-specific configuration
    pub postgres: Option<PostgresFileConfig>,
    /// Redis cache configuration
    pub redis: Option<RedisFileConfig>,
    /// Memory cache configuration
    pub memory_cache: Option<MemoryCacheFileConfig>,
}

/// Corpus supplier configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CorpusFileConfig {
    /// Endpoint returning the aggregated query list
    pub url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Local JSON file used instead of the endpoint
    pub file: Option<String>,
}

/// Scheduled rebuild section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BuildFileConfig {
    /// Seconds between rebuilds while serving; absent or 0 disables them
    pub interval_secs: Option<u64>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub corpus: Option<CorpusFileConfig>,
    pub build: Option<BuildFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Top-level keys that did not match any known section
    fn unknown_fields(&self) -> Vec<&str> {
        match &self.extra {
            serde_json::Value::Object(map) => map.keys().map(|k| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        let unknown = self.unknown_fields();
        if !unknown.is_empty() {
            tracing::warn!(
                fields = %unknown.join(", "),
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        // Server
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        // Database
        if let Some(database) = other.database {
            let current = self
                .database
                .get_or_insert_with(DatabaseFileConfig::default);
            if database.store.is_some() {
                tracing::trace!(store = ?database.store, "Merging database.store");
                current.store = database.store;
            }
            if database.cache.is_some() {
                tracing::trace!(cache = ?database.cache, "Merging database.cache");
                current.cache = database.cache;
            }
            if let Some(pg) = database.postgres {
                let current_pg = current
                    .postgres
                    .get_or_insert_with(PostgresFileConfig::default);
                if pg.url.is_some() {
                    tracing::trace!("Merging database.postgres.url");
                    current_pg.url = pg.url;
                }
                if pg.max_connections.is_some() {
                    current_pg.max_connections = pg.max_connections;
                }
                if pg.min_connections.is_some() {
                    current_pg.min_connections = pg.min_connections;
                }
                if pg.acquire_timeout_secs.is_some() {
                    current_pg.acquire_timeout_secs = pg.acquire_timeout_secs;
                }
                if pg.idle_timeout_secs.is_some() {
                    current_pg.idle_timeout_secs = pg.idle_timeout_secs;
                }
                if pg.max_lifetime_secs.is_some() {
                    current_pg.max_lifetime_secs = pg.max_lifetime_secs;
                }
                if pg.statement_timeout_secs.is_some() {
                    current_pg.statement_timeout_secs = pg.statement_timeout_secs;
                }
            }
            if let Some(redis) = database.redis {
                let current_redis = current.redis.get_or_insert_with(RedisFileConfig::default);
                if redis.url.is_some() {
                    tracing::trace!("Merging database.redis.url");
                    current_redis.url = redis.url;
                }
            }
            if let Some(memory) = database.memory_cache {
                let current_memory = current
                    .memory_cache
                    .get_or_insert_with(MemoryCacheFileConfig::default);
                if memory.max_entries.is_some() {
                    tracing::trace!(
                        max_entries = ?memory.max_entries,
                        "Merging database.memory_cache.max_entries"
                    );
                    current_memory.max_entries = memory.max_entries;
                }
                if memory.eviction_policy.is_some() {
                    current_memory.eviction_policy = memory.eviction_policy;
                }
            }
        }

        // Corpus
        if let Some(corpus) = other.corpus {
            let current = self.corpus.get_or_insert_with(CorpusFileConfig::default);
            if corpus.url.is_some() {
                tracing::trace!(url = ?corpus.url, "Merging corpus.url");
                current.url = corpus.url;
            }
            if corpus.timeout_secs.is_some() {
                tracing::trace!(
                    timeout_secs = ?corpus.timeout_secs,
                    "Merging corpus.timeout_secs"
                );
                current.timeout_secs = corpus.timeout_secs;
            }
            if corpus.file.is_some() {
                tracing::trace!(file = ?corpus.file, "Merging corpus.file");
                current.file = corpus.file;
            }
        }

        // Build
        if let Some(build) = other.build {
            let current = self.build.get_or_insert_with(BuildFileConfig::default);
            if build.interval_secs.is_some() {
                tracing::trace!(
                    interval_secs = ?build.interval_secs,
                    "Merging build.interval_secs"
                );
                current.interval_secs = build.interval_secs;
            }
        }
    }
}

// =============================================================================
// Runtime Config
// =============================================================================

/// Server configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Redis cache configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Connection URL for Redis-compatible backends
    pub url: String,
}

/// Memory cache configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct MemoryCacheConfig {
    /// Maximum number of cache entries
    pub max_entries: u64,
    /// Cache eviction policy
    pub eviction_policy: EvictionPolicy,
}

/// Cache configuration (used internally by CacheService)
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Cache backend type
    pub backend: CacheBackendType,
    /// Maximum entries (memory backend)
    pub max_entries: u64,
    /// Eviction policy (memory backend)
    pub eviction_policy: EvictionPolicy,
    /// Redis URL (redis backend)
    pub redis_url: Option<String>,
}

/// PostgreSQL configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to keep warm
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,
    /// Max connection lifetime in seconds
    pub max_lifetime_secs: u64,
    /// Statement timeout in seconds (0 = disabled)
    pub statement_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: POSTGRES_DEFAULT_MAX_CONNECTIONS,
            min_connections: POSTGRES_DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS,
            idle_timeout_secs: POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
            max_lifetime_secs: POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
            statement_timeout_secs: POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
        }
    }
}

/// Database configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Document store backend: sqlite (default) or postgres
    pub store: StoreBackend,
    /// Cache backend: memory (default) or redis
    pub cache: CacheBackendType,
    /// PostgreSQL-specific configuration (only used if store = postgres)
    pub postgres: Option<PostgresConfig>,
    /// Redis cache configuration (only used if cache = redis)
    pub redis: Option<RedisConfig>,
    /// Memory cache configuration
    pub memory_cache: MemoryCacheConfig,
}

impl DatabaseConfig {
    /// Build a CacheConfig for use by CacheService
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            backend: self.cache,
            max_entries: self.memory_cache.max_entries,
            eviction_policy: self.memory_cache.eviction_policy,
            redis_url: self.redis.as_ref().map(|r| r.url.clone()),
        }
    }
}

/// Corpus supplier configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// Endpoint returning the aggregated query list
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Local JSON file; when set it replaces the endpoint
    pub file: Option<PathBuf>,
}

/// Scheduled rebuild configuration (final/runtime)
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    /// Period of the background rebuild; `None` when disabled
    pub interval: Option<Duration>,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub corpus: CorpusConfig,
    pub build: BuildConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.typeahead/typeahead.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::resolve(cli, file_config);
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            store_backend = %config.database.store,
            cache_backend = %config.database.cache,
            cache_max_entries = config.database.memory_cache.max_entries,
            corpus_url = %config.corpus.url,
            corpus_file = ?config.corpus.file,
            build_interval = ?config.build.interval,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Layer defaults, merged file config and CLI/env overrides
    fn resolve(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_corpus = file_config.corpus.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let store = cli
            .store_backend
            .or(file_database.store)
            .unwrap_or_default();
        let cache = cli
            .cache_backend
            .or(file_database.cache)
            .unwrap_or_default();

        let file_memory_cache = file_database.memory_cache.unwrap_or_default();
        let memory_cache = MemoryCacheConfig {
            max_entries: cli
                .cache_max_entries
                .or(file_memory_cache.max_entries)
                .unwrap_or(DEFAULT_CACHE_MAX_ENTRIES),
            eviction_policy: cli
                .cache_eviction_policy
                .or(file_memory_cache.eviction_policy)
                .unwrap_or_default(),
        };

        // Redis config (only populated if using redis backend)
        let redis = (cache == CacheBackendType::Redis).then(|| {
            let file_redis = file_database.redis.unwrap_or_default();
            RedisConfig {
                url: cli
                    .cache_redis_url
                    .clone()
                    .or(file_redis.url)
                    .unwrap_or_default(),
            }
        });

        // PostgreSQL config (only populated if using postgres backend)
        let postgres = (store == StoreBackend::Postgres).then(|| {
            let file_pg = file_database.postgres.unwrap_or_default();
            let defaults = PostgresConfig::default();
            PostgresConfig {
                url: cli
                    .postgres_url
                    .clone()
                    .or(file_pg.url)
                    .unwrap_or_default(),
                max_connections: file_pg.max_connections.unwrap_or(defaults.max_connections),
                min_connections: file_pg.min_connections.unwrap_or(defaults.min_connections),
                acquire_timeout_secs: file_pg
                    .acquire_timeout_secs
                    .unwrap_or(defaults.acquire_timeout_secs),
                idle_timeout_secs: file_pg
                    .idle_timeout_secs
                    .unwrap_or(defaults.idle_timeout_secs),
                max_lifetime_secs: file_pg
                    .max_lifetime_secs
                    .unwrap_or(defaults.max_lifetime_secs),
                statement_timeout_secs: file_pg
                    .statement_timeout_secs
                    .unwrap_or(defaults.statement_timeout_secs),
            }
        });

        let corpus = CorpusConfig {
            url: cli
                .corpus_url
                .clone()
                .or(file_corpus.url)
                .unwrap_or_else(|| DEFAULT_CORPUS_URL.to_string()),
            timeout_secs: cli
                .corpus_timeout_secs
                .or(file_corpus.timeout_secs)
                .unwrap_or(DEFAULT_CORPUS_TIMEOUT_SECS),
            file: cli
                .corpus_file
                .clone()
                .or_else(|| file_corpus.file.map(|f| expand_path(&f))),
        };

        let build = BuildConfig {
            interval: cli
                .build_interval_secs
                .or(file_config.build.and_then(|b| b.interval_secs))
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        };

        Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                store,
                cache,
                postgres,
                redis,
                memory_cache,
            },
            corpus,
            build,
        }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would bind a random port
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.database.cache == CacheBackendType::Redis
            && self
                .database
                .redis
                .as_ref()
                .is_none_or(|r| r.url.is_empty())
        {
            anyhow::bail!(
                "Configuration error: database.redis.url is required when database.cache is 'redis'"
            );
        }

        if self.database.store == StoreBackend::Postgres
            && self
                .database
                .postgres
                .as_ref()
                .is_none_or(|pg| pg.url.is_empty())
        {
            anyhow::bail!(
                "Configuration error: database.postgres.url is required when database.store is 'postgres'. \
                 Set via TYPEAHEAD_POSTGRES_URL env var or database.postgres.url in config file."
            );
        }

        if self.database.memory_cache.max_entries == 0 {
            anyhow::bail!(
                "Configuration error: database.memory_cache.max_entries must be greater than 0"
            );
        }

        if self.corpus.file.is_none() && self.corpus.url.is_empty() {
            anyhow::bail!("Configuration error: corpus.url or corpus.file is required");
        }

        if self.corpus.timeout_secs == 0 {
            anyhow::bail!("Configuration error: corpus.timeout_secs must be greater than 0");
        }

        Ok(())
    }
}

/// Get the profile config path (~/.typeahead/typeahead.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> FileConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_backend_serde_and_display() {
        let store: StoreBackend = serde_json::from_str(r#""postgres""#).unwrap();
        assert_eq!(store, StoreBackend::Postgres);
        assert_eq!(store.to_string(), "postgres");

        let policy: EvictionPolicy = serde_json::from_str(r#""tinylfu""#).unwrap();
        assert_eq!(policy, EvictionPolicy::TinyLfu);
        assert_eq!(CacheBackendType::Redis.to_string(), "redis");
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::resolve(&CliConfig::default(), FileConfig::default());
        config.validate().unwrap();

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.database.store, StoreBackend::Sqlite);
        assert_eq!(config.database.cache, CacheBackendType::Memory);
        assert_eq!(config.database.memory_cache.max_entries, 100_000);
        assert!(config.database.postgres.is_none());
        assert!(config.database.redis.is_none());
        assert_eq!(config.corpus.url, DEFAULT_CORPUS_URL);
        assert_eq!(config.corpus.timeout_secs, 30);
        assert!(config.corpus.file.is_none());
    }

    #[test]
    fn test_file_config_parse_full() {
        let file = parse(
            r#"{
                "server": { "host": "0.0.0.0", "port": 9100 },
                "database": {
                    "store": "postgres",
                    "cache": "redis",
                    "postgres": { "url": "postgres://localhost/typeahead", "max_connections": 8 },
                    "redis": { "url": "redis://localhost:6379/0" },
                    "memory_cache": { "max_entries": 500, "eviction_policy": "lru" }
                },
                "corpus": { "url": "http://aggregator:8090/aggregate/data", "timeout_secs": 5 }
            }"#,
        );
        let config = AppConfig::resolve(&CliConfig::default(), file);
        config.validate().unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9100);
        let pg = config.database.postgres.as_ref().unwrap();
        assert_eq!(pg.url, "postgres://localhost/typeahead");
        assert_eq!(pg.max_connections, 8);
        assert_eq!(pg.min_connections, POSTGRES_DEFAULT_MIN_CONNECTIONS);
        let cache = config.database.cache_config();
        assert_eq!(cache.backend, CacheBackendType::Redis);
        assert_eq!(cache.redis_url.as_deref(), Some("redis://localhost:6379/0"));
        assert_eq!(cache.max_entries, 500);
        assert_eq!(cache.eviction_policy, EvictionPolicy::Lru);
        assert_eq!(config.corpus.url, "http://aggregator:8090/aggregate/data");
        assert_eq!(config.corpus.timeout_secs, 5);
    }

    #[test]
    fn test_build_interval() {
        let config = AppConfig::resolve(&CliConfig::default(), FileConfig::default());
        assert!(config.build.interval.is_none());

        let file = parse(r#"{ "build": { "interval_secs": 604800 } }"#);
        let config = AppConfig::resolve(&CliConfig::default(), file);
        assert_eq!(config.build.interval, Some(Duration::from_secs(604_800)));

        let file = parse(r#"{ "build": { "interval_secs": 3600 } }"#);
        let cli = CliConfig {
            build_interval_secs: Some(0),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&cli, file).build.interval.is_none());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = parse(r#"{ "server": { "port": 9000 }, "corpus": { "timeout_secs": 5 } }"#);
        let cli = CliConfig {
            port: Some(9999),
            corpus_file: Some(PathBuf::from("/tmp/corpus.json")),
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli, file);

        assert_eq!(config.server.port, 9999);
        assert_eq!(config.corpus.timeout_secs, 5);
        assert_eq!(config.corpus.file, Some(PathBuf::from("/tmp/corpus.json")));
    }

    #[test]
    fn test_merge_later_file_wins() {
        let mut base = parse(
            r#"{ "server": { "host": "10.0.0.1", "port": 9000 }, "database": { "memory_cache": { "max_entries": 10 } } }"#,
        );
        base.merge(parse(
            r#"{ "server": { "port": 9001 }, "database": { "memory_cache": { "eviction_policy": "lru" } } }"#,
        ));

        let server = base.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("10.0.0.1"));
        assert_eq!(server.port, Some(9001));
        let memory = base
            .database
            .as_ref()
            .unwrap()
            .memory_cache
            .as_ref()
            .unwrap();
        assert_eq!(memory.max_entries, Some(10));
        assert_eq!(memory.eviction_policy, Some(EvictionPolicy::Lru));
    }

    #[test]
    fn test_unknown_fields_collected() {
        let file = parse(r#"{ "server": { "port": 1 }, "sever": {}, "debug": true }"#);
        let mut unknown = file.unknown_fields();
        unknown.sort();
        assert_eq!(unknown, ["debug", "sever"]);
    }

    #[test]
    fn test_redis_requires_url() {
        let cli = CliConfig {
            cache_backend: Some(CacheBackendType::Redis),
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli, FileConfig::default());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("database.redis.url is required"));
    }

    #[test]
    fn test_postgres_requires_url() {
        let cli = CliConfig {
            store_backend: Some(StoreBackend::Postgres),
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli, FileConfig::default());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("database.postgres.url is required"));
    }

    #[test]
    fn test_zero_port_rejected() {
        let cli = CliConfig {
            port: Some(0),
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli, FileConfig::default());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typeahead.json");
        fs::write(&path, r#"{ "server": { "port": 8123 } }"#).unwrap();

        let file = FileConfig::load_from_file(&path).unwrap();
        assert_eq!(file.server.unwrap().port, Some(8123));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typeahead.json");
        fs::write(&path, "{ not json").unwrap();

        let err = FileConfig::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
