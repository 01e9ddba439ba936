use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::{CacheBackendType, EvictionPolicy, StoreBackend};
use super::constants::{
    ENV_CACHE_BACKEND, ENV_CACHE_EVICTION_POLICY, ENV_CACHE_MAX_ENTRIES, ENV_CACHE_REDIS_URL,
    ENV_BUILD_INTERVAL_SECS, ENV_CONFIG, ENV_CORPUS_FILE, ENV_CORPUS_TIMEOUT_SECS, ENV_CORPUS_URL,
    ENV_HOST, ENV_PORT, ENV_POSTGRES_URL, ENV_STORE_BACKEND,
};

#[derive(Parser)]
#[command(name = "typeahead")]
#[command(version, about = "Prefix autocomplete service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    // Store options
    /// Document store backend (sqlite or postgres)
    #[arg(long, global = true, env = ENV_STORE_BACKEND, value_parser = parse_store_backend)]
    pub store_backend: Option<StoreBackend>,

    /// PostgreSQL connection URL (when using postgres backend)
    #[arg(long, global = true, env = ENV_POSTGRES_URL)]
    pub postgres_url: Option<String>,

    // Cache options
    /// Cache backend (memory or redis)
    #[arg(long, global = true, env = ENV_CACHE_BACKEND, value_parser = parse_cache_backend_type)]
    pub cache_backend: Option<CacheBackendType>,

    /// Maximum number of cache entries
    #[arg(long, global = true, env = ENV_CACHE_MAX_ENTRIES)]
    pub cache_max_entries: Option<u64>,

    /// Cache eviction policy (tinylfu or lru)
    #[arg(long, global = true, env = ENV_CACHE_EVICTION_POLICY, value_parser = parse_eviction_policy)]
    pub cache_eviction_policy: Option<EvictionPolicy>,

    /// Redis-compatible cache URL (redis://host:port/db)
    #[arg(long, global = true, env = ENV_CACHE_REDIS_URL)]
    pub cache_redis_url: Option<String>,

    // Corpus options
    /// Corpus endpoint returning the aggregated query list
    #[arg(long, global = true, env = ENV_CORPUS_URL)]
    pub corpus_url: Option<String>,

    /// Read the corpus from a local JSON file instead of the endpoint
    #[arg(long, global = true, env = ENV_CORPUS_FILE)]
    pub corpus_file: Option<PathBuf>,

    /// Corpus request timeout in seconds
    #[arg(long, global = true, env = ENV_CORPUS_TIMEOUT_SECS)]
    pub corpus_timeout_secs: Option<u64>,

    /// Rebuild every N seconds while serving (0 disables)
    #[arg(long, global = true, env = ENV_BUILD_INTERVAL_SECS)]
    pub build_interval_secs: Option<u64>,
}

/// Parse store backend from CLI/env string
fn parse_store_backend(s: &str) -> Result<StoreBackend, String> {
    match s.to_lowercase().as_str() {
        "sqlite" => Ok(StoreBackend::Sqlite),
        "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
        _ => Err(format!(
            "Invalid store backend '{}'. Valid options: sqlite, postgres",
            s
        )),
    }
}

/// Parse cache backend type from CLI/env string
fn parse_cache_backend_type(s: &str) -> Result<CacheBackendType, String> {
    match s.to_lowercase().as_str() {
        "memory" => Ok(CacheBackendType::Memory),
        "redis" => Ok(CacheBackendType::Redis),
        _ => Err(format!(
            "Invalid cache backend '{}'. Valid options: memory, redis",
            s
        )),
    }
}

/// Parse eviction policy from CLI/env string
fn parse_eviction_policy(s: &str) -> Result<EvictionPolicy, String> {
    match s.to_lowercase().as_str() {
        "tinylfu" => Ok(EvictionPolicy::TinyLfu),
        "lru" => Ok(EvictionPolicy::Lru),
        _ => Err(format!(
            "Invalid eviction policy '{}'. Valid options: tinylfu, lru",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Serve,
    /// Fetch the corpus, rebuild every prefix document and exit
    Build,
    /// System maintenance commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum SystemCommands {
    /// Delete local data directory (SQLite store). Requires confirmation.
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub store_backend: Option<StoreBackend>,
    pub postgres_url: Option<String>,
    pub cache_backend: Option<CacheBackendType>,
    pub cache_max_entries: Option<u64>,
    pub cache_eviction_policy: Option<EvictionPolicy>,
    pub cache_redis_url: Option<String>,
    pub corpus_url: Option<String>,
    pub corpus_file: Option<PathBuf>,
    pub corpus_timeout_secs: Option<u64>,
    pub build_interval_secs: Option<u64>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            config: cli.config,
            store_backend: cli.store_backend,
            postgres_url: cli.postgres_url,
            cache_backend: cli.cache_backend,
            cache_max_entries: cli.cache_max_entries,
            cache_eviction_policy: cli.cache_eviction_policy,
            cache_redis_url: cli.cache_redis_url,
            corpus_url: cli.corpus_url,
            corpus_file: cli.corpus_file,
            corpus_timeout_secs: cli.corpus_timeout_secs,
            build_interval_secs: cli.build_interval_secs,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (cli.into(), command)
}
