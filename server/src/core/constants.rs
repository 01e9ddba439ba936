// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Typeahead";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "typeahead";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".typeahead";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "typeahead.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TYPEAHEAD_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "TYPEAHEAD_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "TYPEAHEAD_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TYPEAHEAD_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8100;

/// Default log filter when neither TYPEAHEAD_LOG nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "info,typeahead=info";

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "TYPEAHEAD_DATA_DIR";

/// Environment variable for document store backend (sqlite or postgres)
pub const ENV_STORE_BACKEND: &str = "TYPEAHEAD_STORE_BACKEND";

/// Environment variable for PostgreSQL connection URL
pub const ENV_POSTGRES_URL: &str = "TYPEAHEAD_POSTGRES_URL";

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "typeahead.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL auto-checkpoint threshold (pages, ~4MB at 1000)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// PostgreSQL Database
// =============================================================================

/// PostgreSQL default max connections
pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL default min connections (keep warm for low latency)
pub const POSTGRES_DEFAULT_MIN_CONNECTIONS: u32 = 2;

/// PostgreSQL default connection acquire timeout in seconds
pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// PostgreSQL idle connection timeout in seconds
pub const POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// PostgreSQL max connection lifetime in seconds
pub const POSTGRES_DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// PostgreSQL statement timeout in seconds (0 = disabled)
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

/// Interval between background PostgreSQL pool health checks
pub const POSTGRES_HEALTH_CHECK_INTERVAL_SECS: u64 = 60;

// =============================================================================
// Cache
// =============================================================================

/// Environment variable for cache backend
pub const ENV_CACHE_BACKEND: &str = "TYPEAHEAD_CACHE_BACKEND";

/// Environment variable for cache max entries
pub const ENV_CACHE_MAX_ENTRIES: &str = "TYPEAHEAD_CACHE_MAX_ENTRIES";

/// Environment variable for cache eviction policy
pub const ENV_CACHE_EVICTION_POLICY: &str = "TYPEAHEAD_CACHE_EVICTION_POLICY";

/// Environment variable for Redis-compatible cache URL
pub const ENV_CACHE_REDIS_URL: &str = "TYPEAHEAD_CACHE_REDIS_URL";

/// Default cache max entries
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 100_000;

/// Cache key version (bump on encoding changes to invalidate all cached data)
pub const CACHE_KEY_VERSION: &str = "v1";

// =============================================================================
// Suggestions
// =============================================================================

/// Maximum number of suggestions retained per prefix
pub const MAX_SUGGESTIONS: usize = 6;

/// Lifetime of a cached suggestion list, including empty results (1 hour)
pub const SUGGESTION_CACHE_TTL_SECS: u64 = 3600;

/// Longest prefix accepted by the suggest endpoint, in characters
pub const MAX_PREFIX_CHARS: u64 = 256;

// =============================================================================
// Corpus Supplier
// =============================================================================

/// Environment variable for the corpus endpoint URL
pub const ENV_CORPUS_URL: &str = "TYPEAHEAD_CORPUS_URL";

/// Environment variable for a local corpus file (takes precedence over the URL)
pub const ENV_CORPUS_FILE: &str = "TYPEAHEAD_CORPUS_FILE";

/// Environment variable for the corpus request timeout
pub const ENV_CORPUS_TIMEOUT_SECS: &str = "TYPEAHEAD_CORPUS_TIMEOUT_SECS";

/// Default corpus endpoint (aggregator service)
pub const DEFAULT_CORPUS_URL: &str = "http://localhost:8090/aggregate/data";

/// Default corpus request timeout in seconds
pub const DEFAULT_CORPUS_TIMEOUT_SECS: u64 = 30;

/// Longest query accepted from the corpus, in characters
///
/// Matches the longest servable prefix; deeper trie nodes could never be read.
pub const MAX_QUERY_CHARS: usize = MAX_PREFIX_CHARS as usize;

// =============================================================================
// Scheduled Rebuild
// =============================================================================

/// Environment variable for the background rebuild period
pub const ENV_BUILD_INTERVAL_SECS: &str = "TYPEAHEAD_BUILD_INTERVAL_SECS";

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default body limit for API requests (64 KB)
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
