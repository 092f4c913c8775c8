//! Single source of truth for every tunable named in the design. Each
//! constant here corresponds to exactly one field in `SefsConfig`.

// --- Watcher ---
pub const DEFAULT_DEBOUNCE_MS: u64 = 1_500;

// --- Recluster scheduler ---
pub const DEFAULT_RECLUSTER_DEBOUNCE_MS: u64 = 2_000;
pub const DEFAULT_RECLUSTER_COOLDOWN_MS: u64 = 5_000;

// --- Sync engine ---
pub const DEFAULT_SYNC_SETTLE_MS: u64 = 2_500;
pub const DEFAULT_RECENTLY_SYNCED_TTL_MS: u64 = 5_000;
pub const DEFAULT_UNCATEGORISED_FOLDER: &str = "Uncategorised";

// --- Embedding adapter ---
pub const DEFAULT_MAX_EMBED_CHARS: usize = 20_000;
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 300;
pub const DEFAULT_SUMMARY_FALLBACK_CHARS: usize = 200;
pub const DEFAULT_LOCAL_EMBED_DIM: usize = 768;
pub const DEFAULT_REMOTE_EMBED_DIM: usize = 1_536;
pub const DEFAULT_SEARCH_EMBED_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PROVIDER_HEALTH_TIMEOUT_SECS: u64 = 8;

// --- Clusterer ---
pub const DEFAULT_MIN_FILES_FOR_CLUSTERING: usize = 3;
pub const DEFAULT_SMALL_COLLECTION_THRESHOLD: usize = 25;
pub const DEFAULT_AGGLOMERATIVE_DISTANCE_THRESHOLD: f64 = 0.52;
pub const DEFAULT_NOISE_SIMILARITY_THRESHOLD: f64 = 0.40;
pub const DEFAULT_HDBSCAN_MIN_CLUSTER_SIZE: usize = 2;
pub const DEFAULT_HDBSCAN_MIN_SAMPLES: usize = 2;
pub const DEFAULT_UMAP_MIN_DIST: f64 = 0.1;
pub const DEFAULT_UMAP_MAX_NEIGHBORS: usize = 15;
pub const DEFAULT_PROJECTION_BOUND: f64 = 400.0;
pub const DEFAULT_MAX_REPRESENTATIVE_TEXTS: usize = 5;

// --- Namer ---
pub const DEFAULT_NAME_MAX_CHARS: usize = 50;
pub const DEFAULT_NAME_KEYWORD_COUNT: usize = 3;

// --- Storage ---
pub const DEFAULT_ROOT_DB_FILENAME: &str = ".sefs.db";
pub const DEFAULT_GLOBAL_DB_FILENAME: &str = "sefs.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_RECENT_EVENTS_LIMIT: usize = 50;
pub const DEFAULT_RECENT_EVENTS_MAX: usize = 200;

// --- Observability ---
pub const DEFAULT_METRICS_RING_CAPACITY: usize = 100;
pub const DEFAULT_LOG_FORMAT: &str = "pretty";

// --- Pipeline ---
pub const DEFAULT_INCREMENTAL_BUDGET_PER_BACKGROUND_PASS: usize = 5;
