use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sefs_core::errors::{SefsResult, StorageError};
use sefs_core::models::{ClusterRecord, EventRecord, EventType, FileRecord};
use sefs_core::traits::MetadataStore;
use tokio::sync::RwLock;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries;

struct RootHandle {
    pool: ConnectionPool,
    path: PathBuf,
}

/// The one `MetadataStore` implementation backing both halves of the store:
/// a global database (opened once, for the lifetime of the daemon) holding
/// settings, and a per-root database that is swapped out wholesale by
/// `switch_root`. File/cluster/event operations act on whichever per-root
/// database is currently open; settings operations always act on the global
/// database.
pub struct SqliteMetadataStore {
    global: ConnectionPool,
    root: RwLock<Option<RootHandle>>,
    read_pool_size: usize,
    busy_timeout_ms: u32,
}

impl SqliteMetadataStore {
    /// Open (creating if absent) the global settings database at `path`.
    /// No per-root store is open yet; callers must follow with
    /// `switch_root` before any file/cluster/event operation will succeed.
    pub fn open_global(
        path: &Path,
        read_pool_size: usize,
        busy_timeout_ms: u32,
    ) -> SefsResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let pool = ConnectionPool::open(path, read_pool_size, busy_timeout_ms)?;
        pool.writer
            .with_conn_sync(|conn| migrations::migrate_global(conn))?;
        Ok(Self {
            global: pool,
            root: RwLock::new(None),
            read_pool_size,
            busy_timeout_ms,
        })
    }

    pub async fn current_root_db_path(&self) -> Option<PathBuf> {
        self.root.read().await.as_ref().map(|h| h.path.clone())
    }

    async fn with_root_writer<F, T>(&self, f: F) -> SefsResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> SefsResult<T> + Send,
        T: Send,
    {
        let guard = self.root.read().await;
        let handle = guard.as_ref().ok_or(StorageError::NoActiveRoot)?;
        handle.pool.writer.with_conn(f).await
    }

    async fn with_root_reader<F, T>(&self, f: F) -> SefsResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> SefsResult<T> + Send,
        T: Send,
    {
        let guard = self.root.read().await;
        let handle = guard.as_ref().ok_or(StorageError::NoActiveRoot)?;
        handle.pool.readers.with_conn(f).await
    }
}

#[async_trait]
impl MetadataStore for SqliteMetadataStore {
    /// Close whatever per-root store is open (if any) and open/create the
    /// one inside `root_dir`. Per the data model, this is a database swap:
    /// the old connections are simply dropped.
    async fn switch_root(&self, root_dir: &Path, db_filename: &str) -> SefsResult<()> {
        std::fs::create_dir_all(root_dir)?;
        let db_path = root_dir.join(db_filename);
        let pool = ConnectionPool::open(&db_path, self.read_pool_size, self.busy_timeout_ms)?;
        pool.writer
            .with_conn_sync(|conn| migrations::migrate_root(conn))?;
        let mut guard = self.root.write().await;
        *guard = Some(RootHandle {
            pool,
            path: db_path,
        });
        Ok(())
    }

    async fn upsert_file(&self, file: &FileRecord) -> SefsResult<i64> {
        let file = file.clone();
        self.with_root_writer(move |conn| queries::files::upsert_file(conn, &file)).await
    }

    async fn get_file_by_id(&self, id: i64) -> SefsResult<Option<FileRecord>> {
        self.with_root_reader(move |conn| queries::files::get_by_id(conn, id)).await
    }

    async fn get_file_by_path(&self, original_path: &str) -> SefsResult<Option<FileRecord>> {
        let path = original_path.to_string();
        self.with_root_reader(move |conn| queries::files::get_by_path(conn, &path)).await
    }

    async fn get_file_by_current_path(&self, current_path: &str) -> SefsResult<Option<FileRecord>> {
        let path = current_path.to_string();
        self.with_root_reader(move |conn| queries::files::get_by_current_path(conn, &path)).await
    }

    async fn get_file_by_hash(&self, content_hash: &str) -> SefsResult<Option<FileRecord>> {
        let hash = content_hash.to_string();
        self.with_root_reader(move |conn| queries::files::get_by_hash(conn, &hash)).await
    }

    async fn get_all_files(&self) -> SefsResult<Vec<FileRecord>> {
        self.with_root_reader(queries::files::get_all).await
    }

    async fn update_file_paths(
        &self,
        id: i64,
        current_path: &str,
        filename: &str,
    ) -> SefsResult<()> {
        let (current_path, filename) = (current_path.to_string(), filename.to_string());
        self.with_root_writer(move |conn| {
            queries::files::update_paths(conn, id, &current_path, &filename)
        })
        .await
    }

    async fn update_file_embedding(
        &self,
        id: i64,
        embedding: &[f32],
        model_tag: &str,
    ) -> SefsResult<()> {
        let (embedding, model_tag) = (embedding.to_vec(), model_tag.to_string());
        self.with_root_writer(move |conn| {
            queries::files::update_embedding(conn, id, &embedding, &model_tag)
        })
        .await
    }

    async fn update_file_cluster(
        &self,
        id: i64,
        cluster_id: i64,
        umap_x: f64,
        umap_y: f64,
    ) -> SefsResult<()> {
        self.with_root_writer(move |conn| {
            queries::files::update_cluster(conn, id, cluster_id, umap_x, umap_y)
        })
        .await
    }

    async fn bulk_update_clusters(&self, assignments: &[(i64, i64, f64, f64)]) -> SefsResult<()> {
        let assignments = assignments.to_vec();
        self.with_root_writer(move |conn| {
            queries::files::bulk_update_clusters(conn, &assignments)
        })
        .await
    }

    async fn delete_file(&self, id: i64) -> SefsResult<()> {
        self.with_root_writer(move |conn| queries::files::delete(conn, id)).await
    }

    async fn clear_clusters(&self) -> SefsResult<()> {
        self.with_root_writer(queries::clusters::clear).await
    }

    async fn upsert_cluster(&self, cluster: &ClusterRecord) -> SefsResult<()> {
        let cluster = cluster.clone();
        self.with_root_writer(move |conn| queries::clusters::upsert(conn, &cluster)).await
    }

    async fn get_all_clusters(&self) -> SefsResult<Vec<ClusterRecord>> {
        self.with_root_reader(queries::clusters::get_all).await
    }

    async fn replace_all_clusters(&self, clusters: &[ClusterRecord]) -> SefsResult<()> {
        let clusters = clusters.to_vec();
        self.with_root_writer(move |conn| queries::clusters::replace_all(conn, &clusters)).await
    }

    async fn add_event(
        &self,
        file_id: Option<i64>,
        event_type: EventType,
        detail: Option<&str>,
    ) -> SefsResult<()> {
        let detail = detail.map(|s| s.to_string());
        self.with_root_writer(move |conn| {
            queries::events::add(conn, file_id, event_type, detail.as_deref())
        })
        .await
    }

    async fn recent_events(&self, limit: usize) -> SefsResult<Vec<EventRecord>> {
        self.with_root_reader(move |conn| queries::events::recent(conn, limit)).await
    }

    async fn get_setting(&self, key: &str) -> SefsResult<Option<String>> {
        let key = key.to_string();
        self.global
            .readers
            .with_conn(move |conn| queries::settings::get(conn, &key))
            .await
    }

    async fn set_setting(&self, key: &str, value: &str) -> SefsResult<()> {
        let (key, value) = (key.to_string(), value.to_string());
        self.global
            .writer
            .with_conn(move |conn| queries::settings::set(conn, &key, &value))
            .await
    }

    async fn get_all_settings(&self) -> SefsResult<HashMap<String, String>> {
        self.global.readers.with_conn(queries::settings::get_all).await
    }
}

/// Atomic cluster-set replacement, kept as a free function for callers that
/// only have a concrete `SqliteMetadataStore` (e.g. this crate's own tests);
/// delegates to the trait method so there is exactly one implementation.
/// Callers holding a `dyn MetadataStore` should call the trait method
/// directly instead.
pub async fn replace_all_clusters(
    store: &SqliteMetadataStore,
    clusters: &[ClusterRecord],
) -> SefsResult<()> {
    MetadataStore::replace_all_clusters(store, clusters).await
}
