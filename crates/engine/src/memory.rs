//! In-memory store backend.
//!
//! Implements the store boundary in process. Every connect yields a new
//! cluster session over the same shared buckets, so tests can observe how
//! many sessions the registry creates and what it writes.
//!
//! Views cannot run map functions here: rows are seeded per view with
//! [`MemoryConnector::add_view_rows`], and a query returns them with the
//! emitting documents attached. `key`, `startkey` and `endkey` filter on the
//! row key text; `descending`, `skip` and `limit` apply in that order.

use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use docbridge_core::{FailureKind, JsonMap, JsonValue, StoreFailure};

use crate::store::{
    Bucket, Cluster, ClusterConnector, ClusterManager, DesignDocument, JsonDocument, StoreResult,
    ViewRow,
};
use crate::view::ViewQuery;

#[derive(Default)]
struct BucketData {
    password: Option<String>,
    documents: BTreeMap<String, JsonDocument>,
    design_documents: BTreeMap<String, DesignDocument>,
    /// (design, view) -> rows
    view_rows: HashMap<(String, String), Vec<ViewRow>>,
}

#[derive(Default)]
struct SharedStore {
    buckets: RwLock<BTreeMap<String, BucketData>>,
    admin: RwLock<Option<(String, String)>>,
    next_cas: AtomicU64,
}

impl SharedStore {
    fn cas(&self) -> u64 {
        self.next_cas.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Connector over a shared in-memory store.
#[derive(Default)]
pub struct MemoryConnector {
    store: Arc<SharedStore>,
    connects: AtomicUsize,
    disconnects: Arc<AtomicUsize>,
    failing_connects: AtomicUsize,
    connect_delay: Mutex<Option<Duration>>,
}

impl MemoryConnector {
    /// A store with no buckets
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or reset) a bucket. `None` leaves it unauthenticated.
    pub fn add_bucket(&self, name: &str, password: Option<&str>) {
        self.store.buckets.write().insert(
            name.to_string(),
            BucketData {
                password: password.map(str::to_string),
                ..BucketData::default()
            },
        );
    }

    /// Set the cluster administrator credentials
    pub fn set_admin(&self, username: &str, password: &str) {
        *self.store.admin.write() = Some((username.to_string(), password.to_string()));
    }

    /// Store a document directly, bypassing any session
    pub fn put_document(&self, bucket: &str, id: &str, content: JsonMap) {
        let cas = self.store.cas();
        let mut buckets = self.store.buckets.write();
        let data = buckets.entry(bucket.to_string()).or_default();
        data.documents.insert(
            id.to_string(),
            JsonDocument {
                id: id.to_string(),
                content,
                cas,
            },
        );
    }

    /// Read a stored document
    pub fn document(&self, bucket: &str, id: &str) -> Option<JsonDocument> {
        self.store
            .buckets
            .read()
            .get(bucket)
            .and_then(|b| b.documents.get(id).cloned())
    }

    /// Read a stored design document
    pub fn design_document(&self, bucket: &str, name: &str) -> Option<DesignDocument> {
        self.store
            .buckets
            .read()
            .get(bucket)
            .and_then(|b| b.design_documents.get(name).cloned())
    }

    /// Seed the rows a view returns. The design document must also exist
    /// for the view to be queryable.
    pub fn add_view_rows(&self, bucket: &str, design: &str, view: &str, rows: Vec<ViewRow>) {
        let mut buckets = self.store.buckets.write();
        let data = buckets.entry(bucket.to_string()).or_default();
        data.view_rows
            .insert((design.to_string(), view.to_string()), rows);
    }

    /// Make the next `n` connects fail with a connection failure
    pub fn fail_next_connects(&self, n: usize) {
        self.failing_connects.store(n, Ordering::SeqCst);
    }

    /// Sleep this long inside every connect
    pub fn set_connect_delay(&self, delay: Duration) {
        *self.connect_delay.lock() = Some(delay);
    }

    /// Connect attempts so far, failed ones included
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Sessions disconnected so far
    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

impl ClusterConnector for MemoryConnector {
    fn connect(&self, seeds: &[String]) -> StoreResult<Arc<dyn Cluster>> {
        let delay = *self.connect_delay.lock();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        self.connects.fetch_add(1, Ordering::SeqCst);

        if seeds.is_empty() {
            return Err(StoreFailure::new(
                FailureKind::InvalidArgument,
                "No seed addresses given",
            ));
        }
        let failing = self
            .failing_connects
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StoreFailure::new(
                FailureKind::Connection,
                format!("Unable to reach any of {:?}", seeds),
            ));
        }

        debug!(target: "docbridge::memory", seeds = ?seeds, "Opened session");
        Ok(Arc::new(MemoryCluster {
            store: self.store.clone(),
            open: Arc::new(AtomicBool::new(true)),
            disconnects: self.disconnects.clone(),
        }))
    }
}

struct MemoryCluster {
    store: Arc<SharedStore>,
    open: Arc<AtomicBool>,
    disconnects: Arc<AtomicUsize>,
}

fn ensure_open(open: &AtomicBool) -> StoreResult<()> {
    if open.load(Ordering::SeqCst) {
        Ok(())
    } else {
        Err(StoreFailure::new(FailureKind::Connection, "Session is disconnected"))
    }
}

impl Cluster for MemoryCluster {
    fn open_bucket(&self, name: &str, password: Option<&str>) -> StoreResult<Arc<dyn Bucket>> {
        ensure_open(&self.open)?;
        let buckets = self.store.buckets.read();
        let data = buckets.get(name).ok_or_else(|| {
            StoreFailure::new(FailureKind::Store, format!("Bucket '{}' does not exist", name))
        })?;
        if let Some(expected) = data.password.as_deref() {
            if password != Some(expected) {
                return Err(StoreFailure::new(
                    FailureKind::InvalidPassword,
                    format!("Passwords for bucket '{}' do not match", name),
                ));
            }
        }
        Ok(Arc::new(MemoryBucket {
            name: name.to_string(),
            store: self.store.clone(),
            open: self.open.clone(),
        }))
    }

    fn cluster_manager(
        &self,
        username: &str,
        password: &str,
    ) -> StoreResult<Arc<dyn ClusterManager>> {
        ensure_open(&self.open)?;
        let admin = self.store.admin.read();
        match admin.as_ref() {
            Some((user, pw)) if user == username && pw == password => Ok(Arc::new(MemoryManager {
                store: self.store.clone(),
                open: self.open.clone(),
            })),
            _ => Err(StoreFailure::new(
                FailureKind::InvalidPassword,
                "Invalid cluster administrator credentials",
            )),
        }
    }

    fn disconnect(&self) -> StoreResult<()> {
        if self.open.swap(false, Ordering::SeqCst) {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
            debug!(target: "docbridge::memory", "Closed session");
        }
        Ok(())
    }
}

struct MemoryBucket {
    name: String,
    store: Arc<SharedStore>,
    open: Arc<AtomicBool>,
}

impl MemoryBucket {
    fn with_data<T>(&self, f: impl FnOnce(&mut BucketData) -> StoreResult<T>) -> StoreResult<T> {
        ensure_open(&self.open)?;
        let mut buckets = self.store.buckets.write();
        let data = buckets.get_mut(&self.name).ok_or_else(|| {
            StoreFailure::new(
                FailureKind::Store,
                format!("Bucket '{}' was removed", self.name),
            )
        })?;
        f(data)
    }
}

impl Bucket for MemoryBucket {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, id: &str) -> StoreResult<Option<JsonDocument>> {
        self.with_data(|data| Ok(data.documents.get(id).cloned()))
    }

    fn upsert(&self, mut document: JsonDocument) -> StoreResult<JsonDocument> {
        document.cas = self.store.cas();
        self.with_data(|data| {
            data.documents.insert(document.id.clone(), document.clone());
            Ok(document)
        })
    }

    fn insert(&self, mut document: JsonDocument) -> StoreResult<JsonDocument> {
        document.cas = self.store.cas();
        self.with_data(|data| {
            if data.documents.contains_key(&document.id) {
                return Err(StoreFailure::new(
                    FailureKind::DocumentExists,
                    format!("Document '{}' already exists", document.id),
                ));
            }
            data.documents.insert(document.id.clone(), document.clone());
            Ok(document)
        })
    }

    fn query(&self, query: &ViewQuery) -> StoreResult<Vec<ViewRow>> {
        self.with_data(|data| {
            let design_name = match query.options.development {
                Some(true) => format!("dev_{}", query.design),
                _ => query.design.clone(),
            };
            let has_view = data
                .design_documents
                .get(&design_name)
                .map(|d| d.views.iter().any(|v| v.name == query.view))
                .unwrap_or(false);
            if !has_view {
                return Err(StoreFailure::new(
                    FailureKind::ViewNotFound,
                    format!("View '{}/{}' does not exist", query.design_path(), query.view),
                ));
            }

            let seeded = data
                .view_rows
                .get(&(design_name, query.view.clone()))
                .cloned()
                .unwrap_or_default();
            let options = &query.options;
            let mut rows: Vec<ViewRow> = seeded
                .into_iter()
                .filter(|row| {
                    let key = key_text(&row.key);
                    options.key.as_ref().map_or(true, |k| &key == k)
                        && options.startkey.as_ref().map_or(true, |k| &key >= k)
                        && options.endkey.as_ref().map_or(true, |k| {
                            if options.inclusive_end == Some(false) {
                                &key < k
                            } else {
                                &key <= k
                            }
                        })
                })
                .collect();
            if options.descending == Some(true) {
                rows.reverse();
            }
            let skip = options.skip.unwrap_or(0) as usize;
            let limit = options.limit.map(|l| l as usize).unwrap_or(usize::MAX);
            Ok(rows
                .into_iter()
                .skip(skip)
                .take(limit)
                .map(|mut row| {
                    row.document = data.documents.get(&row.id).cloned();
                    row
                })
                .collect())
        })
    }

    fn upsert_design_document(&self, design: DesignDocument) -> StoreResult<DesignDocument> {
        self.with_data(|data| {
            data.design_documents
                .insert(design.name.clone(), design.clone());
            Ok(design)
        })
    }

    fn insert_design_document(
        &self,
        design: DesignDocument,
    ) -> StoreResult<Option<DesignDocument>> {
        self.with_data(|data| {
            if data.design_documents.contains_key(&design.name) {
                return Err(StoreFailure::new(
                    FailureKind::DocumentExists,
                    format!("Design document '{}' already exists", design.name),
                ));
            }
            data.design_documents
                .insert(design.name.clone(), design.clone());
            Ok(Some(design))
        })
    }
}

fn key_text(key: &JsonValue) -> String {
    match key {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

struct MemoryManager {
    store: Arc<SharedStore>,
    open: Arc<AtomicBool>,
}

impl ClusterManager for MemoryManager {
    fn bucket_names(&self) -> StoreResult<Vec<String>> {
        ensure_open(&self.open)?;
        Ok(self.store.buckets.read().keys().cloned().collect())
    }

    fn remove_bucket(&self, name: &str) -> StoreResult<bool> {
        ensure_open(&self.open)?;
        Ok(self.store.buckets.write().remove(name).is_some())
    }
}
