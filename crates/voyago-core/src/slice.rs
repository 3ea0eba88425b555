//! Generic persisted state slice.
//!
//! A slice owns one logical record: it holds an in-memory snapshot, hydrates
//! that snapshot from the durable store exactly once per process lifetime,
//! and applies updates to memory synchronously while the corresponding
//! durable write runs as an independent asynchronous task (write-behind).
//! Hydration and write failures are logged and never propagated; the
//! in-memory value is authoritative for the rest of the process lifetime.
//!
//! Durable writes are submitted to the store in update call order: every
//! mutation takes a sequence number under the value lock, and a per-slice
//! writer gate skips any snapshot that a newer one has already superseded.
//! The last update's write therefore ultimately wins even though write
//! completions may interleave.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, OnceCell, oneshot};

use crate::error::{Result, VoyagoError};
use crate::store::KeyValueStore;

/// How a stored record is combined with the entity defaults at hydration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationStrategy {
    /// The stored record replaces the default value as-is.
    Replace,
    /// Top-level fields of the stored record are merged over the default
    /// record; fields missing in storage keep their defaults. This lets new
    /// fields be added without a migration step.
    MergeOverDefaults,
}

/// A record that can be owned by a [`PersistedSlice`].
pub trait SliceRecord:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static
{
    /// The durable key exclusively owned by this record's slice.
    const STORE_KEY: &'static str;

    /// Hydration strategy for stored records.
    const HYDRATION: HydrationStrategy = HydrationStrategy::Replace;

    /// The record written through when no durable record exists yet.
    ///
    /// Defaults to [`Default::default`]; records that seed data on first
    /// load (e.g. the checklist) override this.
    fn initial() -> Self {
        Self::default()
    }
}

struct SliceInner<T> {
    value: RwLock<T>,
    store: Arc<dyn KeyValueStore>,
    hydrated: OnceCell<()>,
    /// Sequence counter; advanced under the `value` write lock so sequence
    /// order matches memory mutation order.
    next_seq: AtomicU64,
    /// Highest sequence submitted to the store. Guarded by an async mutex
    /// so submissions to the store happen one at a time, in sequence order.
    submitted_seq: Mutex<u64>,
}

impl<T: SliceRecord> SliceInner<T> {
    /// Submits one full-snapshot write, unless a newer snapshot has already
    /// been submitted. Each snapshot carries the whole record, so the
    /// newest one is the only one worth persisting.
    async fn submit_set(&self, seq: u64, snapshot: &T) -> Result<()> {
        let mut submitted = self.submitted_seq.lock().await;
        if seq < *submitted {
            return Ok(());
        }
        *submitted = seq;
        let encoded = serde_json::to_string(snapshot)?;
        self.store.set(T::STORE_KEY, &encoded).await
    }

    /// Submits removal of the durable record, under the same ordering gate
    /// as writes so an earlier `set` cannot overtake it.
    async fn submit_remove(&self, seq: u64) -> Result<()> {
        let mut submitted = self.submitted_seq.lock().await;
        if seq < *submitted {
            return Ok(());
        }
        *submitted = seq;
        self.store.remove(T::STORE_KEY).await
    }
}

/// One independently hydrated, independently persisted state slice.
///
/// Handles are cheap to clone and share the same in-memory value, so a
/// process holds a single hydrated record per entity regardless of how many
/// consumers observe it. Must be used within a Tokio runtime: updates spawn
/// their durable writes as tasks.
pub struct PersistedSlice<T: SliceRecord> {
    inner: Arc<SliceInner<T>>,
}

impl<T: SliceRecord> Clone for PersistedSlice<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: SliceRecord> PersistedSlice<T> {
    /// Creates a slice backed by `store`, holding the default record until
    /// [`load`](Self::load) hydrates it.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(SliceInner {
                value: RwLock::new(T::default()),
                store,
                hydrated: OnceCell::new(),
                next_seq: AtomicU64::new(0),
                submitted_seq: Mutex::new(0),
            }),
        }
    }

    /// Hydrates the in-memory value from the durable store.
    ///
    /// Runs at most once per slice: later calls (and calls through cloned
    /// handles) observe the already-hydrated value and never re-read the
    /// store, so a value updated after hydration cannot regress.
    ///
    /// If no durable record exists, memory takes [`SliceRecord::initial`]
    /// and that value is written through so the durable record and the
    /// in-memory record agree from the first read. A failed read or a
    /// malformed record falls back to defaults; hydration failure is
    /// non-fatal and self-healing on the next successful write.
    pub async fn load(&self) {
        self.inner.hydrated.get_or_init(|| self.hydrate()).await;
    }

    async fn hydrate(&self) {
        match self.inner.store.get(T::STORE_KEY).await {
            Ok(Some(raw)) => match parse_stored::<T>(&raw) {
                Ok(value) => {
                    *self.write_lock() = value;
                    tracing::debug!(key = T::STORE_KEY, "hydrated slice from durable store");
                }
                Err(e) => {
                    tracing::warn!(
                        key = T::STORE_KEY,
                        error = %e,
                        "malformed durable record, falling back to defaults"
                    );
                }
            },
            Ok(None) => {
                let seeded = T::initial();
                let seq = {
                    let mut value = self.write_lock();
                    *value = seeded.clone();
                    self.take_seq()
                };
                if let Err(e) = self.inner.submit_set(seq, &seeded).await {
                    tracing::warn!(
                        key = T::STORE_KEY,
                        error = %e,
                        "failed to write through initial record"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    key = T::STORE_KEY,
                    error = %e,
                    "failed to read durable record, falling back to defaults"
                );
            }
        }
    }

    /// Returns the current in-memory value.
    ///
    /// Always available synchronously; returns the default until hydration
    /// completes.
    pub fn read(&self) -> T {
        self.read_lock().clone()
    }

    /// Applies `f` to the in-memory value, then queues a durable write of
    /// the full new value.
    ///
    /// The mutation is visible to the next [`read`](Self::read) immediately.
    /// The returned [`WriteReceipt`] may be dropped (fire-and-forget) or
    /// awaited by callers that need durability confirmation.
    pub fn update_with<F>(&self, f: F) -> WriteReceipt
    where
        F: FnOnce(&mut T),
    {
        let (snapshot, seq) = {
            let mut value = self.write_lock();
            f(&mut value);
            (value.clone(), self.take_seq())
        };
        self.spawn_set(snapshot, seq)
    }

    /// Like [`update_with`](Self::update_with), but `f` decides whether
    /// anything changed. When `f` returns `false` the value is untouched, no
    /// durable write is queued and `None` is returned.
    pub fn update_if<F>(&self, f: F) -> Option<WriteReceipt>
    where
        F: FnOnce(&mut T) -> bool,
    {
        let (snapshot, seq) = {
            let mut value = self.write_lock();
            if !f(&mut value) {
                return None;
            }
            (value.clone(), self.take_seq())
        };
        Some(self.spawn_set(snapshot, seq))
    }

    /// Queues a durable write of the current in-memory value without
    /// mutating it. Lets a caller that ignored earlier receipts obtain
    /// durability confirmation for everything applied so far.
    pub fn flush(&self) -> WriteReceipt {
        let (snapshot, seq) = {
            let value = self.write_lock();
            (value.clone(), self.take_seq())
        };
        self.spawn_set(snapshot, seq)
    }

    /// Resets memory to the default record synchronously and queues removal
    /// of the durable record.
    pub fn clear(&self) -> WriteReceipt {
        let seq = {
            let mut value = self.write_lock();
            *value = T::default();
            self.take_seq()
        };

        let (tx, rx) = oneshot::channel();
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = inner.submit_remove(seq).await;
            if let Err(e) = &result {
                tracing::warn!(key = T::STORE_KEY, error = %e, "failed to remove durable record");
            }
            let _ = tx.send(result);
        });
        WriteReceipt { receiver: rx }
    }

    fn spawn_set(&self, snapshot: T, seq: u64) -> WriteReceipt {
        let (tx, rx) = oneshot::channel();
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = inner.submit_set(seq, &snapshot).await;
            if let Err(e) = &result {
                tracing::warn!(
                    key = T::STORE_KEY,
                    error = %e,
                    "durable write failed, in-memory value stays authoritative"
                );
            }
            let _ = tx.send(result);
        });
        WriteReceipt { receiver: rx }
    }

    /// Takes the next sequence number. Callers hold the `value` lock, which
    /// keeps sequence order aligned with memory mutation order.
    fn take_seq(&self) -> u64 {
        self.inner.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, T> {
        self.inner.value.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, T> {
        self.inner.value.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Completion signal for one queued durable write.
///
/// Dropping the receipt keeps the fire-and-forget behavior; awaiting
/// [`wait`](Self::wait) observes the write result. A write superseded by a
/// newer snapshot before reaching the store reports success: the newer
/// full-value write carries its data.
pub struct WriteReceipt {
    receiver: oneshot::Receiver<Result<()>>,
}

impl WriteReceipt {
    /// Waits for the durable write to complete and returns its result.
    pub async fn wait(self) -> Result<()> {
        match self.receiver.await {
            Ok(result) => result,
            Err(_) => Err(VoyagoError::internal(
                "persistence task dropped before completion",
            )),
        }
    }
}

fn parse_stored<T: SliceRecord>(raw: &str) -> Result<T> {
    match T::HYDRATION {
        HydrationStrategy::Replace => Ok(serde_json::from_str(raw)?),
        HydrationStrategy::MergeOverDefaults => {
            let stored: Value = serde_json::from_str(raw)?;
            let mut merged = serde_json::to_value(T::default())?;
            match (&mut merged, stored) {
                (Value::Object(base), Value::Object(overlay)) => {
                    for (key, value) in overlay {
                        base.insert(key, value);
                    }
                }
                _ => {
                    return Err(VoyagoError::Serialization {
                        format: "JSON".to_string(),
                        message: format!(
                            "record under '{}' is not an object, cannot merge over defaults",
                            T::STORE_KEY
                        ),
                    });
                }
            }
            Ok(serde_json::from_value(merged)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Counter {
        label: String,
        count: u32,
    }

    impl SliceRecord for Counter {
        const STORE_KEY: &'static str = "counter";
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Settings {
        language: String,
        currency: String,
        premium: bool,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                language: "france".to_string(),
                currency: "EUR".to_string(),
                premium: false,
            }
        }
    }

    impl SliceRecord for Settings {
        const STORE_KEY: &'static str = "settings";
        const HYDRATION: HydrationStrategy = HydrationStrategy::MergeOverDefaults;
    }

    fn slice_over<T: SliceRecord>(store: &Arc<MemoryStore>) -> PersistedSlice<T> {
        PersistedSlice::new(Arc::clone(store) as Arc<dyn KeyValueStore>)
    }

    fn stored_counter(store: &MemoryStore) -> Counter {
        serde_json::from_str(&store.peek("counter").unwrap()).unwrap()
    }

    #[tokio::test]
    async fn read_before_load_returns_default() {
        let store = Arc::new(MemoryStore::new());
        let slice: PersistedSlice<Counter> = slice_over(&store);
        assert_eq!(slice.read(), Counter::default());
    }

    #[tokio::test]
    async fn load_writes_through_initial_record_when_absent() {
        let store = Arc::new(MemoryStore::new());
        let slice: PersistedSlice<Counter> = slice_over(&store);
        slice.load().await;

        assert_eq!(stored_counter(&store), Counter::default());
    }

    #[tokio::test]
    async fn load_hydrates_stored_record() {
        let store = Arc::new(MemoryStore::new());
        store.preset("counter", r#"{"label":"trips","count":3}"#);

        let slice: PersistedSlice<Counter> = slice_over(&store);
        slice.load().await;

        let value = slice.read();
        assert_eq!(value.label, "trips");
        assert_eq!(value.count, 3);
    }

    #[tokio::test]
    async fn malformed_record_falls_back_to_default() {
        let store = Arc::new(MemoryStore::new());
        store.preset("counter", "not json at all");

        let slice: PersistedSlice<Counter> = slice_over(&store);
        slice.load().await;

        assert_eq!(slice.read(), Counter::default());
        // The malformed record is left in place; the next write heals it.
        let receipt = slice.update_with(|c| c.count = 1);
        receipt.wait().await.unwrap();
        assert_eq!(stored_counter(&store).count, 1);
    }

    #[tokio::test]
    async fn merge_over_defaults_keeps_missing_fields() {
        let store = Arc::new(MemoryStore::new());
        store.preset("settings", r#"{"currency":"JPY"}"#);

        let slice: PersistedSlice<Settings> = slice_over(&store);
        slice.load().await;

        let value = slice.read();
        assert_eq!(value.currency, "JPY");
        assert_eq!(value.language, "france");
        assert!(!value.premium);
    }

    #[tokio::test]
    async fn second_load_does_not_regress_updates() {
        let store = Arc::new(MemoryStore::new());
        store.preset("counter", r#"{"label":"stored","count":10}"#);

        let slice: PersistedSlice<Counter> = slice_over(&store);
        slice.load().await;
        slice
            .update_with(|c| c.count = 42)
            .wait()
            .await
            .unwrap();

        slice.load().await;
        assert_eq!(slice.read().count, 42);

        // A cloned handle shares the hydrated value instead of re-reading.
        let other = slice.clone();
        other.load().await;
        assert_eq!(other.read().count, 42);
    }

    #[tokio::test]
    async fn update_is_visible_before_write_completes() {
        let store = Arc::new(MemoryStore::new());
        let slice: PersistedSlice<Counter> = slice_over(&store);
        slice.load().await;

        let receipt = slice.update_with(|c| c.count = 7);
        assert_eq!(slice.read().count, 7);
        receipt.wait().await.unwrap();

        assert_eq!(stored_counter(&store).count, 7);
    }

    #[tokio::test]
    async fn update_if_skips_write_when_unchanged() {
        let store = Arc::new(MemoryStore::new());
        let slice: PersistedSlice<Counter> = slice_over(&store);
        slice.load().await;

        let receipt = slice.update_if(|_| false);
        assert!(receipt.is_none());

        let receipt = slice.update_if(|c| {
            c.count += 1;
            true
        });
        receipt.expect("changed").wait().await.unwrap();
        assert_eq!(slice.read().count, 1);
    }

    #[tokio::test]
    async fn last_update_wins_durably_when_writes_interleave() {
        let store = Arc::new(MemoryStore::new());
        let slice: PersistedSlice<Counter> = slice_over(&store);
        slice.load().await;

        // Back-to-back updates whose spawned writes may be polled in any
        // order; the durable record must always end on the later value.
        for round in 0u32..200 {
            let first = slice.update_with(|c| c.count = round * 2);
            let second = slice.update_with(|c| c.count = round * 2 + 1);
            first.wait().await.unwrap();
            second.wait().await.unwrap();

            assert_eq!(stored_counter(&store).count, round * 2 + 1);
            assert_eq!(slice.read().count, round * 2 + 1);
        }
    }

    #[tokio::test]
    async fn clear_is_not_overtaken_by_an_earlier_write() {
        let store = Arc::new(MemoryStore::new());
        let slice: PersistedSlice<Counter> = slice_over(&store);
        slice.load().await;

        let write = slice.update_with(|c| c.count = 9);
        let removal = slice.clear();
        write.wait().await.unwrap();
        removal.wait().await.unwrap();

        assert_eq!(slice.read(), Counter::default());
        assert!(store.peek("counter").is_none());
    }

    #[tokio::test]
    async fn flush_persists_the_current_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let slice: PersistedSlice<Counter> = slice_over(&store);
        slice.load().await;

        // Receipts dropped, fire-and-forget; flush confirms everything
        // applied so far.
        slice.update_with(|c| c.count = 3);
        slice.update_with(|c| c.label = "trips".to_string());
        slice.flush().wait().await.unwrap();

        let stored = stored_counter(&store);
        assert_eq!(stored.count, 3);
        assert_eq!(stored.label, "trips");
    }

    #[tokio::test]
    async fn clear_resets_memory_and_removes_record() {
        let store = Arc::new(MemoryStore::new());
        let slice: PersistedSlice<Counter> = slice_over(&store);
        slice.load().await;
        slice
            .update_with(|c| c.count = 5)
            .wait()
            .await
            .unwrap();

        slice.clear().wait().await.unwrap();
        assert_eq!(slice.read(), Counter::default());
        assert!(store.peek("counter").is_none());
    }
}
