use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A single value loaded on demand and shared between threads.
///
/// At most one loader runs at a time. A thread that was waiting for the loader
/// lock while another thread published a fresh value returns that value instead
/// of loading again. The published value is immutable and replaced as a whole.
pub struct ContentCache<T> {
    published: RwLock<Option<CacheValue<T>>>,
    loading: Mutex<()>,
    load_count: AtomicU64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Expire {
    Never,
    After(Duration),
}

struct CacheValue<T> {
    loaded_at: Instant,
    value: Arc<T>,
}

impl<T> CacheValue<T> {
    fn is_fresh(&self, expire: &Expire) -> bool {
        match expire {
            Expire::Never => true,
            Expire::After(max_age) => self.loaded_at.elapsed() <= *max_age,
        }
    }
}

impl<T> ContentCache<T> {
    pub fn new() -> Self {
        ContentCache {
            published: RwLock::new(None),
            loading: Mutex::new(()),
            load_count: AtomicU64::new(0),
        }
    }

    /// Returns the published value when it is still fresh, otherwise runs `loader`
    /// on the calling thread and publishes its result.
    ///
    /// A failing loader publishes nothing, the next call tries again.
    pub fn get_or_load<E, F>(&self, expire: &Expire, loader: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.fresh(expire) {
            return Ok(value);
        }

        let _loading = self.loading.lock().unwrap_or_else(PoisonError::into_inner);

        // Someone else may have loaded it while we were waiting for the lock
        if let Some(value) = self.fresh(expire) {
            return Ok(value);
        }

        let value = Arc::new(loader()?);
        let mut published = self.published.write().unwrap_or_else(PoisonError::into_inner);
        *published = Some(CacheValue {
            loaded_at: Instant::now(),
            value: value.clone(),
        });
        self.load_count.fetch_add(1, Ordering::SeqCst);

        Ok(value)
    }

    pub fn invalidate(&self) {
        self.reset(|| {});
    }

    /// Runs `update` and drops the published value while holding the loader lock.
    ///
    /// A load already running finishes first. Loaders that read their inputs
    /// inside `get_or_load` never publish a value built from what `update` replaced.
    pub fn reset<F: FnOnce()>(&self, update: F) {
        let _loading = self.loading.lock().unwrap_or_else(PoisonError::into_inner);
        update();
        let mut published = self.published.write().unwrap_or_else(PoisonError::into_inner);
        *published = None;
    }

    /// Number of successful loads since the cache was created
    pub fn load_count(&self) -> u64 {
        self.load_count.load(Ordering::SeqCst)
    }

    fn fresh(&self, expire: &Expire) -> Option<Arc<T>> {
        let published = self.published.read().unwrap_or_else(PoisonError::into_inner);
        match *published {
            Some(ref cache_value) if cache_value.is_fresh(expire) => Some(cache_value.value.clone()),
            _ => None,
        }
    }
}

impl<T> Default for ContentCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
