//! Per-run cache of PR comment lists.
//!
//! Listing review comments is paginated and slow, and the same list is read
//! once per packed hunk. The cache is a plain value owned by the run and
//! passed to whoever needs it; `invalidate` is the one reset point.
//!
//! Key: PR number. Value: the full comment list, in provider order.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::Mutex;
use tracing::debug;

use crate::review::threads::ThreadComment;

/// Comment lists keyed by PR number.
#[derive(Debug)]
pub struct CommentCache<T = ThreadComment> {
    inner: Mutex<HashMap<u64, Vec<T>>>,
}

impl<T> Default for CommentCache<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> CommentCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached list for `pr`, or run `load` and remember its result.
    ///
    /// A failed load is returned as is and nothing is cached. The lock is
    /// held across the load so concurrent callers do not fetch twice.
    pub async fn get_or_load<F, Fut, E>(&self, pr: u64, load: F) -> Result<Vec<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        let mut map = self.inner.lock().await;
        if let Some(hit) = map.get(&pr) {
            debug!("cache: hit for pr #{} ({} comments)", pr, hit.len());
            return Ok(hit.clone());
        }
        let loaded = load().await?;
        debug!("cache: stored pr #{} ({} comments)", pr, loaded.len());
        map.insert(pr, loaded.clone());
        Ok(loaded)
    }

    /// Replace the list for `pr`.
    pub async fn insert(&self, pr: u64, comments: Vec<T>) {
        self.inner.lock().await.insert(pr, comments);
    }

    /// Append a freshly posted comment if the list for `pr` is cached.
    pub async fn push(&self, pr: u64, comment: T) {
        if let Some(list) = self.inner.lock().await.get_mut(&pr) {
            list.push(comment);
        }
    }

    /// Drop everything.
    pub async fn invalidate(&self) {
        self.inner.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn loads_once_then_hits() {
        let cache: CommentCache<u32> = CommentCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let got = cache
                .get_or_load(7, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(vec![1, 2])
                })
                .await
                .unwrap();
            assert_eq!(got, vec![1, 2]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let cache: CommentCache<u32> = CommentCache::new();
        let err = cache
            .get_or_load(1, || async { Err::<Vec<u32>, _>("boom") })
            .await;
        assert_eq!(err, Err("boom"));
        let ok = cache
            .get_or_load(1, || async { Ok::<_, &str>(vec![9]) })
            .await;
        assert_eq!(ok, Ok(vec![9]));
    }

    #[tokio::test]
    async fn push_and_invalidate() {
        let cache: CommentCache<u32> = CommentCache::new();
        cache.push(1, 5).await; // not cached yet: ignored
        cache.insert(1, vec![1]).await;
        cache.push(1, 2).await;
        let got = cache
            .get_or_load(1, || async { Ok::<_, ()>(vec![]) })
            .await
            .unwrap();
        assert_eq!(got, vec![1, 2]);

        cache.invalidate().await;
        let got = cache
            .get_or_load(1, || async { Ok::<_, ()>(vec![42]) })
            .await
            .unwrap();
        assert_eq!(got, vec![42]);
    }
}
