//! Enumerator shared between tasks

use super::enumerator::PagedEnumerator;
use super::page::Page;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;

/// A [`PagedEnumerator`] that can be cloned and used from several tasks
///
/// Only one fetch may be outstanding. A `fetch_next` that finds another one
/// in flight fails immediately with `Error::FetchInProgress`; it never waits.
/// Readers see the page published by the last completed fetch.
pub struct SharedPagedEnumerator<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    enumerator: Mutex<PagedEnumerator<T>>,
    current: RwLock<Arc<Page<T>>>,
}

impl<T: DeserializeOwned> SharedPagedEnumerator<T> {
    pub(super) fn new(mut enumerator: PagedEnumerator<T>) -> Self {
        let current = Arc::new(enumerator.take_page());
        Self {
            inner: Arc::new(Inner {
                enumerator: Mutex::new(enumerator),
                current: RwLock::new(current),
            }),
        }
    }

    /// The most recently published page
    pub fn current_page(&self) -> Arc<Page<T>> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether the published page carried a continuation token
    pub fn has_next(&self) -> bool {
        self.current_page().has_next()
    }

    /// Whether a fetch is currently outstanding
    pub fn is_fetching(&self) -> bool {
        self.inner.enumerator.try_lock().is_err()
    }

    /// Fetch the next page and publish it
    ///
    /// Fails with `FetchInProgress` when another fetch has not completed yet.
    pub async fn fetch_next(&self) -> Result<Arc<Page<T>>> {
        let mut enumerator = self
            .inner
            .enumerator
            .try_lock()
            .map_err(|_| Error::FetchInProgress)?;

        enumerator.fetch_next().await?;
        let page = Arc::new(enumerator.take_page());
        *self
            .inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::clone(&page);
        Ok(page)
    }
}

impl<T> Clone for SharedPagedEnumerator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for SharedPagedEnumerator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedPagedEnumerator").finish_non_exhaustive()
    }
}
