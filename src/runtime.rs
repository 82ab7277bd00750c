//! Tokio adapter for async request layers.
//!
//! Catalog calls are blocking; this module runs each one on tokio's
//! blocking pool. Dropping the returned future (a client hang-up, or a
//! `tokio::time::timeout` firing) cancels the call's [`CallContext`], so
//! the store operation stops at its next step boundary and an open merge
//! transaction rolls back. Nothing is restarted.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::IngredientCatalog;
use crate::context::{CallContext, CancelHandle};
use crate::error::{CatalogError, CatalogResult};
use crate::ingredient::{CanonicalIngredient, IngredientId};
use crate::resolver::Resolution;
use crate::storage::StorageError;

/// Cancels the wrapped context when dropped, unless disarmed.
struct CancelOnDrop {
    handle: Option<CancelHandle>,
}

impl CancelOnDrop {
    fn disarm(mut self) {
        self.handle = None;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

/// Async front for an [`IngredientCatalog`].
#[derive(Clone)]
pub struct AsyncCatalog {
    inner: Arc<IngredientCatalog>,
    timeout: Option<Duration>,
}

impl AsyncCatalog {
    /// Wrap a shared catalog.
    #[must_use]
    pub fn new(inner: Arc<IngredientCatalog>) -> Self {
        Self {
            inner,
            timeout: None,
        }
    }

    /// Apply `timeout` as a deadline to every call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The wrapped catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<IngredientCatalog> {
        &self.inner
    }

    /// Async [`IngredientCatalog::resolve`].
    ///
    /// # Errors
    ///
    /// Same as the blocking call, plus `Storage(DeadlineExceeded)` when the
    /// configured timeout passes.
    pub async fn resolve(&self, raw_name: impl Into<String>) -> CatalogResult<Resolution> {
        let raw_name = raw_name.into();
        self.run(move |catalog, ctx| catalog.resolve(ctx, &raw_name))
            .await
    }

    /// Async [`IngredientCatalog::merge`].
    ///
    /// # Errors
    ///
    /// Same as the blocking call, plus `Storage(DeadlineExceeded)` when the
    /// configured timeout passes.
    pub async fn merge(
        &self,
        winner: IngredientId,
        loser: IngredientId,
    ) -> CatalogResult<CanonicalIngredient> {
        self.run(move |catalog, ctx| catalog.merge(ctx, winner, loser))
            .await
    }

    async fn run<T, F>(&self, call: F) -> CatalogResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&IngredientCatalog, &CallContext) -> CatalogResult<T> + Send + 'static,
    {
        let ctx = match self.timeout {
            Some(timeout) => CallContext::with_timeout(timeout),
            None => CallContext::background(),
        };
        let guard = CancelOnDrop {
            handle: Some(ctx.cancel_handle()),
        };

        let catalog = Arc::clone(&self.inner);
        let result = tokio::task::spawn_blocking(move || call(&catalog, &ctx)).await;
        guard.disarm();

        result.map_err(|err| {
            CatalogError::Storage(StorageError::BackendError(format!(
                "blocking task failed: {err}"
            )))
        })?
    }
}
