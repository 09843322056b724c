//! Memoized answer to "has first-run setup been completed?".
//!
//! The answer is fetched from `GET /api/setup/status` at most once per cache
//! lifetime. Concurrent callers that arrive while the request is outstanding
//! await the same future instead of issuing their own. A backend that cannot
//! be asked is treated as "setup complete": an unreachable server is a
//! different problem from an unconfigured one, and trapping every route on
//! the setup screen would hide it.

use std::{cell::RefCell, fmt, rc::Rc};

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use tracing::{debug, warn};

use crate::api::SetupApi;

type PendingStatus = Shared<LocalBoxFuture<'static, bool>>;

/// The resolved value and the outstanding request are tracked separately so
/// that invalidation can drop the former without disturbing the latter.
#[derive(Default)]
struct Slots {
    value: Option<bool>,
    pending: Option<PendingStatus>,
}

/// Process-scoped setup-status cache; clones share state.
#[derive(Clone)]
pub struct SetupStatusCache {
    api: Rc<dyn SetupApi>,
    slots: Rc<RefCell<Slots>>,
}

impl fmt::Debug for SetupStatusCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.borrow();
        f.debug_struct("SetupStatusCache")
            .field("value", &slots.value)
            .field("resolving", &slots.pending.is_some())
            .finish_non_exhaustive()
    }
}

impl SetupStatusCache {
    /// Creates an empty cache that asks `api` on first use.
    #[must_use]
    pub fn new(api: Rc<dyn SetupApi>) -> Self {
        Self {
            api,
            slots: Rc::new(RefCell::new(Slots::default())),
        }
    }

    /// Returns whether setup is complete, querying the backend only when
    /// nothing is cached and no request is already in flight.
    pub async fn get(&self) -> bool {
        let pending = {
            let mut slots = self.slots.borrow_mut();
            if let Some(complete) = slots.value {
                return complete;
            }
            if let Some(pending) = &slots.pending {
                pending.clone()
            } else {
                let pending = self.resolve();
                slots.pending = Some(pending.clone());
                pending
            }
        };
        pending.await
    }

    /// Forgets the cached answer. An in-flight request is left alone and
    /// will still populate the cache when it completes.
    pub fn invalidate(&self) {
        let mut slots = self.slots.borrow_mut();
        if slots.value.take().is_some() {
            debug!("setup status cache invalidated");
        }
    }

    /// Cached answer, without triggering a request.
    #[must_use]
    pub fn peek(&self) -> Option<bool> {
        self.slots.borrow().value
    }

    /// Whether a backend request is currently outstanding.
    #[must_use]
    pub fn is_resolving(&self) -> bool {
        self.slots.borrow().pending.is_some()
    }

    fn resolve(&self) -> PendingStatus {
        let api = Rc::clone(&self.api);
        let slots = Rc::clone(&self.slots);
        async move {
            let complete = match api.setup_status().await {
                Ok(status) => {
                    debug!(
                        setup_complete = status.setup_complete,
                        missing = ?status.missing_items,
                        "setup status resolved"
                    );
                    status.setup_complete
                }
                Err(error) => {
                    warn!(error = %error, "setup status unavailable, assuming setup is complete");
                    true
                }
            };
            let mut slots = slots.borrow_mut();
            slots.value = Some(complete);
            slots.pending = None;
            complete
        }
        .boxed_local()
        .shared()
    }
}
