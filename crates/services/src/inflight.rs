//! Registry of requests that are currently running.
//!
//! A request is identified by its operation name plus the identity of the
//! thing it acts on. Starting a request hands out a guard; the key stays
//! pending until the guard is dropped, whichever way the request ended.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub operation: &'static str,
    pub identity: String,
}

impl RequestKey {
    #[must_use]
    pub fn new(operation: &'static str, identity: impl fmt::Display) -> Self {
        Self {
            operation,
            identity: identity.to_string(),
        }
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operation, self.identity)
    }
}

#[derive(Clone, Default)]
pub struct InFlight {
    pending: Arc<Mutex<HashSet<RequestKey>>>,
}

impl InFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`. Returns `None` while the same key is still pending.
    #[must_use]
    pub fn try_begin(&self, key: RequestKey) -> Option<InFlightGuard> {
        let mut pending = self.lock();
        if !pending.insert(key.clone()) {
            tracing::debug!(target: "services", %key, "duplicate request ignored");
            return None;
        }
        Some(InFlightGuard {
            pending: Arc::clone(&self.pending),
            key,
        })
    }

    /// Claim `key` only if no other request of the same operation is pending.
    #[must_use]
    pub fn try_begin_exclusive(&self, key: RequestKey) -> Option<InFlightGuard> {
        let mut pending = self.lock();
        if pending.iter().any(|k| k.operation == key.operation) {
            tracing::debug!(target: "services", %key, "operation busy, request ignored");
            return None;
        }
        pending.insert(key.clone());
        Some(InFlightGuard {
            pending: Arc::clone(&self.pending),
            key,
        })
    }

    #[must_use]
    pub fn is_pending(&self, key: &RequestKey) -> bool {
        self.lock().contains(key)
    }

    #[must_use]
    pub fn is_operation_pending(&self, operation: &str) -> bool {
        self.lock().iter().any(|k| k.operation == operation)
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<RequestKey>> {
        // A panic while holding the set cannot leave it half-updated.
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl fmt::Debug for InFlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InFlight")
            .field("pending", &self.lock().len())
            .finish()
    }
}

/// Releases its key when dropped.
#[must_use = "the request is released as soon as the guard is dropped"]
pub struct InFlightGuard {
    pending: Arc<Mutex<HashSet<RequestKey>>>,
    key: RequestKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        pending.remove(&self.key);
    }
}

impl fmt::Debug for InFlightGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InFlightGuard").field(&self.key).finish()
    }
}
