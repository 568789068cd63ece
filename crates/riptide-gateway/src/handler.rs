//! Handler registration.
//!
//! The registry stores per-kind and wildcard callbacks in registration
//! order. Mutation takes the registry's own write lock; dispatch takes a
//! read-lock snapshot, so handlers may subscribe and unsubscribe freely
//! while a dispatch is iterating.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use riptide_protocol::{EventKind, Payload};
use tracing::debug;

use crate::metrics;
use crate::session::Session;

/// Erased handler callback. Receives the owning session and the
/// dispatched payload.
pub(crate) type Callback = dyn Fn(&Arc<Session>, &Payload) + Send + Sync;

/// Deregistration token returned by subscribe operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    id: u64,
    /// `None` marks a wildcard registration.
    kind: Option<EventKind>,
}

#[derive(Clone)]
pub(crate) struct HandlerEntry {
    pub(crate) id: u64,
    pub(crate) once: bool,
    /// Claim flag for one-shot entries; the first dispatcher to flip it
    /// owns the single invocation.
    pub(crate) fired: Arc<AtomicBool>,
    pub(crate) callback: Arc<Callback>,
}

#[derive(Default)]
struct Tables {
    by_kind: HashMap<EventKind, Vec<HandlerEntry>>,
    wildcard: Vec<HandlerEntry>,
}

impl Tables {
    fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum::<usize>() + self.wildcard.len()
    }
}

/// Registry of event handlers, safe under concurrent mutation.
pub(crate) struct HandlerRegistry {
    next_id: AtomicU64,
    tables: RwLock<Tables>,
}

impl HandlerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            tables: RwLock::new(Tables::default()),
        }
    }

    // Callbacks never run under the registry lock, so a poisoned lock
    // only means a panic elsewhere in the process; keep serving.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a callback for a kind, or as a wildcard when `kind` is
    /// `None`.
    pub(crate) fn subscribe(
        &self,
        kind: Option<EventKind>,
        once: bool,
        callback: Arc<Callback>,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = HandlerEntry {
            id,
            once,
            fired: Arc::new(AtomicBool::new(false)),
            callback,
        };

        let total = {
            let mut tables = self.write();
            match &kind {
                Some(kind) => tables.by_kind.entry(kind.clone()).or_default().push(entry),
                None => tables.wildcard.push(entry),
            }
            tables.len()
        };
        metrics::set_active_handlers(total);

        debug!(
            id,
            kind = kind.as_ref().map_or("*", EventKind::as_tag),
            once,
            "handler registered"
        );
        Subscription { id, kind }
    }

    /// Remove a registration. Safe to call from within an executing
    /// callback; the current dispatch keeps iterating its snapshot.
    ///
    /// Returns `false` if the registration was already gone.
    pub(crate) fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let (removed, total) = {
            let mut tables = self.write();
            let removed = match &subscription.kind {
                Some(kind) => match tables.by_kind.get_mut(kind) {
                    Some(entries) => {
                        let before = entries.len();
                        entries.retain(|e| e.id != subscription.id);
                        before != entries.len()
                    }
                    None => false,
                },
                None => {
                    let before = tables.wildcard.len();
                    tables.wildcard.retain(|e| e.id != subscription.id);
                    before != tables.wildcard.len()
                }
            };
            (removed, tables.len())
        };

        if removed {
            metrics::set_active_handlers(total);
            debug!(id = subscription.id, "handler removed");
        }
        removed
    }

    /// One-shot removal after a claimed invocation. Identical to
    /// [`HandlerRegistry::unsubscribe`] but keyed directly.
    pub(crate) fn remove_fired(&self, kind: Option<&EventKind>, id: u64) {
        self.unsubscribe(&Subscription {
            id,
            kind: kind.cloned(),
        });
    }

    /// Snapshot the handlers a payload of `kind` reaches: exact-kind
    /// entries first, wildcard entries after, both in registration
    /// order.
    pub(crate) fn snapshot(&self, kind: &EventKind) -> (Vec<HandlerEntry>, Vec<HandlerEntry>) {
        let tables = self.read();
        let exact = tables.by_kind.get(kind).cloned().unwrap_or_default();
        (exact, tables.wildcard.clone())
    }

    /// Whether a registration is still listed.
    pub(crate) fn contains(&self, subscription: &Subscription) -> bool {
        let tables = self.read();
        match &subscription.kind {
            Some(kind) => tables
                .by_kind
                .get(kind)
                .is_some_and(|entries| entries.iter().any(|e| e.id == subscription.id)),
            None => tables.wildcard.iter().any(|e| e.id == subscription.id),
        }
    }

    /// Total registered handlers.
    pub(crate) fn len(&self) -> usize {
        self.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Arc<Callback> {
        Arc::new(|_, _| {})
    }

    #[test]
    fn test_snapshot_preserves_registration_order() {
        let registry = HandlerRegistry::new();
        let a = registry.subscribe(Some(EventKind::MessageCreate), false, noop());
        let b = registry.subscribe(Some(EventKind::MessageCreate), false, noop());
        let _w = registry.subscribe(None, false, noop());

        let (exact, wildcard) = registry.snapshot(&EventKind::MessageCreate);
        assert_eq!(exact.len(), 2);
        assert_eq!(wildcard.len(), 1);
        assert!(exact[0].id < exact[1].id);

        assert!(registry.contains(&a));
        assert!(registry.unsubscribe(&a));
        assert!(!registry.contains(&a));
        assert!(!registry.unsubscribe(&a));
        assert!(registry.contains(&b));
    }

    #[test]
    fn test_kind_isolation() {
        let registry = HandlerRegistry::new();
        registry.subscribe(Some(EventKind::MessageCreate), false, noop());

        let (exact, _) = registry.snapshot(&EventKind::MessageDelete);
        assert!(exact.is_empty());
    }

    #[test]
    fn test_unsubscribe_while_snapshot_held() {
        let registry = HandlerRegistry::new();
        let a = registry.subscribe(Some(EventKind::Ready), false, noop());

        let (snapshot, _) = registry.snapshot(&EventKind::Ready);
        assert!(registry.unsubscribe(&a));
        // The held snapshot is unaffected by the removal.
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 0);
    }
}
