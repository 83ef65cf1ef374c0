//! Snapshot-iterating listener registry.
//!
//! Notification takes a copy of the subscriber list before iterating, so a
//! listener that adds or removes subscribers from inside a callback never
//! corrupts an in-flight broadcast. Listener identity is `Arc` pointer
//! identity.

use std::sync::Arc;

use parking_lot::RwLock;

/// Registry of `Arc` listeners with copy-before-iterate broadcast.
pub struct Listeners<L: ?Sized> {
    inner: RwLock<Vec<Arc<L>>>,
}

impl<L: ?Sized> Default for Listeners<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> Listeners<L> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }

    /// Number of registered listeners.
    pub fn count(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether this exact listener (by pointer identity) is registered.
    pub fn contains(&self, listener: &Arc<L>) -> bool {
        self.inner.read().iter().any(|l| Arc::ptr_eq(l, listener))
    }

    /// Registers a listener. Returns false if it was already registered.
    pub fn add(&self, listener: Arc<L>) -> bool {
        let mut inner = self.inner.write();
        if inner.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return false;
        }
        inner.push(listener);
        true
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn remove(&self, listener: &Arc<L>) -> bool {
        let mut inner = self.inner.write();
        let before = inner.len();
        inner.retain(|l| !Arc::ptr_eq(l, listener));
        inner.len() != before
    }

    /// Registers a listener unless already present.
    pub fn ensure(&self, listener: Arc<L>) -> bool {
        self.add(listener)
    }

    /// Copy of the current subscriber list.
    pub fn snapshot(&self) -> Vec<Arc<L>> {
        self.inner.read().clone()
    }

    /// Invokes `action` for every listener registered at the time of the
    /// call, iterating over a snapshot.
    pub fn for_each(&self, mut action: impl FnMut(&L)) {
        for listener in self.snapshot() {
            action(&listener);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Probe: Send + Sync {
        fn poke(&self);
    }

    struct Counter(AtomicUsize);

    impl Probe for Counter {
        fn poke(&self) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_add_remove_dedupe() {
        let listeners: Listeners<dyn Probe> = Listeners::new();
        let a: Arc<dyn Probe> = Arc::new(Counter(AtomicUsize::new(0)));
        let b: Arc<dyn Probe> = Arc::new(Counter(AtomicUsize::new(0)));

        assert!(listeners.add(a.clone()));
        assert!(!listeners.add(a.clone()));
        assert!(listeners.ensure(b.clone()));
        assert!(!listeners.ensure(b.clone()));
        assert_eq!(listeners.count(), 2);

        assert!(listeners.remove(&a));
        assert!(!listeners.remove(&a));
        assert_eq!(listeners.count(), 1);
    }

    #[test]
    fn test_broadcast_reaches_all() {
        let listeners: Listeners<dyn Probe> = Listeners::new();
        let a = Arc::new(Counter(AtomicUsize::new(0)));
        let b = Arc::new(Counter(AtomicUsize::new(0)));
        listeners.add(a.clone() as Arc<dyn Probe>);
        listeners.add(b.clone() as Arc<dyn Probe>);

        listeners.for_each(|l| l.poke());

        assert_eq!(a.0.load(Ordering::Relaxed), 1);
        assert_eq!(b.0.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_mutation_during_broadcast_is_safe() {
        struct SelfRemover {
            registry: Arc<Listeners<dyn Probe>>,
            me: parking_lot::Mutex<Option<Arc<dyn Probe>>>,
            hits: AtomicUsize,
        }

        impl Probe for SelfRemover {
            fn poke(&self) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                if let Some(me) = self.me.lock().take() {
                    self.registry.remove(&me);
                }
            }
        }

        let registry = Arc::new(Listeners::<dyn Probe>::new());
        let remover = Arc::new(SelfRemover {
            registry: registry.clone(),
            me: parking_lot::Mutex::new(None),
            hits: AtomicUsize::new(0),
        });
        let as_probe: Arc<dyn Probe> = remover.clone();
        *remover.me.lock() = Some(as_probe.clone());
        registry.add(as_probe);

        let tail = Arc::new(Counter(AtomicUsize::new(0)));
        registry.add(tail.clone() as Arc<dyn Probe>);

        // The remover unsubscribes itself mid-broadcast; the snapshot
        // still delivers to every listener present at the start.
        registry.for_each(|l| l.poke());
        assert_eq!(remover.hits.load(Ordering::Relaxed), 1);
        assert_eq!(tail.0.load(Ordering::Relaxed), 1);
        assert_eq!(registry.count(), 1);

        registry.for_each(|l| l.poke());
        assert_eq!(remover.hits.load(Ordering::Relaxed), 1);
        assert_eq!(tail.0.load(Ordering::Relaxed), 2);
    }
}
