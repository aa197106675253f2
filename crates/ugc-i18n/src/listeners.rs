//! Language-change observers

use crate::language::Language;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Callback invoked with the new language after a switch
pub type LanguageListener = Arc<dyn Fn(Language) + Send + Sync>;

/// Set of listeners keyed by callback identity.
///
/// Notification runs over a snapshot taken before the first callback, so a
/// listener may add or remove listeners (itself included) while being called.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Mutex<Vec<LanguageListener>>,
}

fn same(a: &LanguageListener, b: &LanguageListener) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`; returns false if it was already registered
    pub fn add(&self, listener: LanguageListener) -> bool {
        let mut listeners = self.listeners.lock();
        if listeners.iter().any(|l| same(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Unregister `listener`; returns false if it was not registered
    pub fn remove(&self, listener: &LanguageListener) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|l| !same(l, listener));
        listeners.len() != before
    }

    /// Call every registered listener with `language`
    pub fn notify(&self, language: Language) {
        let snapshot: Vec<LanguageListener> = self.listeners.lock().clone();
        for listener in snapshot {
            listener(language);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, LanguageListener) {
        let count = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&count);
        let listener: LanguageListener = Arc::new(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        (count, listener)
    }

    #[test]
    fn test_duplicate_add_is_ignored() {
        let set = ListenerSet::new();
        let (count, listener) = counter();

        assert!(set.add(Arc::clone(&listener)));
        assert!(!set.add(Arc::clone(&listener)));
        set.notify(Language::English);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let set = ListenerSet::new();
        let (_, listener) = counter();
        assert!(!set.remove(&listener));
        assert!(set.is_empty());
    }

    #[test]
    fn test_listener_can_remove_itself_during_notify() {
        let set = Arc::new(ListenerSet::new());
        let (other_count, other) = counter();

        let slot: Arc<Mutex<Option<LanguageListener>>> = Arc::new(Mutex::new(None));
        let self_removing: LanguageListener = {
            let set = Arc::clone(&set);
            let slot = Arc::clone(&slot);
            Arc::new(move |_| {
                if let Some(me) = slot.lock().take() {
                    set.remove(&me);
                }
            })
        };
        *slot.lock() = Some(Arc::clone(&self_removing));

        set.add(self_removing);
        set.add(other);
        set.notify(Language::Ukrainian);

        assert_eq!(other_count.load(Ordering::SeqCst), 1);
        assert_eq!(set.len(), 1);
    }
}
