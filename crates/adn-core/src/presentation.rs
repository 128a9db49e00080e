//! Presentation bus
//!
//! Frontends mirror the review state by subscribing an observer under a key.
//! The bus holds a single current view: publishing replaces it, and every
//! ready observer receives it. Observers that are not ready yet are parked and
//! receive the latest view when [`PresentationBus::retry_pending`] is called
//! after they become ready, so a late observer never sees a stale view.

/// Receives views published on a [`PresentationBus`]
pub trait PresentationObserver<V> {
    /// Whether the observer can accept a view now
    fn is_ready(&self) -> bool {
        true
    }

    fn render(&mut self, view: &V);
}

struct Subscription<V> {
    key: String,
    observer: Box<dyn PresentationObserver<V>>,
    pending: bool,
}

/// Keyed observer registry with a single overwritable current view
pub struct PresentationBus<V> {
    current: Option<V>,
    subscriptions: Vec<Subscription<V>>,
}

impl<V> Default for PresentationBus<V> {
    fn default() -> Self {
        Self {
            current: None,
            subscriptions: Vec::new(),
        }
    }
}

impl<V> PresentationBus<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer under `key`, replacing any observer already
    /// registered there. Returns `true` when an existing entry was replaced.
    ///
    /// If a view has already been published it is delivered right away.
    pub fn subscribe(
        &mut self,
        key: impl Into<String>,
        observer: Box<dyn PresentationObserver<V>>,
    ) -> bool {
        let key = key.into();
        let mut subscription = Subscription {
            key: key.clone(),
            observer,
            pending: false,
        };

        if let Some(view) = &self.current {
            deliver(&mut subscription, view);
        }

        match self.subscriptions.iter_mut().find(|s| s.key == key) {
            Some(existing) => {
                tracing::debug!(key = %key, "Replacing presentation observer");
                *existing = subscription;
                true
            }
            None => {
                self.subscriptions.push(subscription);
                false
            }
        }
    }

    pub fn unsubscribe(&mut self, key: &str) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.key != key);
        self.subscriptions.len() != before
    }

    /// Replace the current view and deliver it to every ready observer.
    pub fn publish(&mut self, view: V) {
        let view = self.current.insert(view);
        for subscription in &mut self.subscriptions {
            deliver(subscription, view);
        }
    }

    /// Deliver the current view to parked observers that are now ready.
    /// Returns the number of observers that received it.
    pub fn retry_pending(&mut self) -> usize {
        let Some(view) = &self.current else {
            return 0;
        };

        let mut delivered = 0;
        for subscription in self.subscriptions.iter_mut().filter(|s| s.pending) {
            if deliver(subscription, view) {
                delivered += 1;
            }
        }
        delivered
    }

    pub fn current(&self) -> Option<&V> {
        self.current.as_ref()
    }

    pub fn pending_count(&self) -> usize {
        self.subscriptions.iter().filter(|s| s.pending).count()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

fn deliver<V>(subscription: &mut Subscription<V>, view: &V) -> bool {
    if subscription.observer.is_ready() {
        subscription.observer.render(view);
        subscription.pending = false;
        true
    } else {
        subscription.pending = true;
        false
    }
}
