use std::fmt;

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(f64) + Send + Sync>;

/// Listener list of a [`ReactiveValue`].
///
/// Listeners belong to whoever registered them, so cloning a value (for a
/// snapshot or a test fixture) yields a copy with no listeners attached.
#[derive(Default)]
struct Listeners {
    next_id: SubscriptionId,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Clone for Listeners {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

/// A numeric cell with synchronous, ordered change notification.
///
/// Writes can be staged with [`ReactiveValue::stage`] and published later with
/// [`ReactiveValue::flush`], which lets a multi-step action publish all of its
/// writes only once every step has been applied.
#[derive(Debug, Clone)]
pub struct ReactiveValue {
    value: f64,
    previous: f64,
    /// Published value the pending writes started from.
    staged_from: f64,
    pending: bool,
    listeners: Listeners,
}

impl Default for ReactiveValue {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl PartialEq for ReactiveValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl ReactiveValue {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            previous: value,
            staged_from: value,
            pending: false,
            listeners: Listeners::default(),
        }
    }

    pub fn get(&self) -> f64 {
        self.value
    }

    /// Value before the last published change.
    pub fn previous(&self) -> f64 {
        self.previous
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn set(&mut self, value: f64) {
        self.stage(value);
        self.flush();
    }

    /// Writes without notifying. Returns whether the value changed.
    pub fn stage(&mut self, value: f64) -> bool {
        if value == self.value {
            return false;
        }
        if !self.pending {
            self.staged_from = self.value;
        }
        self.value = value;
        self.pending = true;
        true
    }

    /// Notifies listeners of a staged change. Returns whether anyone was told.
    /// Writes that cancel out before the flush publish nothing.
    pub fn flush(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        if self.value == self.staged_from {
            return false;
        }
        self.previous = self.staged_from;
        self.notify();
        !self.listeners.entries.is_empty()
    }

    /// Sets the value with no transition: `previous` collapses onto the new
    /// value and listeners are told at once.
    pub fn jump(&mut self, value: f64) {
        self.value = value;
        self.previous = value;
        self.staged_from = value;
        self.pending = false;
        self.notify();
    }

    pub fn on_change(&mut self, listener: impl FnMut(f64) + Send + Sync + 'static) -> SubscriptionId {
        let id = self.listeners.next_id;
        self.listeners.next_id += 1;
        self.listeners.entries.push((id, Box::new(listener)));
        id
    }

    /// Subscribes to a value derived from this one. The selector runs again on
    /// every notification; nothing is cached between calls.
    pub fn select<T>(
        &mut self,
        selector: impl Fn(f64) -> T + Send + Sync + 'static,
        mut listener: impl FnMut(T) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.on_change(move |value| listener(selector(value)))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.entries.len();
        self.listeners.entries.retain(|(entry_id, _)| *entry_id != id);
        self.listeners.entries.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.entries.len()
    }

    fn notify(&mut self) {
        let value = self.value;
        for (_, listener) in &mut self.listeners.entries {
            listener(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::ReactiveValue;

    fn recorder() -> (Arc<Mutex<Vec<f64>>>, impl FnMut(f64) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |value| sink.lock().unwrap().push(value))
    }

    #[test]
    fn set_notifies_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut value = ReactiveValue::new(1.0);
        for tag in 0..3 {
            let order = Arc::clone(&order);
            value.on_change(move |_| order.lock().unwrap().push(tag));
        }

        value.set(2.0);

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(value.get(), 2.0);
        assert_eq!(value.previous(), 1.0);
    }

    #[test]
    fn unchanged_set_is_silent() {
        let (seen, listener) = recorder();
        let mut value = ReactiveValue::new(3.0);
        value.on_change(listener);

        value.set(3.0);

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn staged_writes_publish_once_on_flush() {
        let (seen, listener) = recorder();
        let mut value = ReactiveValue::new(10.0);
        value.on_change(listener);

        value.stage(8.0);
        value.stage(6.0);
        assert!(seen.lock().unwrap().is_empty());
        assert!(value.is_pending());

        assert!(value.flush());
        assert_eq!(*seen.lock().unwrap(), vec![6.0]);
        assert_eq!(value.previous(), 10.0);
        assert!(!value.flush());
    }

    #[test]
    fn writes_that_cancel_out_publish_nothing() {
        let (seen, listener) = recorder();
        let mut value = ReactiveValue::new(10.0);
        value.set(12.0);
        value.on_change(listener);

        value.stage(4.0);
        value.stage(12.0);

        assert!(!value.flush());
        assert!(!value.is_pending());
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(value.previous(), 10.0);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let (seen, listener) = recorder();
        let mut value = ReactiveValue::new(0.0);
        let id = value.on_change(listener);

        value.set(1.0);
        assert!(value.unsubscribe(id));
        assert!(!value.unsubscribe(id));
        value.set(2.0);

        assert_eq!(*seen.lock().unwrap(), vec![1.0]);
        assert_eq!(value.listener_count(), 0);
    }

    #[test]
    fn select_recomputes_on_every_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut value = ReactiveValue::new(0.0);
        value.select(|amount| amount >= 5.0, move |affordable| sink.lock().unwrap().push(affordable));

        value.set(4.0);
        value.set(5.0);
        value.set(7.0);

        assert_eq!(*seen.lock().unwrap(), vec![false, true, true]);
    }

    #[test]
    fn jump_collapses_previous_and_notifies() {
        let (seen, listener) = recorder();
        let mut value = ReactiveValue::new(4.0);
        value.on_change(listener);
        value.stage(9.0);

        value.jump(0.0);

        assert_eq!(value.get(), 0.0);
        assert_eq!(value.previous(), 0.0);
        assert!(!value.is_pending());
        assert_eq!(*seen.lock().unwrap(), vec![0.0]);
    }

    #[test]
    fn clones_do_not_carry_listeners() {
        let mut value = ReactiveValue::new(1.0);
        value.on_change(|_| {});

        let copy = value.clone();

        assert_eq!(copy, value);
        assert_eq!(copy.listener_count(), 0);
    }
}
