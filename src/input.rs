use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use raylib::prelude::KeyboardKey;
use crate::constants::SWIPE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Back,
    Other,
}

impl From<KeyboardKey> for Key {
    fn from(key: KeyboardKey) -> Self {
        match key {
            KeyboardKey::KEY_LEFT => Key::ArrowLeft,
            KeyboardKey::KEY_RIGHT => Key::ArrowRight,
            KeyboardKey::KEY_BACKSPACE | KeyboardKey::KEY_ESCAPE => Key::Back,
            _ => Key::Other,
        }
    }
}

type Listener = Rc<RefCell<dyn FnMut(Key)>>;

#[derive(Default)]
struct Listeners {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Listener)>>,
}

/// Window-wide key listeners. Every pressed key is delivered to every
/// subscriber, whatever currently has focus.
#[derive(Default, Clone)]
pub struct KeyboardHub {
    listeners: Rc<Listeners>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` until the returned subscription is dropped.
    pub fn subscribe<F>(&self, listener: F) -> KeyboardSubscription
    where
        F: FnMut(Key) + 'static,
    {
        let id = self.listeners.next_id.get();
        self.listeners.next_id.set(id + 1);
        let listener: Listener = Rc::new(RefCell::new(listener));
        self.listeners.entries.borrow_mut().push((id, listener));
        log::trace!("keyboard listener {} registered", id);

        KeyboardSubscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    pub fn dispatch(&self, key: Key) {
        // Snapshot so listeners may subscribe or unsubscribe while handling a key
        let snapshot: Vec<Listener> = self
            .listeners
            .entries
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();

        for listener in snapshot {
            if let Ok(mut listener) = listener.try_borrow_mut() {
                (&mut *listener)(key);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.entries.borrow().len()
    }
}

/// Keeps one listener registered with a [`KeyboardHub`]; dropping it removes
/// the listener.
pub struct KeyboardSubscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Drop for KeyboardSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.entries.borrow_mut().retain(|(id, _)| *id != self.id);
            log::trace!("keyboard listener {} released", self.id);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    // finger moved right
    Previous,
    // finger moved left
    Next,
}

/// Tracks one horizontal touch gesture at a time.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    start_x: Option<f32>,
}

impl SwipeTracker {
    pub fn touch_start(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Ends the gesture. Travel at or below the threshold is a tap.
    pub fn touch_end(&mut self, x: f32) -> Option<Swipe> {
        let start = self.start_x.take()?;
        let delta = x - start;
        if delta.abs() > SWIPE_THRESHOLD {
            Some(if delta > 0.0 { Swipe::Previous } else { Swipe::Next })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_reaches_subscribers_until_dropped() {
        let hub = KeyboardHub::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let subscription = hub.subscribe(move |key| sink.borrow_mut().push(key));
        hub.dispatch(Key::ArrowLeft);
        assert_eq!(hub.listener_count(), 1);

        drop(subscription);
        hub.dispatch(Key::ArrowRight);
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(*seen.borrow(), vec![Key::ArrowLeft]);
    }

    #[test]
    fn subscription_outliving_hub_is_harmless() {
        let hub = KeyboardHub::new();
        let subscription = hub.subscribe(|_| {});
        drop(hub);
        drop(subscription);
    }

    #[test]
    fn swipe_threshold_boundary() {
        let mut tracker = SwipeTracker::default();
        tracker.touch_start(100.0);
        assert_eq!(tracker.touch_end(140.0), None);
        tracker.touch_start(100.0);
        assert_eq!(tracker.touch_end(60.0), None);
        tracker.touch_start(100.0);
        assert_eq!(tracker.touch_end(141.0), Some(Swipe::Previous));
        tracker.touch_start(100.0);
        assert_eq!(tracker.touch_end(59.0), Some(Swipe::Next));
    }

    #[test]
    fn start_is_reset_after_every_end() {
        let mut tracker = SwipeTracker::default();
        tracker.touch_start(0.0);
        assert_eq!(tracker.touch_end(10.0), None);
        assert_eq!(tracker.start_x, None);
        // no start recorded: the end is ignored
        assert_eq!(tracker.touch_end(500.0), None);
    }
}
