//! Bridge to the desktop shell hosting the viewer
//!
//! The shell answers queries such as [`ShellBridge::get_full_screen`] and
//! pushes events through a [`ShellEvents`] bus. Listeners are held by
//! [`Subscription`] handles and removed when the handle is dropped.

use std::sync::{Arc, Mutex, Weak};

use serde::{Deserialize, Serialize};

use super::error::ShellError;

/// Payload of the `fullscreen-changed` event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullscreenChanged {
    pub is_full: bool,
}

/// Events pushed by the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    FullscreenChanged(FullscreenChanged),
}

impl ShellEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ShellEvent::FullscreenChanged(_) => "fullscreen-changed",
        }
    }
}

type Listener = Box<dyn Fn(&ShellEvent) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Arc<Listener>)>,
}

/// Event bus shared between the shell and its subscribers
#[derive(Clone, Default)]
pub struct ShellEvents {
    listeners: Arc<Mutex<Listeners>>,
}

impl std::fmt::Debug for ShellEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl ShellEvents {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it stays registered while the handle lives
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ShellEvent) + Send + Sync + 'static,
    {
        let mut listeners = match self.listeners.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let id = listeners.next_id;
        listeners.next_id += 1;
        let listener: Listener = Box::new(listener);
        listeners.entries.push((id, Arc::new(listener)));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Deliver an event to every current listener
    pub fn emit(&self, event: &ShellEvent) {
        // Listeners run outside the lock so they may subscribe or unsubscribe.
        let snapshot: Vec<Arc<Listener>> = match self.listeners.lock() {
            Ok(guard) => guard.entries.iter().map(|(_, l)| Arc::clone(l)).collect(),
            Err(poisoned) => poisoned
                .into_inner()
                .entries
                .iter()
                .map(|(_, l)| Arc::clone(l))
                .collect(),
        };

        tracing::debug!("Shell event `{}` to {} listeners", event.name(), snapshot.len());
        for listener in snapshot {
            (listener.as_ref())(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .map(|guard| guard.entries.len())
            .unwrap_or(0)
    }
}

/// Handle keeping a listener registered
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Remove the listener now
    #[allow(dead_code)]
    pub fn unsubscribe(self) {}

    fn remove(&self) {
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };
        let mut guard = match listeners.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.entries.retain(|(id, _)| *id != self.id);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Desktop shell capabilities used by the viewer
pub trait ShellBridge {
    /// Current fullscreen state; shells without the query keep the default
    fn get_full_screen(&self) -> Result<bool, ShellError> {
        Err(ShellError::Unsupported)
    }

    /// Event bus the shell emits on
    fn events(&self) -> &ShellEvents;
}

/// View state mirroring the shell's fullscreen flag
#[derive(Debug)]
pub struct FullscreenMirror {
    is_full: Arc<Mutex<bool>>,
    _subscription: Subscription,
}

impl FullscreenMirror {
    /// Query the current state and follow `fullscreen-changed` events
    pub fn attach(bridge: &dyn ShellBridge) -> Self {
        let is_full = Arc::new(Mutex::new(false));

        let state = Arc::clone(&is_full);
        let subscription = bridge.events().subscribe(move |event| {
            let ShellEvent::FullscreenChanged(change) = event;
            if let Ok(mut flag) = state.lock() {
                *flag = change.is_full;
            }
        });

        let mirror = Self {
            is_full,
            _subscription: subscription,
        };
        mirror.refresh(bridge);
        mirror
    }

    /// Re-query the shell; failures leave the current state unchanged
    pub fn refresh(&self, bridge: &dyn ShellBridge) {
        if let Ok(full) = bridge.get_full_screen() {
            self.set(full);
        }
    }

    pub fn is_full(&self) -> bool {
        self.is_full.lock().map(|flag| *flag).unwrap_or(false)
    }

    fn set(&self, full: bool) {
        if let Ok(mut flag) = self.is_full.lock() {
            *flag = full;
        }
    }
}
