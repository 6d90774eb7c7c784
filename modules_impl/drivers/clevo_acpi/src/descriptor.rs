//! Interface descriptor: the identity and event-subscriber slot handed to the
//! keyboard subsystem. It outlives any single device binding.

use clevo_modules::EventCallback;
use core::fmt;
use spin::RwLock;

/// Named capability record with a single replaceable event subscriber
pub struct InterfaceDescriptor {
    string_id: &'static str,
    event_callback: RwLock<Option<EventCallback>>,
}

impl InterfaceDescriptor {
    /// Create a descriptor with no subscriber
    pub const fn new(string_id: &'static str) -> Self {
        Self {
            string_id,
            event_callback: RwLock::new(None),
        }
    }

    /// Identity string
    pub fn string_id(&self) -> &'static str {
        self.string_id
    }

    /// Install `callback`, returning the subscriber it replaced
    pub fn subscribe(&self, callback: EventCallback) -> Option<EventCallback> {
        self.event_callback.write().replace(callback)
    }

    /// Remove the subscriber
    pub fn unsubscribe(&self) -> Option<EventCallback> {
        self.event_callback.write().take()
    }

    /// Current subscriber
    ///
    /// Returned by clone so it can be invoked without holding the slot lock.
    pub fn callback(&self) -> Option<EventCallback> {
        self.event_callback.read().clone()
    }

    /// Is a subscriber installed?
    pub fn has_subscriber(&self) -> bool {
        self.event_callback.read().is_some()
    }
}

impl fmt::Debug for InterfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceDescriptor")
            .field("string_id", &self.string_id)
            .field("subscribed", &self.has_subscriber())
            .finish()
    }
}
