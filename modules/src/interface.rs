//! # Keyboard Interface Boundary
//!
//! Interface drivers (ACPI, WMI, ...) expose the same small capability to the
//! keyboard subsystem: a firmware method call and a single event subscriber.
//! The subsystem keeps the registered interfaces by their string id.

use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use spin::RwLock;

/// Callback invoked with the firmware event code
pub type EventCallback = Arc<dyn Fn(u32) + Send + Sync>;

/// Result type for interface operations
pub type InterfaceResult<T> = Result<T, InterfaceError>;

/// Interface errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceError {
    /// No interface with this id is registered
    NotRegistered,
    /// The subsystem has not been initialized
    NotInitialized,
    /// The driver behind the interface failed with this status code
    Driver(i32),
}

impl InterfaceError {
    /// Negative status code, as returned across the interface
    pub fn status(&self) -> i32 {
        match self {
            Self::NotRegistered => -19,
            Self::NotInitialized => -11,
            Self::Driver(status) => *status,
        }
    }
}

impl fmt::Display for InterfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRegistered => write!(f, "interface not registered"),
            Self::NotInitialized => write!(f, "keyboard subsystem not initialized"),
            Self::Driver(status) => write!(f, "driver status {}", status),
        }
    }
}

/// Capability an interface driver hands to the keyboard subsystem
///
/// The subsystem holds it without knowing anything about the driver's binding
/// state. At most one event subscriber is installed at a time.
pub trait ClevoInterface: Send + Sync {
    /// Identity of the interface (e.g. `"clevo_acpi"`)
    fn string_id(&self) -> &'static str;

    /// Issue a firmware command
    fn method_call(&self, cmd: u8, arg: u32) -> InterfaceResult<u32>;

    /// Install the event subscriber, returning the one it replaced
    fn subscribe(&self, callback: EventCallback) -> Option<EventCallback>;

    /// Remove the event subscriber, returning it
    fn unsubscribe(&self) -> Option<EventCallback>;

    /// Issue a firmware command, flattened to a `(status, value)` pair
    ///
    /// Status is `0` on success, a negative code otherwise; value is `0`
    /// when no result was produced.
    fn method_call_status(&self, cmd: u8, arg: u32) -> (i32, u32) {
        match self.method_call(cmd, arg) {
            Ok(value) => (0, value),
            Err(e) => (e.status(), 0),
        }
    }
}

/// Keyboard subsystem entry points consumed by interface drivers
pub trait KeyboardSubsystem: Send + Sync {
    /// Initialize the subsystem; repeated calls are no-ops
    fn init(&self) -> InterfaceResult<()>;

    /// Register an interface
    fn add_interface(&self, interface: Arc<dyn ClevoInterface>) -> InterfaceResult<()>;

    /// Unregister an interface
    fn remove_interface(&self, interface: &dyn ClevoInterface) -> InterfaceResult<()>;
}

/// Interface registry
///
/// In-tree [`KeyboardSubsystem`]: tracks initialization and keeps one entry
/// per interface id. Registering an id again replaces the earlier entry.
pub struct InterfaceRegistry {
    /// Set once `init` has run
    initialized: AtomicBool,
    /// Number of `init` calls that actually initialized
    init_count: AtomicUsize,
    /// Registered interfaces
    interfaces: RwLock<BTreeMap<&'static str, Arc<dyn ClevoInterface>>>,
}

static_assertions::assert_impl_all!(InterfaceRegistry: Send, Sync);

impl InterfaceRegistry {
    /// Create a new registry
    pub const fn new() -> Self {
        Self {
            initialized: AtomicBool::new(false),
            init_count: AtomicUsize::new(0),
            interfaces: RwLock::new(BTreeMap::new()),
        }
    }

    /// Has the subsystem been initialized?
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// How many times initialization actually ran (0 or 1)
    pub fn init_count(&self) -> usize {
        self.init_count.load(Ordering::Acquire)
    }

    /// Get an interface by id
    pub fn get(&self, id: &str) -> Option<Arc<dyn ClevoInterface>> {
        self.interfaces.read().get(id).cloned()
    }

    /// Is an interface with this id registered?
    pub fn is_registered(&self, id: &str) -> bool {
        self.interfaces.read().contains_key(id)
    }

    /// Ids of all registered interfaces
    pub fn ids(&self) -> Vec<&'static str> {
        self.interfaces.read().keys().copied().collect()
    }

    /// Number of registered interfaces
    pub fn len(&self) -> usize {
        self.interfaces.read().len()
    }

    /// Is the registry empty?
    pub fn is_empty(&self) -> bool {
        self.interfaces.read().is_empty()
    }
}

impl Default for InterfaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InterfaceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceRegistry")
            .field("initialized", &self.is_initialized())
            .field("interfaces", &self.ids())
            .finish()
    }
}

impl KeyboardSubsystem for InterfaceRegistry {
    fn init(&self) -> InterfaceResult<()> {
        if self
            .initialized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.init_count.fetch_add(1, Ordering::AcqRel);
            log::info!("[clevo_keyboard] initialized");
        }
        Ok(())
    }

    fn add_interface(&self, interface: Arc<dyn ClevoInterface>) -> InterfaceResult<()> {
        if !self.is_initialized() {
            return Err(InterfaceError::NotInitialized);
        }
        let id = interface.string_id();
        if self.interfaces.write().insert(id, interface).is_some() {
            log::debug!("[clevo_keyboard] interface {} re-registered", id);
        } else {
            log::info!("[clevo_keyboard] interface {} added", id);
        }
        Ok(())
    }

    fn remove_interface(&self, interface: &dyn ClevoInterface) -> InterfaceResult<()> {
        let id = interface.string_id();
        match self.interfaces.write().remove(id) {
            Some(_) => {
                log::info!("[clevo_keyboard] interface {} removed", id);
                Ok(())
            }
            None => Err(InterfaceError::NotRegistered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spin::Mutex;

    struct Fixed {
        id: &'static str,
        value: u32,
        callback: Mutex<Option<EventCallback>>,
    }

    impl Fixed {
        fn new(id: &'static str, value: u32) -> Arc<Self> {
            Arc::new(Self { id, value, callback: Mutex::new(None) })
        }
    }

    impl ClevoInterface for Fixed {
        fn string_id(&self) -> &'static str {
            self.id
        }

        fn method_call(&self, cmd: u8, _arg: u32) -> InterfaceResult<u32> {
            if cmd == 0xff {
                Err(InterfaceError::Driver(-61))
            } else {
                Ok(self.value)
            }
        }

        fn subscribe(&self, callback: EventCallback) -> Option<EventCallback> {
            self.callback.lock().replace(callback)
        }

        fn unsubscribe(&self) -> Option<EventCallback> {
            self.callback.lock().take()
        }
    }

    #[test]
    fn test_init_is_idempotent() {
        let registry = InterfaceRegistry::new();
        assert!(!registry.is_initialized());
        registry.init().unwrap();
        registry.init().unwrap();
        assert!(registry.is_initialized());
        assert_eq!(registry.init_count(), 1);
    }

    #[test]
    fn test_add_requires_init() {
        let registry = InterfaceRegistry::new();
        let iface = Fixed::new("clevo_acpi", 1);
        assert_eq!(registry.add_interface(iface), Err(InterfaceError::NotInitialized));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_and_remove() {
        let registry = InterfaceRegistry::new();
        registry.init().unwrap();

        let acpi = Fixed::new("clevo_acpi", 1);
        let wmi = Fixed::new("clevo_wmi", 2);
        registry.add_interface(acpi.clone()).unwrap();
        registry.add_interface(wmi.clone()).unwrap();
        assert_eq!(registry.ids(), vec!["clevo_acpi", "clevo_wmi"]);

        registry.remove_interface(acpi.as_ref()).unwrap();
        assert!(!registry.is_registered("clevo_acpi"));
        assert_eq!(registry.remove_interface(acpi.as_ref()), Err(InterfaceError::NotRegistered));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_same_id_replaces() {
        let registry = InterfaceRegistry::new();
        registry.init().unwrap();
        registry.add_interface(Fixed::new("clevo_acpi", 1)).unwrap();
        registry.add_interface(Fixed::new("clevo_acpi", 2)).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("clevo_acpi").unwrap().method_call(0, 0), Ok(2));
    }

    #[test]
    fn test_method_call_status() {
        let iface = Fixed::new("clevo_acpi", 0x2A);
        assert_eq!(iface.method_call_status(0x01, 5), (0, 0x2A));
        assert_eq!(iface.method_call_status(0xff, 5), (-61, 0));
    }

    #[test]
    fn test_subscribe_replaces() {
        let iface = Fixed::new("clevo_acpi", 0);
        let first: EventCallback = Arc::new(|_| {});
        assert!(iface.subscribe(first.clone()).is_none());
        let previous = iface.subscribe(Arc::new(|_| {})).unwrap();
        assert!(Arc::ptr_eq(&previous, &first));
        assert!(iface.unsubscribe().is_some());
        assert!(iface.unsubscribe().is_none());
    }
}
