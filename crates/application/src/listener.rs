//! Project listeners and their registry.
//!
//! Listeners are kept in an ordered map keyed by [`ListenerId`]. Every
//! dispatch copies the map into a snapshot first, so a listener may add or
//! remove listeners (itself included) while being notified without
//! affecting the pass in progress.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use apiforge_domain::{Interface, MockService, TestSuite};
use parking_lot::RwLock;

use crate::error::ListenerError;

/// Observer of structural project changes.
///
/// Every callback defaults to a no-op.
#[allow(unused_variables)]
pub trait ProjectListener: Send + Sync {
    /// An interface was added or imported.
    fn interface_added(&self, interface: &Arc<Interface>) -> Result<(), ListenerError> {
        Ok(())
    }

    /// An interface is being removed. It is released afterwards.
    fn interface_removed(&self, interface: &Arc<Interface>) -> Result<(), ListenerError> {
        Ok(())
    }

    /// An interface changed without being added or removed.
    fn interface_updated(&self, interface: &Arc<Interface>) -> Result<(), ListenerError> {
        Ok(())
    }

    /// A test suite was added or imported.
    fn test_suite_added(&self, test_suite: &Arc<TestSuite>) -> Result<(), ListenerError> {
        Ok(())
    }

    /// A test suite is being removed. It is released afterwards.
    fn test_suite_removed(&self, test_suite: &Arc<TestSuite>) -> Result<(), ListenerError> {
        Ok(())
    }

    /// A mock service was added or imported.
    fn mock_service_added(&self, mock_service: &Arc<MockService>) -> Result<(), ListenerError> {
        Ok(())
    }

    /// A mock service is being removed. It is released afterwards.
    fn mock_service_removed(&self, mock_service: &Arc<MockService>) -> Result<(), ListenerError> {
        Ok(())
    }
}

/// A structural change.
#[derive(Debug, Clone)]
pub enum ProjectEvent {
    /// See [`ProjectListener::interface_added`].
    InterfaceAdded(Arc<Interface>),
    /// See [`ProjectListener::interface_removed`].
    InterfaceRemoved(Arc<Interface>),
    /// See [`ProjectListener::interface_updated`].
    InterfaceUpdated(Arc<Interface>),
    /// See [`ProjectListener::test_suite_added`].
    TestSuiteAdded(Arc<TestSuite>),
    /// See [`ProjectListener::test_suite_removed`].
    TestSuiteRemoved(Arc<TestSuite>),
    /// See [`ProjectListener::mock_service_added`].
    MockServiceAdded(Arc<MockService>),
    /// See [`ProjectListener::mock_service_removed`].
    MockServiceRemoved(Arc<MockService>),
}

impl ProjectEvent {
    fn deliver(&self, listener: &dyn ProjectListener) -> Result<(), ListenerError> {
        match self {
            Self::InterfaceAdded(iface) => listener.interface_added(iface),
            Self::InterfaceRemoved(iface) => listener.interface_removed(iface),
            Self::InterfaceUpdated(iface) => listener.interface_updated(iface),
            Self::TestSuiteAdded(suite) => listener.test_suite_added(suite),
            Self::TestSuiteRemoved(suite) => listener.test_suite_removed(suite),
            Self::MockServiceAdded(mock) => listener.mock_service_added(mock),
            Self::MockServiceRemoved(mock) => listener.mock_service_removed(mock),
        }
    }
}

/// Handle of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Registry of project listeners.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: RwLock<BTreeMap<ListenerId, Arc<dyn ProjectListener>>>,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    ///
    /// Registering the same `Arc` twice returns the existing handle.
    pub fn add(&self, listener: Arc<dyn ProjectListener>) -> ListenerId {
        let mut listeners = self.listeners.write();
        if let Some((id, _)) = listeners
            .iter()
            .find(|(_, existing)| Arc::ptr_eq(existing, &listener))
        {
            return *id;
        }

        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        listeners.insert(id, listener);
        id
    }

    /// Unregisters a listener. Unknown handles are ignored.
    pub fn remove(&self, id: ListenerId) -> bool {
        self.listeners.write().remove(&id).is_some()
    }

    /// Removes all listeners.
    pub fn clear(&self) {
        self.listeners.write().clear();
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Returns true if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    fn snapshot(&self) -> Vec<Arc<dyn ProjectListener>> {
        self.listeners.read().values().cloned().collect()
    }

    /// Delivers `event` to every listener registered when the call started.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first listener error.
    pub fn notify(&self, event: &ProjectEvent) -> Result<(), ListenerError> {
        for listener in self.snapshot() {
            event.deliver(listener.as_ref())?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct Counting {
        added: AtomicUsize,
    }

    impl ProjectListener for Counting {
        fn interface_added(&self, _interface: &Arc<Interface>) -> Result<(), ListenerError> {
            self.added.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn event() -> ProjectEvent {
        ProjectEvent::InterfaceAdded(Arc::new(Interface::new(
            "id",
            "Petstore",
            apiforge_domain::InterfaceKind::Rest,
        )))
    }

    #[test]
    fn test_same_listener_is_registered_once() {
        let registry = ListenerRegistry::new();
        let listener: Arc<dyn ProjectListener> = Arc::new(Counting::default());
        let first = registry.add(Arc::clone(&listener));
        let second = registry.add(listener);
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry = ListenerRegistry::new();
        let id = registry.add(Arc::new(Counting::default()));
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_listener_added_during_dispatch_misses_current_pass() {
        struct Adder {
            registry: Arc<ListenerRegistry>,
            late: Arc<Counting>,
        }

        impl ProjectListener for Adder {
            fn interface_added(&self, _interface: &Arc<Interface>) -> Result<(), ListenerError> {
                self.registry
                    .add(Arc::clone(&self.late) as Arc<dyn ProjectListener>);
                Ok(())
            }
        }

        let registry = Arc::new(ListenerRegistry::new());
        let late = Arc::new(Counting::default());
        registry.add(Arc::new(Adder {
            registry: Arc::clone(&registry),
            late: Arc::clone(&late),
        }));

        registry.notify(&event()).unwrap();
        assert_eq!(late.added.load(Ordering::SeqCst), 0);

        registry.notify(&event()).unwrap();
        assert_eq!(late.added.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_removing_itself_during_dispatch() {
        struct SelfRemoving {
            registry: Arc<ListenerRegistry>,
            id: Mutex<Option<ListenerId>>,
            calls: AtomicUsize,
        }

        impl ProjectListener for SelfRemoving {
            fn interface_added(&self, _interface: &Arc<Interface>) -> Result<(), ListenerError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if let Some(id) = self.id.lock().take() {
                    self.registry.remove(id);
                }
                Ok(())
            }
        }

        let registry = Arc::new(ListenerRegistry::new());
        let listener = Arc::new(SelfRemoving {
            registry: Arc::clone(&registry),
            id: Mutex::new(None),
            calls: AtomicUsize::new(0),
        });
        let id = registry.add(Arc::clone(&listener) as Arc<dyn ProjectListener>);
        *listener.id.lock() = Some(id);

        registry.notify(&event()).unwrap();
        registry.notify(&event()).unwrap();
        assert_eq!(listener.calls.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_first_error_stops_dispatch() {
        struct Failing;
        impl ProjectListener for Failing {
            fn interface_added(&self, _interface: &Arc<Interface>) -> Result<(), ListenerError> {
                Err(ListenerError::new("boom"))
            }
        }

        let registry = ListenerRegistry::new();
        registry.add(Arc::new(Failing));
        assert_eq!(
            registry.notify(&event()),
            Err(ListenerError::new("boom"))
        );
    }
}
