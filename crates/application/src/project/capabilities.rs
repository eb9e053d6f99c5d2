//! Capabilities composed by [`Project`](super::Project).

use std::sync::Arc;

use apiforge_domain::persistence::{InterfaceConfig, MockServiceConfig, TestSuiteConfig};
use apiforge_domain::{Interface, MockService, TestSuite};

use crate::error::ProjectResult;
use crate::listener::{ListenerId, ProjectListener};

/// Owns an ordered, name-unique set of interfaces.
pub trait HasInterfaces {
    /// Interfaces in document order.
    fn interfaces(&self) -> &[Arc<Interface>];

    /// Number of interfaces.
    fn interface_count(&self) -> usize {
        self.interfaces().len()
    }

    /// Interface at `index`.
    fn interface_at(&self, index: usize) -> Option<&Arc<Interface>> {
        self.interfaces().get(index)
    }

    /// Interface named `name`.
    fn interface_by_name(&self, name: &str) -> Option<&Arc<Interface>> {
        self.interfaces().iter().find(|i| i.name() == name)
    }

    /// Interface whose identifier is `id`.
    fn interface_by_id(&self, id: &str) -> Option<&Arc<Interface>> {
        self.interfaces().iter().find(|i| i.id() == id)
    }

    /// Creates an interface of type `kind` (`wsdl` or `rest`).
    ///
    /// # Errors
    ///
    /// Fails for duplicate names, unknown types, disabled projects, or a
    /// failing listener (the interface is added regardless).
    fn add_interface(&mut self, name: &str, kind: &str) -> ProjectResult<Arc<Interface>>;

    /// Adds a copy of an interface node, e.g. from another project.
    ///
    /// With `create_copy` the imported node gets a fresh identifier.
    ///
    /// # Errors
    ///
    /// Same as [`HasInterfaces::add_interface`].
    fn import_interface(
        &mut self,
        config: &InterfaceConfig,
        create_copy: bool,
    ) -> ProjectResult<Arc<Interface>>;

    /// Removes an interface. It is released and its node removed even when
    /// a listener fails.
    ///
    /// # Errors
    ///
    /// Fails if the interface is not part of the project, or with the first
    /// listener error.
    fn remove_interface(&mut self, interface: &Arc<Interface>) -> ProjectResult<()>;

    /// Tells listeners that an interface changed in place, e.g. after its
    /// definition was refreshed.
    ///
    /// # Errors
    ///
    /// Fails if the interface is not part of the project, or with the first
    /// listener error.
    fn notify_interface_updated(&self, interface: &Arc<Interface>) -> ProjectResult<()>;
}

/// Owns an ordered, name-unique set of test suites.
pub trait HasTestSuites {
    /// Test suites in document order.
    fn test_suites(&self) -> &[Arc<TestSuite>];

    /// Number of test suites.
    fn test_suite_count(&self) -> usize {
        self.test_suites().len()
    }

    /// Test suite at `index`.
    fn test_suite_at(&self, index: usize) -> Option<&Arc<TestSuite>> {
        self.test_suites().get(index)
    }

    /// Test suite named `name`.
    fn test_suite_by_name(&self, name: &str) -> Option<&Arc<TestSuite>> {
        self.test_suites().iter().find(|s| s.name() == name)
    }

    /// Creates an empty test suite.
    ///
    /// # Errors
    ///
    /// Fails for duplicate names, disabled projects, or a failing listener.
    fn add_test_suite(&mut self, name: &str) -> ProjectResult<Arc<TestSuite>>;

    /// Adds a copy of a test suite node under `name`.
    ///
    /// # Errors
    ///
    /// Same as [`HasTestSuites::add_test_suite`].
    fn import_test_suite(
        &mut self,
        config: &TestSuiteConfig,
        name: &str,
        create_copy: bool,
    ) -> ProjectResult<Arc<TestSuite>>;

    /// Removes a test suite.
    ///
    /// # Errors
    ///
    /// Fails if the suite is not part of the project, or with the first
    /// listener error.
    fn remove_test_suite(&mut self, test_suite: &Arc<TestSuite>) -> ProjectResult<()>;
}

/// Owns an ordered, name-unique set of mock services.
pub trait HasMockServices {
    /// Mock services in document order.
    fn mock_services(&self) -> &[Arc<MockService>];

    /// Number of mock services.
    fn mock_service_count(&self) -> usize {
        self.mock_services().len()
    }

    /// Mock service at `index`.
    fn mock_service_at(&self, index: usize) -> Option<&Arc<MockService>> {
        self.mock_services().get(index)
    }

    /// Mock service named `name`.
    fn mock_service_by_name(&self, name: &str) -> Option<&Arc<MockService>> {
        self.mock_services().iter().find(|m| m.name() == name)
    }

    /// Creates an empty mock service.
    ///
    /// # Errors
    ///
    /// Fails for duplicate names, disabled projects, or a failing listener.
    fn add_mock_service(&mut self, name: &str) -> ProjectResult<Arc<MockService>>;

    /// Adds a copy of a mock service node under `name`.
    ///
    /// # Errors
    ///
    /// Same as [`HasMockServices::add_mock_service`].
    fn import_mock_service(
        &mut self,
        config: &MockServiceConfig,
        name: &str,
        create_copy: bool,
    ) -> ProjectResult<Arc<MockService>>;

    /// Removes a mock service.
    ///
    /// # Errors
    ///
    /// Fails if the service is not part of the project, or with the first
    /// listener error.
    fn remove_mock_service(&mut self, mock_service: &Arc<MockService>) -> ProjectResult<()>;
}

/// Accepts project listeners.
pub trait ListenerSource {
    /// Registers a listener. Adding the same `Arc` again returns its handle.
    fn add_listener(&self, listener: Arc<dyn ProjectListener>) -> ListenerId;

    /// Unregisters a listener. Returns false for unknown handles.
    fn remove_listener(&self, id: ListenerId) -> bool;

    /// Number of registered listeners.
    fn listener_count(&self) -> usize;
}
