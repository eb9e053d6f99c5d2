//! Entity handles of the project graph.
//!
//! Each handle mirrors one node of the project document and is shared as
//! `Arc<_>` with listeners and callers. Identity is referential: two
//! handles built from the same node are different entities.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::DomainError;
use crate::persistence::Id;

/// Kind of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceKind {
    /// SOAP interface described by a WSDL definition.
    Wsdl,
    /// REST service.
    Rest,
}

impl InterfaceKind {
    /// Returns the label stored in the document's `type` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wsdl => "wsdl",
            Self::Rest => "rest",
        }
    }
}

impl std::fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterfaceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wsdl" | "soap" => Ok(Self::Wsdl),
            "rest" => Ok(Self::Rest),
            _ => Err(DomainError::UnsupportedInterfaceType(s.to_string())),
        }
    }
}

/// An interface of the project.
#[derive(Debug)]
pub struct Interface {
    id: Id,
    name: String,
    kind: InterfaceKind,
    released: AtomicBool,
}

impl Interface {
    /// Creates a live interface handle.
    #[must_use]
    pub fn new(id: impl Into<Id>, name: impl Into<String>, kind: InterfaceKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            released: AtomicBool::new(false),
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the interface kind.
    #[must_use]
    pub const fn kind(&self) -> InterfaceKind {
        self.kind
    }

    /// Marks the handle as released. Idempotent.
    pub fn release(&self) {
        self.released.store(true, Ordering::Release);
    }

    /// Returns true once the owning project let go of this entity.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

/// A test suite of the project.
#[derive(Debug)]
pub struct TestSuite {
    id: Id,
    name: String,
    released: AtomicBool,
}

impl TestSuite {
    /// Creates a live test suite handle.
    #[must_use]
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            released: AtomicBool::new(false),
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Marks the handle as released. Idempotent.
    pub fn release(&self) {
        self.released.store(true, Ordering::Release);
    }

    /// Returns true once the owning project let go of this entity.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

/// A mock service of the project.
#[derive(Debug)]
pub struct MockService {
    id: Id,
    name: String,
    released: AtomicBool,
}

impl MockService {
    /// Creates a live mock service handle.
    #[must_use]
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            released: AtomicBool::new(false),
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Marks the handle as released. Idempotent.
    pub fn release(&self) {
        self.released.store(true, Ordering::Release);
    }

    /// Returns true once the owning project let go of this entity.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

/// Any direct child of a project.
#[derive(Debug, Clone)]
pub enum ModelItem {
    /// An interface.
    Interface(std::sync::Arc<Interface>),
    /// A test suite.
    TestSuite(std::sync::Arc<TestSuite>),
    /// A mock service.
    MockService(std::sync::Arc<MockService>),
}

impl ModelItem {
    /// Returns the child's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Interface(iface) => iface.name(),
            Self::TestSuite(suite) => suite.name(),
            Self::MockService(mock) => mock.name(),
        }
    }
}
