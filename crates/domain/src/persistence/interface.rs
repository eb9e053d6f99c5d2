//! Interface nodes (`interface[]`) and the credential-bearing leaves below them.

use serde::{Deserialize, Serialize};

use super::common::{Id, OpaqueFields};

/// An interface definition node.
///
/// Only the fields the engine reasons about are typed; everything else an
/// interface carries (endpoints, schema bindings) round-trips through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceConfig {
    /// Stable identifier. Absent in hand-written documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,

    /// Interface name, unique within the project.
    pub name: String,

    /// Interface type label (`wsdl`, `rest`).
    #[serde(rename = "type")]
    pub kind: String,

    /// Cached copy of the external definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_cache: Option<DefinitionCache>,

    /// Operations exposed by this interface.
    #[serde(default, rename = "operation", skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<OperationConfig>,

    /// Fields owned by the interface implementation.
    #[serde(flatten)]
    pub extra: OpaqueFields,
}

impl InterfaceConfig {
    /// Creates an empty interface node.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind: kind.into(),
            definition_cache: None,
            operations: Vec::new(),
            extra: OpaqueFields::new(),
        }
    }

    /// Adds an operation.
    #[must_use]
    pub fn with_operation(mut self, operation: OperationConfig) -> Self {
        self.operations.push(operation);
        self
    }

    /// Sets the cached definition.
    #[must_use]
    pub fn with_definition_cache(mut self, cache: DefinitionCache) -> Self {
        self.definition_cache = Some(cache);
        self
    }

    /// Iterates over every credential node below this interface.
    pub fn credentials(&self) -> impl Iterator<Item = &CredentialsConfig> {
        self.operations
            .iter()
            .flat_map(|operation| operation.requests.iter())
            .filter_map(|request| request.credentials.as_ref())
    }

    /// Iterates mutably over every credential node below this interface.
    pub fn credentials_mut(&mut self) -> impl Iterator<Item = &mut CredentialsConfig> {
        self.operations
            .iter_mut()
            .flat_map(|operation| operation.requests.iter_mut())
            .filter_map(|request| request.credentials.as_mut())
    }
}

/// Cached external definition embedded in an interface node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionCache {
    /// URL the root definition was fetched from.
    pub root_url: String,
    /// Cached definition parts.
    #[serde(default, rename = "part")]
    pub parts: Vec<DefinitionPart>,
}

/// One cached file of an external definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionPart {
    /// Source URL of the part.
    pub url: String,
    /// Cached content.
    pub content: String,
}

/// An operation node (`operation[]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationConfig {
    /// Operation name.
    pub name: String,

    /// Requests stored for this operation.
    #[serde(default, rename = "call", skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<RequestConfig>,

    /// Fields owned by the operation implementation.
    #[serde(flatten)]
    pub extra: OpaqueFields,
}

impl OperationConfig {
    /// Creates an operation without requests.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requests: Vec::new(),
            extra: OpaqueFields::new(),
        }
    }

    /// Adds a request.
    #[must_use]
    pub fn with_request(mut self, request: RequestConfig) -> Self {
        self.requests.push(request);
        self
    }
}

/// A stored request (`call[]`), the credential-bearing leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Request name.
    pub name: String,

    /// Credentials used when dispatching this request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<CredentialsConfig>,

    /// Fields owned by the request implementation.
    #[serde(flatten)]
    pub extra: OpaqueFields,
}

impl RequestConfig {
    /// Creates a request without credentials.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            credentials: None,
            extra: OpaqueFields::new(),
        }
    }

    /// Sets username and password.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(CredentialsConfig::new(username, password));
        self
    }
}

/// Username/password pair of a request.
///
/// The text is cleartext in memory. In a serialized document it is
/// ciphertext when the document's credential encoding says so.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Other authentication settings (domain, auth type).
    #[serde(flatten)]
    pub extra: OpaqueFields,
}

impl CredentialsConfig {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            extra: OpaqueFields::new(),
        }
    }

    /// Only credentials with both fields set take part in encryption.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}
