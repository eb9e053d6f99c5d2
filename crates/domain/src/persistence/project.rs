//! The project document: root of the persisted tree.

use serde::{Deserialize, Serialize};

use super::common::{DEFAULT_RESOURCE_ROOT, OpaqueFields, PropertyConfig};
use super::encoding::CredentialEncoding;
use super::interface::{CredentialsConfig, InterfaceConfig};
use super::mock_service::MockServiceConfig;
use super::test_suite::TestSuiteConfig;

/// Root node of a project file.
///
/// Field order follows the document layout; child sequences keep document
/// order because iteration order is significant to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    /// Project name. Also the passphrase protecting the shadow password.
    #[serde(default)]
    pub name: String,

    /// Path template used to resolve relative resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_root: Option<String>,

    /// Whether credential fields below are cleartext or ciphertext.
    #[serde(
        default,
        rename = "encryptedContent",
        skip_serializing_if = "CredentialEncoding::is_cleartext"
    )]
    pub credential_encoding: CredentialEncoding,

    /// Custom project properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyConfig>,

    /// Security configuration, owned by an external collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wss_container: Option<serde_json::Value>,

    /// Interfaces in document order.
    #[serde(default, rename = "interface", skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<InterfaceConfig>,

    /// Test suites in document order.
    #[serde(default, rename = "testSuite", skip_serializing_if = "Vec::is_empty")]
    pub test_suites: Vec<TestSuiteConfig>,

    /// Mock services in document order.
    #[serde(default, rename = "mockService", skip_serializing_if = "Vec::is_empty")]
    pub mock_services: Vec<MockServiceConfig>,

    /// Hook run after the project is loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_load_script: Option<String>,

    /// Hook run before the project is saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_save_script: Option<String>,

    /// Version of the tool that last wrote the file.
    #[serde(default, rename = "soapuiVersion", skip_serializing_if = "Option::is_none")]
    pub tool_version: Option<String>,

    /// Unrecognised top-level nodes.
    #[serde(flatten)]
    pub extra: OpaqueFields,
}

impl ProjectDocument {
    /// Creates the document of a brand new project.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_root: Some(DEFAULT_RESOURCE_ROOT.to_string()),
            credential_encoding: CredentialEncoding::Cleartext,
            properties: Vec::new(),
            wss_container: Some(serde_json::Value::Object(serde_json::Map::new())),
            interfaces: Vec::new(),
            test_suites: Vec::new(),
            mock_services: Vec::new(),
            after_load_script: None,
            before_save_script: None,
            tool_version: None,
            extra: OpaqueFields::new(),
        }
    }

    /// Returns the value of a custom property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Sets a custom property, appending it if it does not exist yet.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.properties.push(PropertyConfig { name, value }),
        }
    }

    /// Returns the free-form description, if the document has one.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.extra.get("description").and_then(serde_json::Value::as_str)
    }

    /// Iterates mutably over every credential node of every interface.
    pub fn credentials_mut(&mut self) -> impl Iterator<Item = &mut CredentialsConfig> {
        self.interfaces
            .iter_mut()
            .flat_map(InterfaceConfig::credentials_mut)
    }

    /// Iterates over every credential node of every interface.
    pub fn credentials(&self) -> impl Iterator<Item = &CredentialsConfig> {
        self.interfaces.iter().flat_map(InterfaceConfig::credentials)
    }

    /// Removes embedded definition caches.
    ///
    /// Returns the names of the interfaces that had one.
    pub fn strip_definition_caches(&mut self) -> Vec<String> {
        self.interfaces
            .iter_mut()
            .filter_map(|iface| iface.definition_cache.take().map(|_| iface.name.clone()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::{
        DefinitionCache, DefinitionPart, EncryptedBlob, OperationConfig, RequestConfig,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_document_defaults() {
        let doc = ProjectDocument::new("Demo");
        assert_eq!(doc.name, "Demo");
        assert_eq!(doc.resource_root.as_deref(), Some(DEFAULT_RESOURCE_ROOT));
        assert!(doc.credential_encoding.is_cleartext());
        assert!(doc.wss_container.is_some());
    }

    #[test]
    fn test_document_field_names() {
        let mut doc = ProjectDocument::new("Demo");
        doc.interfaces.push(InterfaceConfig::new("A", "rest"));
        doc.test_suites.push(TestSuiteConfig::new("Suite"));
        doc.mock_services.push(MockServiceConfig::new("Mock"));
        doc.credential_encoding = CredentialEncoding::Ciphertext(EncryptedBlob::new(vec![1, 2]));
        doc.tool_version = Some("1.0".to_string());

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["interface"][0]["name"], "A");
        assert_eq!(value["testSuite"][0]["name"], "Suite");
        assert_eq!(value["mockService"][0]["name"], "Mock");
        assert_eq!(value["encryptedContent"], "AQI=");
        assert_eq!(value["soapuiVersion"], "1.0");
        assert_eq!(value["resourceRoot"], DEFAULT_RESOURCE_ROOT);
    }

    #[test]
    fn test_set_property_keeps_order() {
        let mut doc = ProjectDocument::new("Demo");
        doc.set_property("b", "1");
        doc.set_property("a", "2");
        doc.set_property("b", "3");
        let names: Vec<_> = doc.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(doc.property("b"), Some("3"));
        assert_eq!(doc.property("missing"), None);
    }

    #[test]
    fn test_strip_definition_caches() {
        let mut doc = ProjectDocument::new("Demo");
        doc.interfaces.push(
            InterfaceConfig::new("Cached", "wsdl").with_definition_cache(DefinitionCache {
                root_url: "http://example.com/a.wsdl".to_string(),
                parts: vec![DefinitionPart {
                    url: "http://example.com/a.wsdl".to_string(),
                    content: "<definitions/>".to_string(),
                }],
            }),
        );
        doc.interfaces.push(InterfaceConfig::new("Plain", "rest"));

        let stripped = doc.strip_definition_caches();
        assert_eq!(stripped, vec!["Cached".to_string()]);
        assert!(doc.interfaces.iter().all(|i| i.definition_cache.is_none()));
    }

    #[test]
    fn test_credentials_span_all_interfaces() {
        let mut doc = ProjectDocument::new("Demo");
        for name in ["A", "B"] {
            doc.interfaces.push(InterfaceConfig::new(name, "wsdl").with_operation(
                OperationConfig::new("op")
                    .with_request(RequestConfig::new("r").with_credentials("u", "p")),
            ));
        }
        assert_eq!(doc.credentials().count(), 2);
        assert_eq!(doc.credentials_mut().count(), 2);
    }
}
