#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::Path;

use apiforge_domain::persistence::{InterfaceConfig, TestSuiteConfig};
use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use super::*;
use crate::error::{ListenerError, ScriptError};
use crate::ports::{
    CipherError, CipherOutput, CodecError, CredentialCipher, DocumentCodec, DocumentLoader,
    FileSystem, FileSystemError, LoaderError, ScriptBindings, ScriptEngine, ScriptEngineFactory,
    ScriptLog,
};

struct NoFileSystem;

#[async_trait]
impl FileSystem for NoFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
        Err(FileSystemError::NotFound(path.to_path_buf()))
    }

    async fn write_file(&self, path: &Path, _contents: &[u8]) -> Result<(), FileSystemError> {
        Err(FileSystemError::PermissionDenied(path.to_path_buf()))
    }

    async fn create_dir_all(&self, _path: &Path) -> Result<(), FileSystemError> {
        Ok(())
    }

    async fn exists(&self, _path: &Path) -> bool {
        false
    }

    async fn is_file(&self, _path: &Path) -> bool {
        false
    }

    async fn is_writable(&self, _path: &Path) -> bool {
        false
    }

    async fn modified(&self, path: &Path) -> Result<DateTime<Utc>, FileSystemError> {
        Err(FileSystemError::NotFound(path.to_path_buf()))
    }

    async fn copy_file(&self, from: &Path, _to: &Path) -> Result<(), FileSystemError> {
        Err(FileSystemError::NotFound(from.to_path_buf()))
    }

    async fn rename(&self, from: &Path, _to: &Path) -> Result<(), FileSystemError> {
        Err(FileSystemError::NotFound(from.to_path_buf()))
    }

    async fn remove_file(&self, _path: &Path) -> Result<(), FileSystemError> {
        Ok(())
    }
}

struct NoLoader;

#[async_trait]
impl DocumentLoader for NoLoader {
    async fn fetch(&self, source: &ProjectSource) -> Result<Vec<u8>, LoaderError> {
        Err(LoaderError::Transport {
            url: source.to_string(),
            message: "offline".to_string(),
        })
    }
}

struct NoCodec;

impl DocumentCodec for NoCodec {
    fn parse(&self, _bytes: &[u8]) -> Result<ProjectDocument, CodecError> {
        Err(CodecError::Parse {
            line: 1,
            column: 1,
            message: "unsupported".to_string(),
        })
    }

    fn serialize(&self, _document: &ProjectDocument, _pretty: bool) -> Result<Vec<u8>, CodecError> {
        Err(CodecError::Serialize("unsupported".to_string()))
    }
}

struct NoCipher;

impl CredentialCipher for NoCipher {
    fn encrypt(
        &self,
        algorithm: &str,
        _passphrase: &str,
        _plaintext: &[u8],
        _output: CipherOutput,
    ) -> Result<Vec<u8>, CipherError> {
        Err(CipherError::UnsupportedAlgorithm(algorithm.to_string()))
    }

    fn decrypt(
        &self,
        algorithm: &str,
        _passphrase: &str,
        _ciphertext: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        Err(CipherError::UnsupportedAlgorithm(algorithm.to_string()))
    }
}

/// Engine whose script is a list of `name=value` property assignments, or
/// `fail` to raise an error.
struct AssignEngine {
    source: String,
}

impl ScriptEngine for AssignEngine {
    fn source(&self) -> &str {
        &self.source
    }

    fn set_source(&mut self, source: &str) {
        self.source = source.to_string();
    }

    fn run(&mut self, bindings: &mut ScriptBindings<'_>) -> Result<ScriptOutcome, ScriptError> {
        let mut outcome = ScriptOutcome::new();
        for line in self.source.lines() {
            if line == "fail" {
                return Err(ScriptError::Assertion("fail".to_string()));
            }
            if let Some((name, value)) = line.split_once('=') {
                outcome.add_property_update(name, value);
            }
        }
        bindings.log.log(LifecycleHook::BeforeSave, &bindings.project.name);
        Ok(outcome)
    }

    fn release(&mut self) {}
}

struct AssignFactory;

impl ScriptEngineFactory for AssignFactory {
    fn create(&self, _hook: LifecycleHook, source: &str) -> Box<dyn ScriptEngine> {
        Box::new(AssignEngine {
            source: source.to_string(),
        })
    }
}

#[derive(Default)]
struct MemoryLog(Mutex<Vec<String>>);

impl ScriptLog for MemoryLog {
    fn log(&self, _hook: LifecycleHook, message: &str) {
        self.0.lock().push(message.to_string());
    }
}

fn services() -> ProjectServices {
    ProjectServices::new(
        Arc::new(NoFileSystem),
        Arc::new(NoLoader),
        Arc::new(NoCodec),
        Arc::new(NoCipher),
        Arc::new(AssignFactory),
        Arc::new(MemoryLog::default()),
    )
}

#[derive(Default)]
struct Recording {
    events: Mutex<Vec<String>>,
    fail_on_remove: bool,
}

impl ProjectListener for Recording {
    fn interface_added(&self, interface: &Arc<Interface>) -> Result<(), ListenerError> {
        self.events
            .lock()
            .push(format!("interface+{}", interface.name()));
        Ok(())
    }

    fn interface_removed(&self, interface: &Arc<Interface>) -> Result<(), ListenerError> {
        assert!(!interface.is_released(), "notified before release");
        self.events
            .lock()
            .push(format!("interface-{}", interface.name()));
        if self.fail_on_remove {
            return Err(ListenerError::new("refused"));
        }
        Ok(())
    }

    fn interface_updated(&self, interface: &Arc<Interface>) -> Result<(), ListenerError> {
        self.events
            .lock()
            .push(format!("interface~{}", interface.name()));
        Ok(())
    }

    fn test_suite_added(&self, test_suite: &Arc<TestSuite>) -> Result<(), ListenerError> {
        self.events
            .lock()
            .push(format!("suite+{}", test_suite.name()));
        Ok(())
    }

    fn mock_service_removed(&self, mock_service: &Arc<MockService>) -> Result<(), ListenerError> {
        self.events
            .lock()
            .push(format!("mock-{}", mock_service.name()));
        Ok(())
    }
}

#[test]
fn test_new_project_is_open_and_empty() {
    let project = Project::create("Shop", services());
    assert!(project.is_open());
    assert!(!project.is_disabled());
    assert!(!project.is_remote());
    assert_eq!(project.resource_root(), "${projectDir}");
    assert!(project.children().is_empty());
    assert_eq!(project.description(), "");
}

#[test]
fn test_every_listener_sees_one_interface_added() {
    let mut project = Project::create("Shop", services());
    let listeners: Vec<Arc<Recording>> = (0..3).map(|_| Arc::new(Recording::default())).collect();
    for listener in &listeners {
        project.add_listener(Arc::clone(listener) as Arc<dyn ProjectListener>);
    }

    let added = project.add_interface("Orders", "rest").unwrap();

    for listener in &listeners {
        assert_eq!(*listener.events.lock(), vec!["interface+Orders".to_string()]);
    }
    assert!(Arc::ptr_eq(project.interface_at(0).unwrap(), &added));
    assert_eq!(project.document().interfaces[0].kind, "rest");
    assert_eq!(
        project.document().interfaces[0].id.as_deref(),
        Some(added.id())
    );
}

#[test]
fn test_add_without_listeners() {
    let mut project = Project::create("Shop", services());
    project.add_test_suite("Smoke").unwrap();
    assert_eq!(project.test_suite_count(), 1);
    assert_eq!(project.document().test_suites[0].name, "Smoke");
}

#[test]
fn test_duplicate_names_are_rejected() {
    let mut project = Project::create("Shop", services());
    project.add_mock_service("Stub").unwrap();
    assert!(matches!(
        project.add_mock_service("Stub"),
        Err(ProjectError::DuplicateName { .. })
    ));
    assert_eq!(project.mock_service_count(), 1);
}

#[test]
fn test_unknown_interface_type_is_rejected() {
    let mut project = Project::create("Shop", services());
    assert!(matches!(
        project.add_interface("Graph", "graphql"),
        Err(ProjectError::UnknownInterfaceType(kind)) if kind == "graphql"
    ));
    assert_eq!(project.interface_count(), 0);
    assert!(project.document().interfaces.is_empty());
}

#[test]
fn test_blank_name_is_rejected() {
    let mut project = Project::create("Shop", services());
    assert!(matches!(
        project.add_test_suite(" "),
        Err(ProjectError::Invalid(_))
    ));
}

#[test]
fn test_remove_notifies_before_release() {
    let mut project = Project::create("Shop", services());
    let listener = Arc::new(Recording::default());
    project.add_listener(Arc::clone(&listener) as Arc<dyn ProjectListener>);

    let first = project.add_interface("A", "wsdl").unwrap();
    project.add_interface("B", "rest").unwrap();
    project.remove_interface(&first).unwrap();

    assert!(first.is_released());
    assert_eq!(project.interface_count(), 1);
    assert_eq!(project.document().interfaces.len(), 1);
    assert_eq!(project.document().interfaces[0].name, "B");
    assert_eq!(listener.events.lock().last().unwrap(), "interface-A");
}

#[test]
fn test_listener_error_on_remove_still_cleans_up() {
    let mut project = Project::create("Shop", services());
    let interface = project.add_interface("A", "rest").unwrap();
    project.add_listener(Arc::new(Recording {
        fail_on_remove: true,
        ..Recording::default()
    }));

    let result = project.remove_interface(&interface);

    assert!(matches!(result, Err(ProjectError::Listener(_))));
    assert!(interface.is_released());
    assert_eq!(project.interface_count(), 0);
    assert!(project.document().interfaces.is_empty());
}

#[test]
fn test_remove_unknown_entity() {
    let mut project = Project::create("Shop", services());
    let stranger = Arc::new(TestSuite::new("x", "Stranger"));
    assert!(matches!(
        project.remove_test_suite(&stranger),
        Err(ProjectError::NotFound { .. })
    ));
}

#[test]
fn test_remove_mock_service() {
    let mut project = Project::create("Shop", services());
    let listener = Arc::new(Recording::default());
    project.add_listener(Arc::clone(&listener) as Arc<dyn ProjectListener>);
    let mock = project.add_mock_service("Stub").unwrap();

    project.remove_mock_service(&mock).unwrap();
    assert!(mock.is_released());
    assert_eq!(*listener.events.lock(), vec!["mock-Stub".to_string()]);
}

#[test]
fn test_import_test_suite_with_copy_gets_new_id() {
    let mut project = Project::create("Shop", services());
    let mut config = TestSuiteConfig::new("Original");
    config.id = Some("fixed-id".to_string());

    let kept = project.import_test_suite(&config, "Kept", false).unwrap();
    let copied = project.import_test_suite(&config, "Copied", true).unwrap();

    assert_eq!(kept.id(), "fixed-id");
    assert_ne!(copied.id(), "fixed-id");
    assert_eq!(project.document().test_suites[0].id.as_deref(), Some("fixed-id"));
    assert_eq!(project.document().test_suites[1].name, "Copied");
}

#[test]
fn test_interface_update_reaches_listeners() {
    let mut project = Project::create("Shop", services());
    let orders = project.add_interface("Orders", "wsdl").unwrap();
    let listener = Arc::new(Recording::default());
    project.add_listener(Arc::clone(&listener) as Arc<dyn ProjectListener>);

    project.notify_interface_updated(&orders).unwrap();
    assert_eq!(*listener.events.lock(), vec!["interface~Orders".to_string()]);

    project.remove_interface(&orders).unwrap();
    assert!(matches!(
        project.notify_interface_updated(&orders),
        Err(ProjectError::NotFound { kind: "interface", .. })
    ));
    assert_eq!(listener.events.lock().len(), 2);
}

#[test]
fn test_interface_lookup_by_id() {
    let mut project = Project::create("Shop", services());
    project.add_interface("Orders", "rest").unwrap();
    let billing = project.add_interface("Billing", "wsdl").unwrap();

    let found = project.interface_by_id(billing.id()).unwrap();
    assert!(Arc::ptr_eq(found, &billing));
    assert!(project.interface_by_id("missing").is_none());
}

#[test]
fn test_import_interface_keeps_content() {
    let mut source = Project::create("Source", services());
    source.add_interface("Orders", "wsdl").unwrap();
    let config: InterfaceConfig = source.document().interfaces[0].clone();

    let mut target = Project::create("Target", services());
    let listener = Arc::new(Recording::default());
    target.add_listener(Arc::clone(&listener) as Arc<dyn ProjectListener>);
    let imported = target.import_interface(&config, true).unwrap();

    assert_eq!(imported.name(), "Orders");
    assert_eq!(imported.kind(), InterfaceKind::Wsdl);
    assert_ne!(Some(imported.id()), config.id.as_deref());
    assert_eq!(*listener.events.lock(), vec!["interface+Orders".to_string()]);
}

#[test]
fn test_children_keep_kind_order() {
    let mut project = Project::create("Shop", services());
    project.add_mock_service("M").unwrap();
    project.add_test_suite("S").unwrap();
    project.add_interface("I", "rest").unwrap();

    let names: Vec<_> = project
        .children()
        .iter()
        .map(|child| child.name().to_string())
        .collect();
    assert_eq!(names, vec!["I", "S", "M"]);
}

#[test]
fn test_before_save_hook_updates_properties() {
    let mut project = Project::create("Shop", services());
    project.set_before_save_script(Some("stage=qa\nowner=team".to_string()));

    let outcome = project.run_before_save_script().unwrap();

    assert_eq!(outcome.property_updates.len(), 2);
    assert_eq!(project.property("stage"), Some("qa"));
    assert_eq!(project.property("owner"), Some("team"));
}

#[test]
fn test_failing_hook_is_swallowed() {
    let mut project = Project::create("Shop", services());
    project.set_after_load_script(Some("fail".to_string()));
    assert!(project.run_after_load_script().is_none());
    assert!(project.properties().is_empty());
}

#[test]
fn test_release_tears_everything_down() {
    let mut project = Project::create("Shop", services());
    let interface = project.add_interface("I", "rest").unwrap();
    let suite = project.add_test_suite("S").unwrap();
    project.add_listener(Arc::new(Recording::default()));

    project.release();

    assert!(interface.is_released());
    assert!(suite.is_released());
    assert_eq!(project.listener_count(), 0);
}

#[tokio::test]
async fn test_load_of_blank_source_is_invalid() {
    let failure = Project::load("   ", services()).await.unwrap_err();
    assert!(matches!(failure.error, LoadError::InvalidSource(_)));
    assert!(failure.project.is_disabled());
}

#[tokio::test]
async fn test_load_of_missing_file_is_disabled() {
    let failure = Project::load("/nowhere/shop-project.json", services())
        .await
        .unwrap_err();

    assert!(matches!(failure.error, LoadError::InvalidSource(_)));
    let project = failure.project;
    assert!(project.is_disabled());
    assert!(!project.is_open());
    assert_eq!(project.name(), "shop-project.json");
    assert_eq!(project.description(), "shop-project.json - disabled");
    assert!(project.children().is_empty());
}

#[tokio::test]
async fn test_disabled_project_rejects_mutations() {
    let failure = Project::load("/nowhere/shop-project.json", services())
        .await
        .unwrap_err();
    let mut project = *failure.project;
    assert!(matches!(
        project.add_test_suite("S"),
        Err(ProjectError::Disabled(_))
    ));
    assert_eq!(project.save().await.unwrap(), SaveOutcome::Skipped);
    assert_eq!(
        project.save_as("/tmp/x.json").await.unwrap(),
        SaveOutcome::Aborted(AbortReason::NotOpen)
    );
}

#[tokio::test]
async fn test_unsaved_project_without_destination_aborts() {
    let mut project = Project::create("Shop", services());
    assert_eq!(
        project.save().await.unwrap(),
        SaveOutcome::Aborted(AbortReason::NoDestination)
    );
    assert!(project.path().is_none());
}

#[tokio::test]
async fn test_encrypt_failure_stops_before_io() {
    let mut project = Project::create("Shop", services());
    project.set_shadow_password(Some("secret".to_string()));
    let result = project.save_as("/tmp/shop-project.json").await;
    assert!(matches!(result, Err(SaveError::Encrypt(_))));
    assert!(project.path().is_none());
}

#[test]
fn test_listener_count_tracks_registrations() {
    let project = Project::create("Shop", services());
    let listener: Arc<dyn ProjectListener> = Arc::new(Recording::default());
    let id = project.add_listener(Arc::clone(&listener));
    assert_eq!(project.add_listener(listener), id);
    assert_eq!(project.listener_count(), 1);
    assert!(project.remove_listener(id));
    assert!(!project.remove_listener(id));
}
