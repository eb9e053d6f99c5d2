//! The project aggregate.
//!
//! A [`Project`] owns the document, the entity graph built from it, the
//! listener registry and the hook host. Every structural mutation updates
//! the entity list and the matching document node at the same index, then
//! notifies listeners exactly once.

mod capabilities;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use apiforge_domain::persistence::{
    InterfaceConfig, MockServiceConfig, ProjectDocument, PropertyConfig, TestSuiteConfig,
};
use apiforge_domain::{
    Interface, InterfaceKind, LifecycleHook, MockService, ModelItem, ProjectSettings, ProjectView,
    ScriptOutcome, TestSuite, generate_id, validate_name,
};
use chrono::{DateTime, Utc};

pub use capabilities::{HasInterfaces, HasMockServices, HasTestSuites, ListenerSource};

use crate::error::{
    AbortReason, LoadError, LoadFailure, ProjectError, ProjectResult, SaveError, SaveOutcome,
};
use crate::lifecycle::LifecycleScriptHost;
use crate::listener::{ListenerId, ListenerRegistry, ProjectEvent, ProjectListener};
use crate::persistence::{PersistenceController, SaveRequest, SaveTarget, WriteResult};
use crate::ports::{ProjectSource, ScriptContext};
use crate::services::ProjectServices;

/// Entities built from a document, index-aligned with its nodes.
struct EntityGraph {
    interfaces: Vec<Arc<Interface>>,
    test_suites: Vec<Arc<TestSuite>>,
    mock_services: Vec<Arc<MockService>>,
}

impl EntityGraph {
    /// Builds every entity or none. Nodes without an id get one.
    fn build(document: &mut ProjectDocument) -> Result<Self, LoadError> {
        let interfaces = document
            .interfaces
            .iter_mut()
            .map(|config| {
                let kind = config
                    .kind
                    .parse::<InterfaceKind>()
                    .map_err(|err| LoadError::Parse {
                        line: 0,
                        column: 0,
                        message: format!("interface [{}]: {err}", config.name),
                    })?;
                let id = config.id.get_or_insert_with(generate_id).clone();
                Ok(Arc::new(Interface::new(id, config.name.clone(), kind)))
            })
            .collect::<Result<Vec<_>, LoadError>>()?;

        let test_suites = document
            .test_suites
            .iter_mut()
            .map(|config| {
                let id = config.id.get_or_insert_with(generate_id).clone();
                Arc::new(TestSuite::new(id, config.name.clone()))
            })
            .collect();

        let mock_services = document
            .mock_services
            .iter_mut()
            .map(|config| {
                let id = config.id.get_or_insert_with(generate_id).clone();
                Arc::new(MockService::new(id, config.name.clone()))
            })
            .collect();

        Ok(Self {
            interfaces,
            test_suites,
            mock_services,
        })
    }
}

/// An API test project.
pub struct Project {
    document: ProjectDocument,
    source: Option<ProjectSource>,
    open: bool,
    disabled: bool,
    last_modified: Option<DateTime<Utc>>,
    settings: ProjectSettings,
    interfaces: Vec<Arc<Interface>>,
    test_suites: Vec<Arc<TestSuite>>,
    mock_services: Vec<Arc<MockService>>,
    listeners: Arc<ListenerRegistry>,
    scripts: LifecycleScriptHost,
    context: ScriptContext,
    persistence: PersistenceController,
}

impl Project {
    fn with_document(
        document: ProjectDocument,
        source: Option<ProjectSource>,
        services: ProjectServices,
    ) -> Self {
        let scripts = LifecycleScriptHost::new(
            Arc::clone(&services.script_engines),
            Arc::clone(&services.script_log),
        );
        Self {
            document,
            source,
            open: false,
            disabled: false,
            last_modified: None,
            settings: ProjectSettings::default(),
            interfaces: Vec::new(),
            test_suites: Vec::new(),
            mock_services: Vec::new(),
            listeners: Arc::new(ListenerRegistry::new()),
            scripts,
            context: ScriptContext::new(),
            persistence: PersistenceController::new(services),
        }
    }

    /// Creates a new, never saved project.
    #[must_use]
    pub fn create(name: impl Into<String>, services: ProjectServices) -> Self {
        let mut project = Self::with_document(ProjectDocument::new(name), None, services);
        project.open = true;
        project
    }

    /// Loads a project from a local path or an `http(s)` URL.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadFailure`] holding the disabled project and the cause.
    pub async fn load(source: &str, services: ProjectServices) -> Result<Self, LoadFailure> {
        let Some(parsed) = ProjectSource::parse(source) else {
            let mut project = Self::with_document(ProjectDocument::new(source), None, services);
            project.disabled = true;
            return Err(LoadFailure {
                project: Box::new(project),
                error: LoadError::InvalidSource(source.to_string()),
            });
        };

        let document = ProjectDocument::new(parsed.file_name());
        let mut project = Self::with_document(document, Some(parsed), services);
        match project.load_from_source().await {
            Ok(()) => Ok(project),
            Err(error) => Err(LoadFailure {
                project: Box::new(project),
                error,
            }),
        }
    }

    /// Loads the project again from its current path.
    ///
    /// Listeners stay registered; entities of the previous graph are
    /// released.
    ///
    /// # Errors
    ///
    /// On failure the project is left disabled and empty.
    pub async fn reload(&mut self) -> Result<(), LoadError> {
        if self.source.is_none() {
            return Err(LoadError::InvalidSource(format!(
                "project [{}] has never been saved",
                self.name()
            )));
        }
        self.load_from_source().await
    }

    async fn load_from_source(&mut self) -> Result<(), LoadError> {
        let Some(source) = self.source.clone() else {
            return Err(LoadError::InvalidSource(self.name().to_string()));
        };

        let loaded = self
            .persistence
            .load(&source)
            .await
            .and_then(|mut loaded| {
                let graph = EntityGraph::build(&mut loaded.document)?;
                Ok((loaded, graph))
            });

        let (loaded, graph) = match loaded {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(source = %source, error = %err, "Failed to load project");
                self.disable();
                return Err(err);
            }
        };

        self.release_graph();
        self.document = loaded.document;
        self.settings.shadow_password = loaded.shadow_password;
        self.settings.project_root = source
            .local_path()
            .and_then(Path::parent)
            .map(Path::to_path_buf);
        self.last_modified = loaded.last_modified;
        self.interfaces = graph.interfaces;
        self.test_suites = graph.test_suites;
        self.mock_services = graph.mock_services;
        self.open = true;
        self.disabled = false;

        self.run_after_load_script();
        Ok(())
    }

    fn disable(&mut self) {
        self.release_graph();
        self.interfaces.clear();
        self.test_suites.clear();
        self.mock_services.clear();
        self.document = ProjectDocument::new(self.document.name.clone());
        self.settings.shadow_password = None;
        self.open = false;
        self.disabled = true;
    }

    fn release_graph(&self) {
        self.interfaces.iter().for_each(|i| i.release());
        self.test_suites.iter().for_each(|s| s.release());
        self.mock_services.iter().for_each(|m| m.release());
    }

    /// Saves the project to its current file.
    ///
    /// Closed, disabled and remote projects are skipped. A never saved
    /// project asks the save interaction for a destination.
    ///
    /// # Errors
    ///
    /// Returns a [`SaveError`] if sealing, serializing or writing fails. The
    /// previous file is left intact.
    pub async fn save(&mut self) -> Result<SaveOutcome, SaveError> {
        if !self.open || self.disabled || self.is_remote() {
            tracing::debug!(project = %self.name(), "Skipping save");
            return Ok(SaveOutcome::Skipped);
        }

        self.run_before_save_script();
        let target = SaveTarget::Current(self.path().map(Path::to_path_buf));
        self.write(target).await
    }

    /// Saves the project to `path` and makes it the project's file.
    ///
    /// Works for remote projects too; afterwards they are local.
    ///
    /// # Errors
    ///
    /// Same as [`Project::save`]; the previous path is kept on failure.
    pub async fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<SaveOutcome, SaveError> {
        if !self.open || self.disabled {
            return Ok(SaveOutcome::Aborted(AbortReason::NotOpen));
        }

        self.run_before_save_script();
        self.write(SaveTarget::Explicit(path.into())).await
    }

    async fn write(&mut self, target: SaveTarget) -> Result<SaveOutcome, SaveError> {
        let request = SaveRequest {
            document: &self.document,
            shadow_password: self.settings.shadow_password.as_deref(),
            target,
            last_modified: self.last_modified,
        };

        match self.persistence.save(request).await? {
            WriteResult::Written {
                path,
                bytes,
                modified,
            } => {
                self.settings.project_root = path.parent().map(Path::to_path_buf);
                self.source = Some(ProjectSource::Local(path.clone()));
                self.last_modified = modified;
                Ok(SaveOutcome::Saved { path, bytes })
            }
            WriteResult::Aborted(reason) => {
                tracing::warn!(project = %self.name(), reason = %reason, "Save aborted");
                Ok(SaveOutcome::Aborted(reason))
            }
        }
    }

    /// Writes the project to its backup location, ignoring conflicts.
    ///
    /// Does not change the recorded modification time.
    ///
    /// # Errors
    ///
    /// Returns a [`SaveError`] if sealing, serializing or writing fails.
    pub async fn save_backup(&mut self) -> Result<SaveOutcome, SaveError> {
        if !self.open || self.disabled {
            return Ok(SaveOutcome::Skipped);
        }

        self.run_before_save_script();
        let current = if self.is_remote() { None } else { self.path() };
        let (path, bytes) = self
            .persistence
            .save_backup(
                &self.document,
                self.settings.shadow_password.as_deref(),
                current,
            )
            .await?;
        Ok(SaveOutcome::Saved { path, bytes })
    }

    /// Runs the after-load hook.
    pub fn run_after_load_script(&mut self) -> Option<ScriptOutcome> {
        self.run_hook(LifecycleHook::AfterLoad)
    }

    /// Runs the before-save hook.
    pub fn run_before_save_script(&mut self) -> Option<ScriptOutcome> {
        self.run_hook(LifecycleHook::BeforeSave)
    }

    fn run_hook(&mut self, hook: LifecycleHook) -> Option<ScriptOutcome> {
        let body = match hook {
            LifecycleHook::AfterLoad => self.document.after_load_script.clone(),
            LifecycleHook::BeforeSave => self.document.before_save_script.clone(),
        };
        let view = self.view();
        let outcome = self
            .scripts
            .run(hook, body.as_deref(), &mut self.context, &view)?;

        for (name, value) in &outcome.property_updates {
            self.document.set_property(name.as_str(), value.as_str());
        }
        Some(outcome)
    }

    /// Read-only view handed to hook scripts.
    #[must_use]
    pub fn view(&self) -> ProjectView {
        ProjectView {
            name: self.name().to_string(),
            path: self.source.as_ref().map(ToString::to_string),
            resource_root: self.resource_root().to_string(),
            interface_count: self.interfaces.len(),
            test_suite_count: self.test_suites.len(),
            mock_service_count: self.mock_services.len(),
        }
    }

    /// Releases all entities, listeners and script engines.
    pub fn release(&mut self) {
        if self.open {
            self.release_graph();
        }
        self.listeners.clear();
        self.scripts.release();
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.document.name
    }

    /// Renames the project. The name also protects the shadow password.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.document.name = name.into();
    }

    /// Returns the description, or the name with its state when not open.
    #[must_use]
    pub fn description(&self) -> String {
        if self.open {
            return self.document.description().unwrap_or_default().to_string();
        }
        let state = if self.disabled { "disabled" } else { "closed" };
        format!("{} - {state}", self.name())
    }

    /// Returns where the project was loaded from or saved to.
    #[must_use]
    pub const fn source(&self) -> Option<&ProjectSource> {
        self.source.as_ref()
    }

    /// Returns the local project file.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.source.as_ref().and_then(ProjectSource::local_path)
    }

    /// Returns true if the project was loaded from a URL and not saved locally since.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.source.as_ref().is_some_and(ProjectSource::is_remote)
    }

    /// Returns true once the project was created or loaded successfully.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Returns true if loading failed.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Modification time of the project file at the last load or save.
    #[must_use]
    pub const fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    /// Returns the in-memory document. Credentials are cleartext.
    #[must_use]
    pub const fn document(&self) -> &ProjectDocument {
        &self.document
    }

    /// Returns the per-project settings.
    #[must_use]
    pub const fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    /// Returns the shadow password.
    #[must_use]
    pub fn shadow_password(&self) -> Option<&str> {
        self.settings.shadow_password.as_deref()
    }

    /// Sets the shadow password used to encrypt credentials on save.
    pub fn set_shadow_password(&mut self, password: Option<String>) {
        self.settings.shadow_password = password;
    }

    /// Returns the directory containing the project file.
    #[must_use]
    pub fn project_root(&self) -> Option<&Path> {
        self.settings.project_root.as_deref()
    }

    /// Returns true if definition caches are kept in the project file.
    #[must_use]
    pub const fn cache_definitions(&self) -> bool {
        self.persistence.settings().cache_definitions
    }

    /// Sets whether definition caches are kept in the project file.
    pub fn set_cache_definitions(&mut self, cache: bool) {
        self.persistence.settings_mut().cache_definitions = cache;
    }

    /// Returns the resource root template.
    #[must_use]
    pub fn resource_root(&self) -> &str {
        self.document.resource_root.as_deref().unwrap_or_default()
    }

    /// Sets the resource root template.
    pub fn set_resource_root(&mut self, root: impl Into<String>) {
        self.document.resource_root = Some(root.into());
    }

    /// Returns the after-load hook.
    #[must_use]
    pub fn after_load_script(&self) -> Option<&str> {
        self.document.after_load_script.as_deref()
    }

    /// Sets the after-load hook.
    pub fn set_after_load_script(&mut self, script: Option<String>) {
        self.scripts
            .update_source(LifecycleHook::AfterLoad, script.as_deref());
        self.document.after_load_script = script;
    }

    /// Returns the before-save hook.
    #[must_use]
    pub fn before_save_script(&self) -> Option<&str> {
        self.document.before_save_script.as_deref()
    }

    /// Sets the before-save hook.
    pub fn set_before_save_script(&mut self, script: Option<String>) {
        self.scripts
            .update_source(LifecycleHook::BeforeSave, script.as_deref());
        self.document.before_save_script = script;
    }

    /// Returns a custom property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.document.property(name)
    }

    /// Returns all custom properties in order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyConfig] {
        &self.document.properties
    }

    /// Sets a custom property.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.document.set_property(name, value);
    }

    /// Returns the property-expansion context shared with hooks.
    #[must_use]
    pub const fn context(&self) -> &ScriptContext {
        &self.context
    }

    /// Returns the property-expansion context for modification.
    pub fn context_mut(&mut self) -> &mut ScriptContext {
        &mut self.context
    }

    /// Returns the listener registry, e.g. for listeners that unregister themselves.
    #[must_use]
    pub fn listener_registry(&self) -> Arc<ListenerRegistry> {
        Arc::clone(&self.listeners)
    }

    /// Returns all direct children: interfaces, test suites, mock services.
    #[must_use]
    pub fn children(&self) -> Vec<ModelItem> {
        self.interfaces
            .iter()
            .cloned()
            .map(ModelItem::Interface)
            .chain(self.test_suites.iter().cloned().map(ModelItem::TestSuite))
            .chain(self.mock_services.iter().cloned().map(ModelItem::MockService))
            .collect()
    }

    fn ensure_editable(&self) -> ProjectResult<()> {
        if self.disabled || !self.open {
            return Err(ProjectError::Disabled(self.name().to_string()));
        }
        Ok(())
    }
}

fn ensure_unique<'a>(
    mut names: impl Iterator<Item = &'a str>,
    kind: &'static str,
    name: &str,
) -> ProjectResult<()> {
    validate_name(name)?;
    if names.any(|existing| existing == name) {
        return Err(ProjectError::DuplicateName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

fn detach<T>(entities: &mut Vec<Arc<T>>, entity: &Arc<T>) -> Option<(usize, Arc<T>)> {
    let index = entities.iter().position(|e| Arc::ptr_eq(e, entity))?;
    Some((index, entities.remove(index)))
}

fn remove_node<C>(nodes: &mut Vec<C>, index: usize) {
    if index < nodes.len() {
        nodes.remove(index);
    }
}

impl HasInterfaces for Project {
    fn interfaces(&self) -> &[Arc<Interface>] {
        &self.interfaces
    }

    fn add_interface(&mut self, name: &str, kind: &str) -> ProjectResult<Arc<Interface>> {
        let config = InterfaceConfig::new(name, kind);
        self.import_interface(&config, true)
    }

    fn import_interface(
        &mut self,
        config: &InterfaceConfig,
        create_copy: bool,
    ) -> ProjectResult<Arc<Interface>> {
        self.ensure_editable()?;
        ensure_unique(
            self.interfaces.iter().map(|i| i.name()),
            "interface",
            &config.name,
        )?;
        let kind = config
            .kind
            .parse::<InterfaceKind>()
            .map_err(|_| ProjectError::UnknownInterfaceType(config.kind.clone()))?;

        let mut node = config.clone();
        node.kind = kind.as_str().to_string();
        if create_copy || node.id.is_none() {
            node.id = Some(generate_id());
        }
        let id = node.id.clone().unwrap_or_default();

        let interface = Arc::new(Interface::new(id, node.name.clone(), kind));
        self.interfaces.push(Arc::clone(&interface));
        self.document.interfaces.push(node);
        self.listeners
            .notify(&ProjectEvent::InterfaceAdded(Arc::clone(&interface)))?;
        Ok(interface)
    }

    fn remove_interface(&mut self, interface: &Arc<Interface>) -> ProjectResult<()> {
        let (index, removed) =
            detach(&mut self.interfaces, interface).ok_or_else(|| ProjectError::NotFound {
                kind: "interface",
                name: interface.name().to_string(),
            })?;

        let notified = self
            .listeners
            .notify(&ProjectEvent::InterfaceRemoved(Arc::clone(&removed)));
        removed.release();
        remove_node(&mut self.document.interfaces, index);
        notified.map_err(ProjectError::from)
    }

    fn notify_interface_updated(&self, interface: &Arc<Interface>) -> ProjectResult<()> {
        if !self.interfaces.iter().any(|i| Arc::ptr_eq(i, interface)) {
            return Err(ProjectError::NotFound {
                kind: "interface",
                name: interface.name().to_string(),
            });
        }
        self.listeners
            .notify(&ProjectEvent::InterfaceUpdated(Arc::clone(interface)))?;
        Ok(())
    }
}

impl HasTestSuites for Project {
    fn test_suites(&self) -> &[Arc<TestSuite>] {
        &self.test_suites
    }

    fn add_test_suite(&mut self, name: &str) -> ProjectResult<Arc<TestSuite>> {
        self.import_test_suite(&TestSuiteConfig::new(name), name, true)
    }

    fn import_test_suite(
        &mut self,
        config: &TestSuiteConfig,
        name: &str,
        create_copy: bool,
    ) -> ProjectResult<Arc<TestSuite>> {
        self.ensure_editable()?;
        ensure_unique(self.test_suites.iter().map(|s| s.name()), "test suite", name)?;

        let mut node = config.clone();
        node.name = name.to_string();
        if create_copy || node.id.is_none() {
            node.id = Some(generate_id());
        }
        let id = node.id.clone().unwrap_or_default();

        let test_suite = Arc::new(TestSuite::new(id, name));
        self.test_suites.push(Arc::clone(&test_suite));
        self.document.test_suites.push(node);
        self.listeners
            .notify(&ProjectEvent::TestSuiteAdded(Arc::clone(&test_suite)))?;
        Ok(test_suite)
    }

    fn remove_test_suite(&mut self, test_suite: &Arc<TestSuite>) -> ProjectResult<()> {
        let (index, removed) =
            detach(&mut self.test_suites, test_suite).ok_or_else(|| ProjectError::NotFound {
                kind: "test suite",
                name: test_suite.name().to_string(),
            })?;

        let notified = self
            .listeners
            .notify(&ProjectEvent::TestSuiteRemoved(Arc::clone(&removed)));
        removed.release();
        remove_node(&mut self.document.test_suites, index);
        notified.map_err(ProjectError::from)
    }
}

impl HasMockServices for Project {
    fn mock_services(&self) -> &[Arc<MockService>] {
        &self.mock_services
    }

    fn add_mock_service(&mut self, name: &str) -> ProjectResult<Arc<MockService>> {
        self.import_mock_service(&MockServiceConfig::new(name), name, true)
    }

    fn import_mock_service(
        &mut self,
        config: &MockServiceConfig,
        name: &str,
        create_copy: bool,
    ) -> ProjectResult<Arc<MockService>> {
        self.ensure_editable()?;
        ensure_unique(
            self.mock_services.iter().map(|m| m.name()),
            "mock service",
            name,
        )?;

        let mut node = config.clone();
        node.name = name.to_string();
        if create_copy || node.id.is_none() {
            node.id = Some(generate_id());
        }
        let id = node.id.clone().unwrap_or_default();

        let mock_service = Arc::new(MockService::new(id, name));
        self.mock_services.push(Arc::clone(&mock_service));
        self.document.mock_services.push(node);
        self.listeners
            .notify(&ProjectEvent::MockServiceAdded(Arc::clone(&mock_service)))?;
        Ok(mock_service)
    }

    fn remove_mock_service(&mut self, mock_service: &Arc<MockService>) -> ProjectResult<()> {
        let (index, removed) =
            detach(&mut self.mock_services, mock_service).ok_or_else(|| {
                ProjectError::NotFound {
                    kind: "mock service",
                    name: mock_service.name().to_string(),
                }
            })?;

        let notified = self
            .listeners
            .notify(&ProjectEvent::MockServiceRemoved(Arc::clone(&removed)));
        removed.release();
        remove_node(&mut self.document.mock_services, index);
        notified.map_err(ProjectError::from)
    }
}

impl ListenerSource for Project {
    fn add_listener(&self, listener: Arc<dyn ProjectListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("name", &self.document.name)
            .field("source", &self.source)
            .field("open", &self.open)
            .field("disabled", &self.disabled)
            .field("interfaces", &self.interfaces.len())
            .field("test_suites", &self.test_suites.len())
            .field("mock_services", &self.mock_services.len())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
