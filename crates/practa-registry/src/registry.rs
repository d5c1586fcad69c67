//! Type-keyed registry of definitions and renderers

use crate::catalog::builtin_definitions;
use crate::error::{RegistryError, Result};
use practa_core::{
    FlowDefinition, FlowId, PackageDescriptor, Practa, PractaDefinition, PractaOrigin, PractaSlug,
    UnitFactory,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Per-call adjustments for [`PractaRegistry::create_flow`]
#[derive(Debug, Clone, Default)]
pub struct FlowOverrides {
    /// Use this id instead of a generated one
    pub flow_id: Option<FlowId>,
    /// Flow description
    pub description: Option<String>,
    /// Display names by step index
    pub step_names: BTreeMap<usize, String>,
}

impl FlowOverrides {
    /// With flow id
    #[inline]
    #[must_use]
    pub fn with_flow_id(mut self, id: FlowId) -> Self {
        self.flow_id = Some(id);
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Rename one step
    #[must_use]
    pub fn with_step_name(mut self, index: usize, name: impl Into<String>) -> Self {
        self.step_names.insert(index, name.into());
        self
    }
}

/// Listing badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginBadge {
    /// First-party
    Builtin,
    /// Community package
    Community,
}

/// One row of [`PractaRegistry::listing`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Type identifier
    pub practa_type: String,
    /// Display name
    pub name: String,
    /// Display description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Origin badge
    pub origin: OriginBadge,
    /// Whether a renderer is bound
    pub runnable: bool,
}

/// Registry of unit types
///
/// Lookup is keyed by type identifier. Renderers are bound separately so a
/// catalog can be browsed before any implementation is loaded.
#[derive(Default)]
pub struct PractaRegistry {
    definitions: HashMap<String, PractaDefinition>,
    renderers: HashMap<String, UnitFactory>,
}

impl PractaRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with the first-party catalog
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for def in builtin_definitions() {
            registry.definitions.insert(def.practa_type.clone(), def);
        }
        registry
    }

    /// Add a definition
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateType`] if the type is taken.
    pub fn register(&mut self, definition: PractaDefinition) -> Result<()> {
        if self.definitions.contains_key(&definition.practa_type) {
            return Err(RegistryError::DuplicateType {
                practa_type: definition.practa_type,
            });
        }
        tracing::debug!(practa_type = %definition.practa_type, "registered practa");
        self.definitions
            .insert(definition.practa_type.clone(), definition);
        Ok(())
    }

    /// Add a community package with its renderer
    ///
    /// # Errors
    ///
    /// [`RegistryError::ReservedIdentifier`] if the id would share a
    /// builtin unit's storage slug, [`RegistryError::DuplicateType`] if it
    /// collides with an existing type, builtin or community.
    pub fn register_community(
        &mut self,
        descriptor: &PackageDescriptor,
        factory: UnitFactory,
    ) -> Result<PractaDefinition> {
        if PractaSlug::is_reserved(&descriptor.id) {
            return Err(RegistryError::ReservedIdentifier {
                id: descriptor.id.clone(),
            });
        }
        let definition = descriptor.to_definition();
        self.register(definition.clone())?;
        self.renderers
            .insert(definition.practa_type.clone(), factory);
        tracing::info!(
            practa_type = %definition.practa_type,
            version = %descriptor.version,
            author = %descriptor.author,
            "community practa registered"
        );
        Ok(definition)
    }

    /// Definition for a type
    #[inline]
    #[must_use]
    pub fn lookup(&self, practa_type: &str) -> Option<&PractaDefinition> {
        self.definitions.get(practa_type)
    }

    /// Check if type exists
    #[inline]
    #[must_use]
    pub fn contains(&self, practa_type: &str) -> bool {
        self.definitions.contains_key(practa_type)
    }

    /// Bind the implementation for a cataloged type, replacing any previous one
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownPractaType`] if the type is not cataloged.
    pub fn bind_renderer(&mut self, practa_type: &str, factory: UnitFactory) -> Result<()> {
        if !self.contains(practa_type) {
            return Err(RegistryError::unknown(practa_type));
        }
        self.renderers.insert(practa_type.to_string(), factory);
        Ok(())
    }

    /// Renderer factory for a type
    #[inline]
    #[must_use]
    pub fn renderer(&self, practa_type: &str) -> Option<&UnitFactory> {
        self.renderers.get(practa_type)
    }

    /// Build a unit for a Flow step
    ///
    /// # Errors
    ///
    /// [`RegistryError::MissingRenderer`] if nothing is bound for the type.
    pub fn instantiate(&self, definition: &PractaDefinition) -> Result<Box<dyn Practa>> {
        let factory = self.renderer(&definition.practa_type).ok_or_else(|| {
            RegistryError::MissingRenderer {
                practa_type: definition.practa_type.clone(),
            }
        })?;
        Ok(factory(definition))
    }

    /// Build a Flow from a list of types
    ///
    /// Fails on the first unknown type; a step is never dropped. Step ids
    /// are `{type}-{index}` so repeated types stay distinct.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownPractaType`] for an unresolvable type.
    pub fn create_flow(
        &self,
        name: &str,
        types: &[&str],
        overrides: FlowOverrides,
    ) -> Result<FlowDefinition> {
        let mut steps = Vec::with_capacity(types.len());
        for (index, practa_type) in types.iter().enumerate() {
            let base = self
                .lookup(practa_type)
                .ok_or_else(|| RegistryError::unknown(*practa_type))?;
            let mut step = base.clone();
            step.id = format!("{practa_type}-{index}");
            if let Some(name) = overrides.step_names.get(&index) {
                step.name.clone_from(name);
            }
            steps.push(step);
        }

        let mut flow = FlowDefinition::new(name, steps);
        if let Some(id) = overrides.flow_id {
            flow = flow.with_id(id);
        }
        if let Some(description) = overrides.description {
            flow = flow.with_description(description);
        }
        Ok(flow)
    }

    /// One-step Flow named after the unit
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownPractaType`] for an unresolvable type.
    pub fn create_single_flow(&self, practa_type: &str) -> Result<FlowDefinition> {
        let name = self
            .lookup(practa_type)
            .map(|def| def.name.clone())
            .ok_or_else(|| RegistryError::unknown(practa_type))?;
        self.create_flow(&name, &[practa_type], FlowOverrides::default())
    }

    /// All entries sorted by display name
    #[must_use]
    pub fn listing(&self) -> Vec<CatalogEntry> {
        let mut entries: Vec<CatalogEntry> = self
            .definitions
            .values()
            .map(|def| CatalogEntry {
                practa_type: def.practa_type.clone(),
                name: def.name.clone(),
                description: def.description.clone(),
                origin: match def.origin {
                    PractaOrigin::Builtin => OriginBadge::Builtin,
                    PractaOrigin::Community { .. } => OriginBadge::Community,
                },
                runnable: self.renderers.contains_key(&def.practa_type),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.practa_type.cmp(&b.practa_type)));
        entries
    }

    /// Number of cataloged types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl fmt::Debug for PractaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bound: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        bound.sort_unstable();
        f.debug_struct("PractaRegistry")
            .field("types", &self.definitions.len())
            .field("renderers", &bound)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use practa_core::{PractaCallbacks, PractaContext, PractaOutput};
    use std::sync::Arc;

    struct Noop;

    #[async_trait::async_trait]
    impl Practa for Noop {
        async fn run(&self, _context: PractaContext, callbacks: PractaCallbacks) {
            callbacks.complete(PractaOutput::empty());
        }
    }

    fn noop_factory() -> UnitFactory {
        Arc::new(|_: &PractaDefinition| Box::new(Noop) as Box<dyn Practa>)
    }

    fn descriptor(id: &str) -> PackageDescriptor {
        PackageDescriptor {
            id: id.to_string(),
            name: "Box Breath".to_string(),
            description: "Four-count breathing".to_string(),
            author: "sam".to_string(),
            version: "1.2.0".to_string(),
            estimated_duration: Some(120),
            category: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn registry_new_empty() {
        let registry = PractaRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_with_builtins() {
        let registry = PractaRegistry::with_builtins();
        assert_eq!(registry.len(), 7);
        assert!(registry.contains("journal"));
        assert!(registry.lookup("breathing").is_some());
        assert!(registry.lookup("unknown").is_none());
    }

    #[test]
    fn create_flow_unknown_type_fails() {
        let registry = PractaRegistry::with_builtins();
        let err = registry
            .create_flow("Bad", &["journal", "levitation"], FlowOverrides::default())
            .unwrap_err();
        assert_eq!(err, RegistryError::unknown("levitation"));
    }

    #[test]
    fn create_flow_applies_overrides() {
        let registry = PractaRegistry::with_builtins();
        let flow = registry
            .create_flow(
                "Morning",
                &["breathing", "journal", "breathing"],
                FlowOverrides::default()
                    .with_flow_id(FlowId::new("flow-morning"))
                    .with_description("Start gently")
                    .with_step_name(2, "Closing breath"),
            )
            .unwrap();

        assert_eq!(flow.id.as_str(), "flow-morning");
        assert_eq!(flow.description.as_deref(), Some("Start gently"));
        let ids: Vec<&str> = flow.practas.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["breathing-0", "journal-1", "breathing-2"]);
        assert_eq!(flow.practas[0].name, "Breathing");
        assert_eq!(flow.practas[2].name, "Closing breath");
    }

    #[test]
    fn single_flow_uses_unit_name() {
        let registry = PractaRegistry::with_builtins();
        let flow = registry.create_single_flow("gratitude").unwrap();
        assert_eq!(flow.name, "Gratitude");
        assert_eq!(flow.len(), 1);
    }

    #[test]
    fn community_collision_rejected() {
        let mut registry = PractaRegistry::with_builtins();
        registry
            .register_community(&descriptor("box-breath"), noop_factory())
            .unwrap();

        let err = registry
            .register_community(&descriptor("box-breath"), noop_factory())
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateType { .. }));

        let err = registry
            .register_community(&descriptor("journal"), noop_factory())
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateType { .. }));
    }

    #[test]
    fn community_cannot_take_builtin_slug() {
        let mut registry = PractaRegistry::with_builtins();
        let err = registry
            .register_community(&descriptor("builtin-journal"), noop_factory())
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::ReservedIdentifier {
                id: "builtin-journal".into()
            }
        );
        assert!(!registry.contains("builtin-journal"));
        assert!(registry.renderer("builtin-journal").is_none());
    }

    #[test]
    fn renderer_binding() {
        let mut registry = PractaRegistry::with_builtins();
        let def = registry.lookup("journal").unwrap().clone();
        assert!(matches!(
            registry.instantiate(&def),
            Err(RegistryError::MissingRenderer { .. })
        ));

        registry.bind_renderer("journal", noop_factory()).unwrap();
        assert!(registry.renderer("journal").is_some());
        assert!(registry.instantiate(&def).is_ok());

        assert!(registry.bind_renderer("levitation", noop_factory()).is_err());
    }

    #[test]
    fn listing_sorted_with_badges() {
        let mut registry = PractaRegistry::with_builtins();
        registry
            .register_community(&descriptor("box-breath"), noop_factory())
            .unwrap();

        let listing = registry.listing();
        let names: Vec<&str> = listing.iter().map(|e| e.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);

        let community = listing.iter().find(|e| e.practa_type == "box-breath").unwrap();
        assert_eq!(community.origin, OriginBadge::Community);
        assert!(community.runnable);

        let journal = listing.iter().find(|e| e.practa_type == "journal").unwrap();
        assert_eq!(journal.origin, OriginBadge::Builtin);
        assert!(!journal.runnable);
    }
}
