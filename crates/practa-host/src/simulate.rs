//! Headless stand-ins for builtin units

use async_trait::async_trait;
use practa_core::{
    ContentSource, Practa, PractaCallbacks, PractaContext, PractaDefinition, PractaMetadata,
    PractaOutput, UnitFactory,
};
use practa_registry::{PractaRegistry, BUILTIN_TYPES};
use std::sync::Arc;

/// Unit that completes at once with `"<type> done"`
#[derive(Debug, Clone)]
pub struct SimulatedPracta {
    practa_type: String,
}

impl SimulatedPracta {
    /// Create for a unit type
    #[must_use]
    pub fn new(practa_type: impl Into<String>) -> Self {
        Self {
            practa_type: practa_type.into(),
        }
    }

    /// Factory usable with [`PractaRegistry::bind_renderer`]
    #[must_use]
    pub fn factory() -> UnitFactory {
        Arc::new(|definition: &PractaDefinition| {
            Box::new(Self::new(definition.practa_type.clone())) as Box<dyn Practa>
        })
    }
}

#[async_trait]
impl Practa for SimulatedPracta {
    async fn run(&self, context: PractaContext, callbacks: PractaCallbacks) {
        tracing::trace!(
            index = context.practa_index(),
            practa_type = %self.practa_type,
            "simulated unit"
        );
        let output = PractaOutput::text(format!("{} done", self.practa_type)).with_metadata(
            PractaMetadata::new()
                .with_source(ContentSource::System)
                .with_rice(1),
        );
        callbacks.complete(output);
    }
}

/// Builtin registry with every type bound to [`SimulatedPracta`]
#[must_use]
pub fn simulation_registry() -> PractaRegistry {
    let mut registry = PractaRegistry::with_builtins();
    for practa_type in BUILTIN_TYPES {
        if let Err(err) = registry.bind_renderer(practa_type, SimulatedPracta::factory()) {
            tracing::warn!(%err, "builtin missing from catalog");
        }
    }
    registry
}
