//! Testing utilities for the Practa workspace
//!
//! Scripted units, recording sinks, and package fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use practa_core::{
    CompletionSink, Practa, PractaCallbacks, PractaCapabilities, PractaContext, PractaDefinition,
    PractaOutput, UnitFactory,
};
use practa_registry::PractaRegistry;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// What a [`ScriptedPracta`] does when run
#[derive(Debug, Clone)]
pub enum Script {
    Complete(PractaOutput),
    CompleteAfter(Duration, PractaOutput),
    /// Complete with the previous step's content, or empty at index 0
    EchoPrevious,
    /// Skip if allowed, otherwise complete empty
    Skip,
    /// Drop the callbacks without signalling
    Abandon,
    /// Hold the callbacks forever
    Hang,
}

/// Contexts seen by scripted units, shared across clones
#[derive(Debug, Clone, Default)]
pub struct ContextLog(Arc<Mutex<Vec<PractaContext>>>);

impl ContextLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contexts(&self) -> Vec<PractaContext> {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    fn push(&self, context: PractaContext) {
        self.0.lock().push(context);
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedPracta {
    script: Script,
    capabilities: PractaCapabilities,
    log: ContextLog,
}

impl ScriptedPracta {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            capabilities: PractaCapabilities::default(),
            log: ContextLog::new(),
        }
    }

    #[must_use]
    pub fn skippable(mut self) -> Self {
        self.capabilities = PractaCapabilities::skippable();
        self
    }

    #[must_use]
    pub fn with_log(mut self, log: ContextLog) -> Self {
        self.log = log;
        self
    }

    pub fn log(&self) -> &ContextLog {
        &self.log
    }

    /// Factory producing clones of this unit
    pub fn factory(self) -> UnitFactory {
        Arc::new(move |_: &PractaDefinition| Box::new(self.clone()) as Box<dyn Practa>)
    }
}

#[async_trait]
impl Practa for ScriptedPracta {
    fn capabilities(&self) -> PractaCapabilities {
        self.capabilities
    }

    async fn run(&self, context: PractaContext, callbacks: PractaCallbacks) {
        let previous_content = context.previous().and_then(|p| p.content.clone());
        self.log.push(context);

        match &self.script {
            Script::Complete(output) => callbacks.complete(output.clone()),
            Script::CompleteAfter(delay, output) => {
                tokio::time::sleep(*delay).await;
                callbacks.complete(output.clone());
            }
            Script::EchoPrevious => {
                let output = previous_content
                    .map_or_else(PractaOutput::empty, |c| PractaOutput::empty().with_content(c));
                callbacks.complete(output);
            }
            Script::Skip => {
                if let Err(callbacks) = callbacks.skip() {
                    callbacks.complete(PractaOutput::empty());
                }
            }
            Script::Abandon => drop(callbacks),
            Script::Hang => {
                let _held = callbacks;
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Builtin registry with every listed type bound to a scripted unit
///
/// Unlisted builtins complete with an empty output. All units share `log`.
pub fn scripted_registry(scripts: &[(&str, ScriptedPracta)], log: &ContextLog) -> PractaRegistry {
    let mut registry = PractaRegistry::with_builtins();
    for practa_type in practa_registry::BUILTIN_TYPES {
        let unit = ScriptedPracta::new(Script::Complete(PractaOutput::empty())).with_log(log.clone());
        registry
            .bind_renderer(practa_type, unit.factory())
            .unwrap();
    }
    for (practa_type, unit) in scripts {
        registry
            .bind_renderer(practa_type, unit.clone().with_log(log.clone()).factory())
            .unwrap();
    }
    registry
}

/// Sink remembering every persisted step
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<(String, PractaOutput)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(String, PractaOutput)> {
        self.records.lock().clone()
    }

    pub fn unit_types(&self) -> Vec<String> {
        self.records.lock().iter().map(|(t, _)| t.clone()).collect()
    }
}

#[async_trait]
impl CompletionSink for RecordingSink {
    async fn persist_completed_unit(&self, output: &PractaOutput, unit_type: &str) {
        self.records
            .lock()
            .push((unit_type.to_string(), output.clone()));
    }
}

/// Component source passing every check, advisories included
pub const VALID_ENTRY: &str = r#"import React from 'react';
import { SafeAreaView, Pressable, Text } from 'react-native';
import * as Haptics from 'expo-haptics';
import { useTheme } from '../theme';

export default function BoxBreath({ context, onComplete, onSkip }) {
  const theme = useTheme();
  const finish = () => {
    Haptics.impactAsync();
    onComplete({ content: { type: 'text', value: 'done' }, metadata: { source: 'user' } });
  };
  return (
    <SafeAreaView style={{ backgroundColor: theme.background }}>
      <Pressable onPress={finish}><Text>Done</Text></Pressable>
      <Pressable onPress={onSkip}><Text>Skip</Text></Pressable>
    </SafeAreaView>
  );
}
"#;

/// Component source with only the required parts
pub const MINIMAL_ENTRY: &str = r"export default function Minimal({ onComplete }) {
  return <Button onPress={() => onComplete({})} />;
}
";

/// Component source that never completes
pub const STALLING_ENTRY: &str = r"export default function Stuck() {
  return null;
}
";

/// Descriptor passing every metadata check
pub fn valid_metadata() -> Value {
    json!({
        "id": "box-breath",
        "name": "Box Breath",
        "description": "Four-count breathing with a square guide",
        "author": "sam",
        "version": "1.0.0",
        "estimatedDuration": 180,
        "category": "breathing",
        "tags": ["calm", "focus"]
    })
}

/// Valid descriptor with one key removed
pub fn metadata_without(key: &str) -> Value {
    let mut metadata = valid_metadata();
    if let Some(object) = metadata.as_object_mut() {
        object.remove(key);
    }
    metadata
}

/// Valid descriptor using the legacy identifier key
pub fn legacy_metadata() -> Value {
    let mut metadata = valid_metadata();
    if let Some(object) = metadata.as_object_mut() {
        if let Some(id) = object.remove("id") {
            object.insert("type".to_string(), id);
        }
    }
    metadata
}

/// Write `index.tsx` and optionally `metadata.json` into `dir`
pub fn write_package(dir: &Path, entry: &str, metadata: Option<&Value>) -> std::io::Result<()> {
    std::fs::write(dir.join("index.tsx"), entry)?;
    if let Some(metadata) = metadata {
        let text = serde_json::to_string_pretty(metadata).map_err(std::io::Error::other)?;
        std::fs::write(dir.join("metadata.json"), text)?;
    }
    Ok(())
}

/// Temporary package directory
pub fn package_dir(entry: &str, metadata: Option<&Value>) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_package(dir.path(), entry, metadata).unwrap();
    dir
}
