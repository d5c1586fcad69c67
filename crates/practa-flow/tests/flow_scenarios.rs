use practa_core::{
    ContentSource, FlowDefinition, PractaContent, PractaDefinition, PractaMetadata, PractaOutput,
};
use practa_flow::{EngineConfig, FlowEngine, FlowError, FlowEvent, FlowStatus};
use proptest::prelude::*;

fn flow_of(types: &[&str]) -> FlowDefinition {
    let steps = types
        .iter()
        .enumerate()
        .map(|(i, t)| PractaDefinition::builtin(format!("{t}-{i}"), *t, *t))
        .collect();
    FlowDefinition::new("scenario", steps)
}

fn output_strategy() -> impl Strategy<Value = PractaOutput> {
    (
        prop::option::of("[a-z ]{0,16}"),
        prop::option::of(0u32..50),
        prop::option::of(prop_oneof![
            Just(ContentSource::User),
            Just(ContentSource::Ai),
            Just(ContentSource::System),
        ]),
    )
        .prop_map(|(text, rice, source)| {
            let mut output = PractaOutput::empty();
            if let Some(text) = text {
                output = output.with_content(PractaContent::text(text));
            }
            if rice.is_some() || source.is_some() {
                let mut metadata = PractaMetadata::new();
                metadata.rice_earned = rice;
                metadata.source = source;
                output = output.with_metadata(metadata);
            }
            output
        })
}

#[test]
fn two_step_flow_threads_previous_content() {
    let engine = FlowEngine::new(EngineConfig::default());
    let mut flow = engine
        .start_flow(flow_of(&["journal", "silent-meditation"]))
        .unwrap();

    flow.advance(PractaOutput::text("hello")).unwrap();

    let context = flow.current_context().unwrap();
    let previous = context.previous().unwrap();
    assert_eq!(previous.content.as_ref().unwrap().value(), "hello");
    assert_eq!(previous.practa_type, "journal");
}

#[test]
fn abort_mid_flow_keeps_partial_outputs() {
    let engine = FlowEngine::new(EngineConfig::default());
    let mut flow = engine
        .start_flow(flow_of(&["breathing", "journal", "gratitude"]))
        .unwrap();
    let mut events = flow.subscribe();

    flow.advance(PractaOutput::text("step one")).unwrap();
    let state = flow.abort_flow().unwrap();
    assert_eq!(state.status(), FlowStatus::Aborted);
    assert_eq!(state.practa_outputs().len(), 1);

    assert_eq!(
        flow.advance(PractaOutput::empty()).unwrap_err(),
        FlowError::Terminal {
            status: FlowStatus::Aborted
        }
    );
    assert!(flow.skip_current().is_err());

    let mut aborted = None;
    while let Ok(event) = events.try_recv() {
        if let FlowEvent::Aborted { outputs, .. } = event {
            aborted = Some(outputs);
        }
    }
    assert_eq!(aborted, Some(vec![PractaOutput::text("step one")]));
}

#[test]
fn completed_flow_rejects_further_steps() {
    let engine = FlowEngine::new(EngineConfig::default());
    let mut flow = engine.start_flow(flow_of(&["mood-check-in"])).unwrap();
    flow.advance(PractaOutput::empty()).unwrap();

    assert!(flow.advance(PractaOutput::empty()).unwrap_err().is_terminal());
    assert!(flow.abort_flow().unwrap_err().is_terminal());
    assert_eq!(flow.state().status(), FlowStatus::Completed);
}

proptest! {
    #[test]
    fn prop_n_advances_complete(outputs in prop::collection::vec(output_strategy(), 1..10)) {
        let types: Vec<&str> = outputs.iter().map(|_| "journal").collect();
        let engine = FlowEngine::new(EngineConfig::default());
        let mut flow = engine.start_flow(flow_of(&types)).unwrap();

        for output in &outputs {
            prop_assert_eq!(flow.state().status(), FlowStatus::Running);
            flow.advance(output.clone()).unwrap();
        }

        let state = flow.state();
        prop_assert_eq!(state.status(), FlowStatus::Completed);
        prop_assert_eq!(state.current_index(), outputs.len());
        prop_assert_eq!(state.practa_outputs(), outputs.as_slice());
        prop_assert!(flow.journal().verify_integrity().is_ok());
    }

    #[test]
    fn prop_previous_matches_prior_output(outputs in prop::collection::vec(output_strategy(), 2..8)) {
        let types: Vec<&str> = outputs.iter().map(|_| "gratitude").collect();
        let engine = FlowEngine::new(EngineConfig::default());
        let mut flow = engine.start_flow(flow_of(&types)).unwrap();

        for (i, output) in outputs.iter().enumerate() {
            let context = flow.current_context().unwrap();
            prop_assert_eq!(context.practa_index(), i);
            if i == 0 {
                prop_assert!(context.previous().is_none());
            } else {
                let previous = context.previous().unwrap();
                let prior = &flow.state().practa_outputs()[i - 1];
                prop_assert_eq!(
                    serde_json::to_value(&previous.content).unwrap(),
                    serde_json::to_value(&prior.content).unwrap()
                );
                prop_assert_eq!(&previous.metadata, &prior.metadata);
            }
            flow.advance(output.clone()).unwrap();
        }
    }

    #[test]
    fn prop_skips_preserve_length(skips in prop::collection::vec(any::<bool>(), 1..10)) {
        let types: Vec<&str> = skips.iter().map(|_| "breathing").collect();
        let engine = FlowEngine::new(EngineConfig::default());
        let mut flow = engine.start_flow(flow_of(&types)).unwrap();

        for &skip in &skips {
            if skip {
                flow.skip_current().unwrap();
            } else {
                flow.advance(PractaOutput::text("done")).unwrap();
            }
        }

        let state = flow.state();
        prop_assert_eq!(state.status(), FlowStatus::Completed);
        prop_assert_eq!(state.practa_outputs().len(), skips.len());
        let expected: Vec<usize> = skips
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| s.then_some(i))
            .collect();
        prop_assert_eq!(state.skipped_indices(), expected.as_slice());
    }
}
