use practa_registry::{FlowOverrides, PractaRegistry, RegistryError, BUILTIN_TYPES};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_flow_keeps_every_step(picks in prop::collection::vec(0..BUILTIN_TYPES.len(), 0..12)) {
        let registry = PractaRegistry::with_builtins();
        let types: Vec<&str> = picks.iter().map(|&i| BUILTIN_TYPES[i]).collect();

        let flow = registry.create_flow("Generated", &types, FlowOverrides::default()).unwrap();

        prop_assert_eq!(flow.len(), types.len());
        for (step, practa_type) in flow.practas.iter().zip(&types) {
            prop_assert_eq!(&step.practa_type, practa_type);
        }
        let mut ids: Vec<&str> = flow.practas.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), types.len());
    }

    #[test]
    fn prop_unknown_type_anywhere_fails(
        picks in prop::collection::vec(0..BUILTIN_TYPES.len(), 0..6),
        at in 0usize..6,
    ) {
        let registry = PractaRegistry::with_builtins();
        let mut types: Vec<&str> = picks.iter().map(|&i| BUILTIN_TYPES[i]).collect();
        let at = at.min(types.len());
        types.insert(at, "not-a-practa");

        let err = registry.create_flow("Broken", &types, FlowOverrides::default()).unwrap_err();
        prop_assert_eq!(err, RegistryError::unknown("not-a-practa"));
    }
}

#[test]
fn listing_serializes_badge() {
    let registry = PractaRegistry::with_builtins();
    let listing = registry.listing();
    let json = serde_json::to_value(&listing[0]).unwrap();
    assert_eq!(json["origin"], "builtin");
    assert_eq!(json["runnable"], false);
}
