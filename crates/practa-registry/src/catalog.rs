//! First-party unit catalog

use practa_core::PractaDefinition;

/// Types shipped with the app
pub const BUILTIN_TYPES: [&str; 7] = [
    "breathing",
    "body-scan",
    "gratitude",
    "journal",
    "silent-meditation",
    "intention",
    "mood-check-in",
];

/// Catalog definitions for every builtin type
#[must_use]
pub fn builtin_definitions() -> Vec<PractaDefinition> {
    [
        ("breathing", "Breathing", "Paced breathing with a visual guide"),
        ("body-scan", "Body Scan", "Move attention slowly through the body"),
        ("gratitude", "Gratitude", "Name three things you are grateful for"),
        ("journal", "Journal", "Free writing or a voice note"),
        ("silent-meditation", "Silent Meditation", "Timed sitting with a closing bell"),
        ("intention", "Set an Intention", "One sentence to carry into the day"),
        ("mood-check-in", "Mood Check-In", "Pick how you feel right now"),
    ]
    .into_iter()
    .map(|(practa_type, name, description)| {
        PractaDefinition::builtin(practa_type, practa_type, name).with_description(description)
    })
    .collect()
}
