use std::sync::{Arc, Once};

use pretty_assertions::assert_eq;
use serde_json::Value;
use studyview_core::{ContentIndex, Effect, Msg, NotesScope, ReadingMode, UnitSeed};
use studyview_engine::{InMemoryStore, KeyValueStore, SessionConfig, StudySession};

const FIXED_TS: &str = "2024-05-01T10:00:00.000Z";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(studyview_logging::initialize_for_tests);
}

fn seeds() -> Vec<UnitSeed> {
    vec![
        UnitSeed::new(10, "s1", "first"),
        UnitSeed::new(11, "s1", "second"),
        UnitSeed::new(12, "s2", "third"),
    ]
}

fn session(store: &InMemoryStore, config: SessionConfig) -> StudySession {
    StudySession::initialize(seeds(), ContentIndex::default(), Arc::new(store.clone()), config)
}

fn material_config() -> SessionConfig {
    SessionConfig::for_location(None, "/learning/m42").with_timestamps(|| FIXED_TS.to_string())
}

#[test]
fn notes_are_saved_per_material_by_default() {
    init_logging();
    let store = InMemoryStore::new();
    let mut session = session(&store, material_config());
    assert_eq!(session.notes_key(), "learning_notes_m42");

    session.dispatch(Msg::NotesEdited("remember the bias examples".into()));
    assert_eq!(store.get("learning_notes_m42").unwrap(), None);

    session.dispatch(Msg::NotesSaveClicked);
    assert_eq!(
        store.get("learning_notes_m42").unwrap().as_deref(),
        Some("remember the bias examples")
    );
    assert_eq!(store.get("learning_notes").unwrap(), None);
}

#[test]
fn shared_notes_use_single_key_and_restore() {
    init_logging();
    let store = InMemoryStore::with_entries([("learning_notes", "old thoughts")]);
    let mut config = material_config();
    config.notes_scope = NotesScope::Shared;

    let session = session(&store, config);
    assert_eq!(session.notes_key(), "learning_notes");
    assert_eq!(session.state().notes(), "old thoughts");
    assert_eq!(session.view().notes, "old thoughts");
}

#[test]
fn autosave_skips_empty_notes() {
    init_logging();
    let store = InMemoryStore::new();
    let mut session = session(&store, material_config());

    session.dispatch(Msg::NotesAutoSaveDue);
    assert!(store.snapshot().is_empty());

    session.dispatch(Msg::NotesEdited("draft".into()));
    session.dispatch(Msg::NotesAutoSaveDue);
    assert_eq!(
        store.get("learning_notes_m42").unwrap().as_deref(),
        Some("draft")
    );
}

#[test]
fn clearing_notes_removes_the_key() {
    init_logging();
    let store = InMemoryStore::with_entries([("learning_notes_m42", "to be erased")]);
    let mut session = session(&store, material_config());
    assert_eq!(session.state().notes(), "to be erased");

    session.dispatch(Msg::NotesCleared);
    assert_eq!(session.state().notes(), "");
    assert_eq!(store.get("learning_notes_m42").unwrap(), None);
}

#[test]
fn legacy_progress_is_ignored_unless_enabled() {
    init_logging();
    let store = InMemoryStore::with_entries([("micro_units_progress_m42", r#"{"unit_0": true}"#)]);
    let session = session(&store, material_config());

    assert!(session.state().units().all(|unit| !unit.is_completed()));
    assert_eq!(store.get("ai4fairedu_progress_anonymous").unwrap(), None);
}

#[test]
fn legacy_progress_is_imported_by_document_position() {
    init_logging();
    let store = InMemoryStore::with_entries([
        (
            "micro_units_progress_m42",
            r#"{"unit_0": true, "unit_2": true, "unit_1": false, "junk": true}"#,
        ),
        (
            "ai4fairedu_progress_anonymous",
            r#"{"s1-1": {"completed": true, "timestamp": "kept"}}"#,
        ),
    ]);
    let mut config = material_config();
    config.import_legacy_progress = true;
    let session = session(&store, config);

    let completed: Vec<_> = session
        .state()
        .units()
        .filter(|unit| unit.is_completed())
        .map(|unit| unit.number())
        .collect();
    assert_eq!(completed, vec![10, 12]);

    let stored: Value =
        serde_json::from_str(&store.get("ai4fairedu_progress_anonymous").unwrap().unwrap())
            .unwrap();
    assert_eq!(
        stored,
        serde_json::json!({
            "s1-1": {"completed": true, "timestamp": "kept"},
            "s2-1": {"completed": true, "timestamp": FIXED_TS},
        })
    );
    assert_eq!(
        store.get("micro_units_progress_m42").unwrap().as_deref(),
        Some(r#"{"unit_0": true, "unit_2": true, "unit_1": false, "junk": true}"#)
    );
}

#[test]
fn timer_finish_is_handed_back_to_host() {
    init_logging();
    let mut session = session(&InMemoryStore::new(), material_config());

    session.dispatch(Msg::TimerPresetSelected { minutes: 1 });
    assert!(session.dispatch(Msg::Tick).is_empty());
    session.dispatch(Msg::TimerStartClicked);

    let mut finished = Vec::new();
    for _ in 0..60 {
        finished.extend(session.dispatch(Msg::Tick));
    }
    assert_eq!(finished, vec![Effect::TimerFinished]);
    assert_eq!(session.view().timer.display, "00:00");
    assert!(!session.state().timer().is_running());
    assert!(session.dispatch(Msg::Tick).is_empty());
}

#[test]
fn reading_mode_changes_mark_state_dirty() {
    init_logging();
    let mut session = session(&InMemoryStore::new(), material_config());
    session.consume_dirty();

    session.dispatch(Msg::ReadingModeSelected(ReadingMode::Bionic));
    assert!(session.consume_dirty());
    assert!(!session.consume_dirty());
    assert_eq!(session.view().reading_mode, ReadingMode::Bionic);
}

#[test]
fn uncompleting_imported_unit_survives_reload() {
    init_logging();
    let store = InMemoryStore::with_entries([(
        "micro_units_progress_m42",
        r#"{"unit_0": true, "unit_1": true}"#,
    )]);
    let config = || {
        let mut config = material_config();
        config.import_legacy_progress = true;
        config
    };

    let mut first = session(&store, config());
    assert!(first.state().unit(10).unwrap().is_completed());
    assert_eq!(first.toggle_completed(10), Some(false));
    assert_eq!(
        store.get("micro_units_progress_m42").unwrap().as_deref(),
        Some(r#"{"unit_1":true}"#)
    );

    let reloaded = session(&store, config());
    assert!(!reloaded.state().unit(10).unwrap().is_completed());
    assert!(reloaded.state().unit(11).unwrap().is_completed());
    let stored: Value =
        serde_json::from_str(&store.get("ai4fairedu_progress_anonymous").unwrap().unwrap())
            .unwrap();
    assert_eq!(stored.as_object().unwrap().len(), 1);
    assert_eq!(stored["s1-2"]["completed"], true);
}

#[test]
fn uncompleting_without_import_leaves_legacy_mapping_alone() {
    init_logging();
    let legacy = r#"{"unit_0": true}"#;
    let store = InMemoryStore::with_entries([("micro_units_progress_m42", legacy)]);
    let mut session = session(&store, material_config());

    session.toggle_completed(10);
    session.toggle_completed(10);
    assert_eq!(
        store.get("micro_units_progress_m42").unwrap().as_deref(),
        Some(legacy)
    );
}

#[test]
fn speech_commands_are_handed_back_to_host() {
    init_logging();
    let store = InMemoryStore::new();
    let mut unsupported = session(&store, material_config());
    assert!(unsupported
        .dispatch(Msg::SpeechPlayClicked {
            text: "first".into()
        })
        .is_empty());
    assert!(!unsupported.view().speech.visible);

    let mut config = material_config();
    config.speech_supported = true;
    let mut session = session(&store, config);
    assert!(session.view().speech.visible);

    assert_eq!(
        session.dispatch(Msg::SpeechPlayClicked {
            text: "first unit text".into()
        }),
        vec![Effect::Speak {
            text: "first unit text".into()
        }]
    );
    assert_eq!(
        session.dispatch(Msg::SpeechPauseClicked),
        vec![Effect::PauseSpeech]
    );
    assert_eq!(
        session.dispatch(Msg::SpeechStopClicked),
        vec![Effect::CancelSpeech]
    );
    assert_eq!(session.state().speech().current_text(), "");
    assert!(store.snapshot().is_empty());
}
