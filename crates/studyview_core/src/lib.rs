//! Studyview core: pure state machine for the learning view and its view-model helpers.
mod content_index;
mod effect;
mod msg;
mod progress;
mod reading;
mod speech;
mod state;
mod timer;
mod unit;
mod update;
mod view_model;

pub use content_index::{
    ContentIndex, DetailSource, DetailedUnit, IndexMicroUnit, IndexSection, UnitKey,
};
pub use effect::Effect;
pub use msg::Msg;
pub use progress::{
    legacy_progress_key, legacy_unit_key, material_id_from_location, notes_key, progress_key, LegacyProgress,
    NotesScope, ProgressMap, ProgressRecord, ANONYMOUS_USER, DEFAULT_MATERIAL,
};
pub use reading::{bionic_markup, ContentView, ReadingMode};
pub use speech::SpeechState;
pub use state::AppState;
pub use timer::{StudyTimer, DEFAULT_STUDY_SECS};
pub use unit::{Detail, Section, Unit, UnitNumber, UnitSeed, NO_DETAIL_AVAILABLE};
pub use update::update;
pub use view_model::{
    AppViewModel, SectionView, SpeechView, TimerView, UnitRowView, COMPLETED_LABEL, COMPLETE_LABEL,
};
