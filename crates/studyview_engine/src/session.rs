use std::collections::VecDeque;
use std::sync::Arc;

use studyview_core::{
    update, AppState, AppViewModel, ContentIndex, DetailSource, Effect, Msg, ProgressMap,
    ProgressRecord, UnitNumber, UnitSeed,
};
use studyview_logging::{study_debug, study_error, study_info, study_warn};

use crate::{
    KeyValueStore, LegacyProgressRepository, NotesRepository, ProgressRepository, SessionConfig,
};

/// Owns the learning view's state for one page load and executes the
/// effects the pure core asks for against the store and content index.
///
/// Every call runs to completion, so two toggles never interleave.
pub struct StudySession {
    state: AppState,
    details: Box<dyn DetailSource>,
    store: Arc<dyn KeyValueStore>,
    config: SessionConfig,
    progress: ProgressRepository,
    /// Present only when legacy import is enabled.
    legacy: Option<LegacyProgressRepository>,
    notes: NotesRepository,
}

impl StudySession {
    /// Builds units from `seeds`, applies persisted completion and restores notes.
    ///
    /// Never fails: unreadable or malformed stored data counts as no progress.
    pub fn initialize(
        seeds: Vec<UnitSeed>,
        details: impl DetailSource + 'static,
        store: Arc<dyn KeyValueStore>,
        config: SessionConfig,
    ) -> Self {
        let seed_count = seeds.len();
        let state = AppState::from_units(seeds);
        if state.unit_count() < seed_count {
            study_warn!(
                "Dropped {} units with zero or duplicate unit numbers",
                seed_count - state.unit_count()
            );
        }

        let progress = ProgressRepository::for_user(config.user_id.as_deref());
        let notes = NotesRepository::new(&config.notes_scope, &config.material_id);
        let legacy = config
            .import_legacy_progress
            .then(|| LegacyProgressRepository::for_material(&config.material_id));
        let mut session = Self {
            state,
            details: Box::new(details),
            store,
            config,
            progress,
            legacy,
            notes,
        };

        let mut map = session.progress.load(session.store.as_ref());
        session.import_legacy_progress(&mut map);
        session.dispatch(Msg::RestoreProgress(map.completed_ids()));
        session.dispatch(Msg::SpeechSupportDetected(session.config.speech_supported));

        if let Some(text) = session.notes.load(session.store.as_ref()) {
            session.dispatch(Msg::NotesRestored(text));
        }

        study_info!(
            "Initialized {} units in {} sections for material {} ({} completed)",
            session.state.unit_count(),
            session.state.sections().len(),
            session.config.material_id,
            session.state.units().filter(|unit| unit.is_completed()).count()
        );
        session
    }

    /// Units come from the index's own sections; the index also serves detail lookups.
    pub fn from_content_index(
        index: ContentIndex,
        store: Arc<dyn KeyValueStore>,
        config: SessionConfig,
    ) -> Self {
        let seeds = index.unit_seeds();
        Self::initialize(seeds, index, store, config)
    }

    /// Expands or collapses a unit. Returns the new expanded state, `None` for unknown units.
    pub fn toggle_expand(&mut self, unit: UnitNumber) -> Option<bool> {
        if self.state.unit(unit).is_none() {
            study_warn!("toggle_expand: unknown unit {}", unit);
            return None;
        }
        self.dispatch(Msg::ToggleExpand(unit));
        self.state.unit(unit).map(|unit| unit.is_expanded())
    }

    /// Flips completion and persists it. Returns the new completed state.
    pub fn toggle_completed(&mut self, unit: UnitNumber) -> Option<bool> {
        if self.state.unit(unit).is_none() {
            study_warn!("toggle_completed: unknown unit {}", unit);
            return None;
        }
        self.dispatch(Msg::ToggleCompleted(unit));
        self.state.unit(unit).map(|unit| unit.is_completed())
    }

    pub fn compute_section_completion(&self, section_id: &str) -> bool {
        self.state.compute_section_completion(section_id)
    }

    /// Re-applies persisted progress and re-derives section and detail state.
    ///
    /// Never writes; calling it repeatedly has no further effect. If the
    /// stored progress cannot be read, in-memory completion is kept.
    pub fn reconcile(&mut self) {
        if let Some(map) = self.progress.load_checked(self.store.as_ref()) {
            self.dispatch(Msg::RestoreProgress(map.completed_ids()));
        }
        self.dispatch(Msg::Reconcile);
    }

    /// Applies a message, executing store and lookup effects in place.
    ///
    /// Returns the effects left for the host: `TimerFinished` and the speech commands.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let mut inbox = VecDeque::from([msg]);
        let mut unhandled = Vec::new();
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            for effect in effects {
                if let Some(follow_up) = self.run_effect(effect, &mut unhandled) {
                    inbox.push_back(follow_up);
                }
            }
        }
        unhandled
    }

    fn run_effect(&self, effect: Effect, unhandled: &mut Vec<Effect>) -> Option<Msg> {
        match effect {
            Effect::ResolveDetail { unit } => {
                let content = self.details.detailed_content(unit);
                if content.is_none() {
                    study_debug!("No detailed content for unit {}", unit);
                }
                Some(Msg::DetailResolved { unit, content })
            }
            Effect::SaveProgress { unit_id, completed } => {
                let timestamp = (self.config.timestamp_utc)();
                if let Err(err) =
                    self.progress
                        .record(self.store.as_ref(), &unit_id, completed, timestamp)
                {
                    study_error!("Failed to save progress for {}: {}", unit_id, err);
                }
                if !completed {
                    self.forget_legacy_completion(&unit_id);
                }
                None
            }
            Effect::SaveNotes { text } => {
                if let Err(err) = self.notes.save(self.store.as_ref(), &text) {
                    study_error!("Failed to save notes to {}: {}", self.notes.key(), err);
                }
                None
            }
            Effect::ClearNotes => {
                if let Err(err) = self.notes.clear(self.store.as_ref()) {
                    study_error!("Failed to clear notes {}: {}", self.notes.key(), err);
                }
                None
            }
            Effect::TimerFinished => {
                study_info!("Study timer finished");
                unhandled.push(Effect::TimerFinished);
                None
            }
            speech @ (Effect::Speak { .. }
            | Effect::PauseSpeech
            | Effect::ResumeSpeech
            | Effect::CancelSpeech) => {
                study_debug!("Handing speech effect to host: {:?}", speech);
                unhandled.push(speech);
                None
            }
        }
    }

    /// Un-completing must also clear the legacy flag, or the next import
    /// would mark the unit completed again.
    fn forget_legacy_completion(&self, unit_id: &str) {
        let Some(legacy) = &self.legacy else {
            return;
        };
        let Some(unit) = self.state.units().find(|unit| unit.unit_id() == unit_id) else {
            return;
        };
        if let Err(err) = legacy.forget(self.store.as_ref(), unit.document_index()) {
            study_error!("Failed to update legacy progress {}: {}", legacy.key(), err);
        }
    }

    /// Adds records for units completed in the per-material legacy mapping.
    fn import_legacy_progress(&self, map: &mut ProgressMap) {
        let Some(legacy) = &self.legacy else {
            return;
        };
        let legacy = legacy.load(self.store.as_ref());
        if legacy.completed_indices().is_empty() {
            return;
        }

        let mut imported = 0usize;
        for unit in self.state.units() {
            let unit_id = unit.unit_id();
            if legacy.is_completed(unit.document_index()) && !map.is_completed(&unit_id) {
                map.set(
                    &unit_id,
                    &ProgressRecord {
                        completed: true,
                        timestamp: (self.config.timestamp_utc)(),
                    },
                );
                imported += 1;
            }
        }
        if imported == 0 {
            return;
        }
        match self.progress.replace(self.store.as_ref(), map) {
            Ok(()) => study_info!(
                "Imported {} legacy completions into {}",
                imported,
                self.progress.key()
            ),
            Err(err) => study_error!("Failed to store imported legacy progress: {}", err),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// See [`AppState::consume_dirty`].
    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn progress_key(&self) -> &str {
        self.progress.key()
    }

    pub fn notes_key(&self) -> &str {
        self.notes.key()
    }
}
