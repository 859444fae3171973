use std::collections::{BTreeMap, BTreeSet};

use crate::{
    ContentView, Detail, ReadingMode, Section, SpeechState, StudyTimer, Unit, UnitNumber, UnitSeed,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    units: BTreeMap<UnitNumber, Unit>,
    document_order: Vec<UnitNumber>,
    sections: Vec<Section>,
    view: ContentView,
    reading_mode: ReadingMode,
    timer: StudyTimer,
    notes: String,
    speech: SpeechState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds units and sections in document order.
    ///
    /// Unit number 0 and repeated numbers are dropped; the first occurrence wins.
    pub fn from_units(seeds: impl IntoIterator<Item = UnitSeed>) -> Self {
        let mut state = Self::new();
        for seed in seeds {
            if seed.number == 0 || state.units.contains_key(&seed.number) {
                continue;
            }
            let number = seed.number;
            let section_index = match state
                .sections
                .iter()
                .position(|section| section.id() == seed.section_id)
            {
                Some(index) => index,
                None => {
                    state.sections.push(Section::new(seed.section_id.clone()));
                    state.sections.len() - 1
                }
            };
            let ordinal = state.sections[section_index].push(number);
            let document_index = state.document_order.len();
            state
                .units
                .insert(number, Unit::from_seed(seed, ordinal, document_index));
            state.document_order.push(number);
        }
        state.recompute_sections();
        state.dirty = true;
        state
    }

    pub fn unit(&self, number: UnitNumber) -> Option<&Unit> {
        self.units.get(&number)
    }

    /// Units in document order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.document_order
            .iter()
            .filter_map(|number| self.units.get(number))
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id() == id)
    }

    pub fn expanded_unit(&self) -> Option<UnitNumber> {
        self.units().find(|unit| unit.expanded).map(Unit::number)
    }

    /// `true` iff every unit of the section is completed; vacuously `true`
    /// for a section with no units, including unknown section ids.
    pub fn compute_section_completion(&self, section_id: &str) -> bool {
        self.units
            .values()
            .filter(|unit| unit.section_id() == section_id)
            .all(|unit| unit.completed)
    }

    pub fn view_mode(&self) -> ContentView {
        self.view
    }

    pub fn reading_mode(&self) -> ReadingMode {
        self.reading_mode
    }

    pub fn timer(&self) -> &StudyTimer {
        &self.timer
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn speech(&self) -> &SpeechState {
        &self.speech
    }

    /// Returns whether anything visible changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Collapses or expands `number`, keeping at most one unit expanded.
    ///
    /// Returns the new expanded state, or `None` for an unknown unit.
    pub(crate) fn toggle_expand(&mut self, number: UnitNumber) -> Option<bool> {
        let currently_expanded = self.units.get(&number)?.expanded;
        if currently_expanded {
            if let Some(unit) = self.units.get_mut(&number) {
                unit.expanded = false;
            }
        } else {
            for unit in self.units.values_mut() {
                unit.expanded = unit.number() == number;
            }
        }
        self.dirty = true;
        Some(!currently_expanded)
    }

    /// Marks an unsettled detail slot as pending. Returns `true` if a lookup is needed.
    pub(crate) fn request_detail(&mut self, number: UnitNumber) -> bool {
        match self.units.get_mut(&number) {
            Some(unit) if !unit.detail.is_settled() => {
                unit.detail = Detail::Pending;
                true
            }
            _ => false,
        }
    }

    /// Caches a lookup result. Settled details are never replaced.
    pub(crate) fn apply_detail(&mut self, number: UnitNumber, content: Option<String>) -> bool {
        let Some(unit) = self.units.get_mut(&number) else {
            return false;
        };
        if unit.detail.is_settled() {
            return false;
        }
        unit.detail = match content {
            Some(text) => Detail::Resolved(text),
            None => Detail::Missing,
        };
        self.dirty = true;
        true
    }

    /// Flips completion. Returns the progress key and new state.
    pub(crate) fn toggle_completed(&mut self, number: UnitNumber) -> Option<(String, bool)> {
        let unit = self.units.get_mut(&number)?;
        unit.completed = !unit.completed;
        let outcome = (unit.unit_id(), unit.completed);
        let section_id = unit.section_id().to_string();
        self.recompute_section(&section_id);
        self.dirty = true;
        Some(outcome)
    }

    /// Sets `completed` from the persisted set of completed unit ids.
    pub(crate) fn apply_completed_ids(&mut self, completed_ids: &[String]) -> bool {
        let completed: BTreeSet<&str> = completed_ids.iter().map(String::as_str).collect();
        let mut changed = false;
        for unit in self.units.values_mut() {
            let persisted = completed.contains(unit.unit_id().as_str());
            if unit.completed != persisted {
                unit.completed = persisted;
                changed = true;
            }
        }
        changed |= self.recompute_sections();
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Collapses all but the first expanded unit in document order.
    pub(crate) fn enforce_single_expansion(&mut self) -> bool {
        let Some(keep) = self.expanded_unit() else {
            return false;
        };
        let mut changed = false;
        for unit in self.units.values_mut() {
            if unit.expanded && unit.number() != keep {
                unit.expanded = false;
                changed = true;
            }
        }
        changed
    }

    pub(crate) fn recompute_sections(&mut self) -> bool {
        let ids: Vec<String> = self
            .sections
            .iter()
            .map(|section| section.id().to_string())
            .collect();
        let mut changed = false;
        for id in ids {
            changed |= self.recompute_section(&id);
        }
        changed
    }

    fn recompute_section(&mut self, section_id: &str) -> bool {
        let all_completed = self.compute_section_completion(section_id);
        match self
            .sections
            .iter_mut()
            .find(|section| section.id() == section_id)
        {
            Some(section) if section.all_completed != all_completed => {
                section.all_completed = all_completed;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_view(&mut self, view: ContentView) -> bool {
        if self.view == view {
            return false;
        }
        self.view = view;
        self.dirty = true;
        true
    }

    pub(crate) fn set_reading_mode(&mut self, mode: ReadingMode) -> bool {
        if self.reading_mode == mode {
            return false;
        }
        self.reading_mode = mode;
        self.dirty = true;
        true
    }

    pub(crate) fn timer_mut(&mut self) -> &mut StudyTimer {
        &mut self.timer
    }

    pub(crate) fn speech_mut(&mut self) -> &mut SpeechState {
        &mut self.speech
    }

    pub(crate) fn set_notes(&mut self, text: String) -> bool {
        if self.notes == text {
            return false;
        }
        self.notes = text;
        self.dirty = true;
        true
    }
}
