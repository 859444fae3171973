use crate::{AppState, ContentView, ReadingMode, UnitNumber};

pub const COMPLETE_LABEL: &str = "Mark as Complete";
pub const COMPLETED_LABEL: &str = "Completed";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub view: ContentView,
    pub reading_mode: ReadingMode,
    pub units: Vec<UnitRowView>,
    pub sections: Vec<SectionView>,
    pub timer: TimerView,
    pub speech: SpeechView,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRowView {
    pub number: UnitNumber,
    pub unit_id: String,
    pub section_id: String,
    pub summary: String,
    /// Rendered detail; only present while expanded and resolved.
    pub detail: Option<String>,
    pub expanded: bool,
    pub completed: bool,
    pub complete_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub id: String,
    pub unit_count: usize,
    pub completed_count: usize,
    pub all_completed: bool,
}

/// Read-aloud controls; the whole group is hidden when `visible` is false.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpeechView {
    pub visible: bool,
    pub speaking: bool,
    pub paused: bool,
    pub pause_enabled: bool,
    pub stop_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimerView {
    pub display: String,
    pub running: bool,
    pub start_enabled: bool,
    pub pause_enabled: bool,
}

impl AppState {
    pub fn view(&self) -> AppViewModel {
        let mode = self.reading_mode();
        let units = self
            .units()
            .map(|unit| UnitRowView {
                number: unit.number(),
                unit_id: unit.unit_id(),
                section_id: unit.section_id().to_string(),
                summary: mode.render(unit.summary()),
                detail: unit
                    .is_expanded()
                    .then(|| unit.detail().text().map(|text| mode.render(text)))
                    .flatten(),
                expanded: unit.is_expanded(),
                completed: unit.is_completed(),
                complete_label: if unit.is_completed() {
                    COMPLETED_LABEL
                } else {
                    COMPLETE_LABEL
                },
            })
            .collect();

        let sections = self
            .sections()
            .iter()
            .map(|section| SectionView {
                id: section.id().to_string(),
                unit_count: section.units().len(),
                completed_count: section
                    .units()
                    .iter()
                    .filter(|number| self.unit(**number).is_some_and(|unit| unit.is_completed()))
                    .count(),
                all_completed: section.all_completed(),
            })
            .collect();

        let timer = self.timer();
        let speech = self.speech();
        AppViewModel {
            view: self.view_mode(),
            reading_mode: mode,
            units,
            sections,
            timer: TimerView {
                display: timer.display(),
                running: timer.is_running(),
                start_enabled: !timer.is_running(),
                pause_enabled: timer.is_running(),
            },
            speech: SpeechView {
                visible: speech.is_supported(),
                speaking: speech.is_speaking(),
                paused: speech.is_paused(),
                pause_enabled: speech.is_speaking() && !speech.is_paused(),
                stop_enabled: speech.is_supported(),
            },
            notes: self.notes().to_string(),
        }
    }
}
