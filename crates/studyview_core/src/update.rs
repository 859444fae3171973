use crate::{AppState, Effect, Msg, SpeechState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::RestoreProgress(completed_ids) => {
            state.apply_completed_ids(&completed_ids);
            Vec::new()
        }
        Msg::ToggleExpand(unit) => match state.toggle_expand(unit) {
            Some(true) if state.request_detail(unit) => vec![Effect::ResolveDetail { unit }],
            _ => Vec::new(),
        },
        Msg::DetailResolved { unit, content } => {
            state.apply_detail(unit, content);
            Vec::new()
        }
        Msg::ToggleCompleted(unit) => match state.toggle_completed(unit) {
            Some((unit_id, completed)) => vec![Effect::SaveProgress { unit_id, completed }],
            None => Vec::new(),
        },
        Msg::Reconcile => {
            if state.enforce_single_expansion() | state.recompute_sections() {
                state.mark_dirty();
            }
            match state.expanded_unit() {
                Some(unit) if state.request_detail(unit) => vec![Effect::ResolveDetail { unit }],
                _ => Vec::new(),
            }
        }
        Msg::ViewSelected(view) => {
            state.set_view(view);
            Vec::new()
        }
        Msg::ReadingModeSelected(mode) => {
            state.set_reading_mode(mode);
            Vec::new()
        }
        Msg::TimerStartClicked => {
            if state.timer_mut().start() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::TimerPauseClicked => {
            if state.timer_mut().pause() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::TimerResetClicked => {
            state.timer_mut().reset();
            state.mark_dirty();
            Vec::new()
        }
        Msg::TimerPresetSelected { minutes } => {
            state.timer_mut().apply_preset(minutes);
            state.mark_dirty();
            Vec::new()
        }
        Msg::Tick => {
            if !state.timer().is_running() {
                return (state, Vec::new());
            }
            let finished = state.timer_mut().tick();
            state.mark_dirty();
            if finished {
                vec![Effect::TimerFinished]
            } else {
                Vec::new()
            }
        }
        Msg::NotesRestored(text) | Msg::NotesEdited(text) => {
            state.set_notes(text);
            Vec::new()
        }
        Msg::NotesSaveClicked => vec![Effect::SaveNotes {
            text: state.notes().to_string(),
        }],
        Msg::NotesAutoSaveDue => {
            if state.notes().is_empty() {
                Vec::new()
            } else {
                vec![Effect::SaveNotes {
                    text: state.notes().to_string(),
                }]
            }
        }
        Msg::NotesCleared => {
            state.set_notes(String::new());
            vec![Effect::ClearNotes]
        }
        Msg::SpeechSupportDetected(supported) => {
            if state.speech_mut().set_supported(supported) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SpeechPlayClicked { text } => {
            let effects = state.speech_mut().play(&text);
            if !effects.is_empty() {
                state.mark_dirty();
            }
            effects
        }
        Msg::SpeechPauseClicked => speech_control(&mut state, SpeechState::pause),
        Msg::SpeechStopClicked => speech_control(&mut state, SpeechState::stop),
        Msg::SpeechFinished => {
            if state.speech_mut().finished() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn speech_control(
    state: &mut AppState,
    control: impl FnOnce(&mut SpeechState) -> Option<Effect>,
) -> Vec<Effect> {
    match control(state.speech_mut()) {
        Some(effect) => {
            state.mark_dirty();
            vec![effect]
        }
        None => Vec::new(),
    }
}
