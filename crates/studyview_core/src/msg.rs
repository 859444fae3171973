#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Unit ids whose persisted record says completed.
    RestoreProgress(Vec<String>),
    /// User clicked a unit header.
    ToggleExpand(crate::UnitNumber),
    /// Answer to `Effect::ResolveDetail`; `None` when the index has no entry.
    DetailResolved {
        unit: crate::UnitNumber,
        content: Option<String>,
    },
    /// User clicked "Mark as Complete" / "Completed".
    ToggleCompleted(crate::UnitNumber),
    /// Re-derive everything that depends on layout or persisted state.
    Reconcile,
    ViewSelected(crate::ContentView),
    ReadingModeSelected(crate::ReadingMode),
    TimerStartClicked,
    TimerPauseClicked,
    TimerResetClicked,
    TimerPresetSelected { minutes: u32 },
    /// One second of wall time elapsed.
    Tick,
    /// Notes loaded from the store at startup.
    NotesRestored(String),
    NotesEdited(String),
    NotesSaveClicked,
    /// Periodic auto-save; only non-empty notes are written.
    NotesAutoSaveDue,
    NotesCleared,
    /// Whether the host can synthesize speech; controls are hidden when not.
    SpeechSupportDetected(bool),
    /// Play with the plain text of the active content view.
    SpeechPlayClicked { text: String },
    SpeechPauseClicked,
    SpeechStopClicked,
    /// The host's utterance reached its end.
    SpeechFinished,
    NoOp,
}
