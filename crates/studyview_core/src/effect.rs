#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Look up detailed content and answer with `Msg::DetailResolved`.
    ResolveDetail { unit: crate::UnitNumber },
    SaveProgress { unit_id: String, completed: bool },
    SaveNotes { text: String },
    ClearNotes,
    TimerFinished,
    Speak { text: String },
    PauseSpeech,
    ResumeSpeech,
    /// Stop speaking and drop any queued utterance.
    CancelSpeech,
}
