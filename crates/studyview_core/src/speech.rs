use crate::Effect;

/// Read-aloud state. The host owns the synthesizer; this only tracks what it
/// was last told to do.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpeechState {
    supported: bool,
    speaking: bool,
    paused: bool,
    current_text: String,
}

impl SpeechState {
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Text of the current utterance, empty after stop.
    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    /// Returns `true` when support changed. Losing support resets everything.
    pub(crate) fn set_supported(&mut self, supported: bool) -> bool {
        if self.supported == supported {
            return false;
        }
        *self = Self {
            supported,
            ..Self::default()
        };
        true
    }

    /// Play on the active view's text: resumes a paused utterance of the same
    /// text, replaces one with different text, otherwise starts speaking.
    /// Blank text does nothing.
    pub(crate) fn play(&mut self, text: &str) -> Vec<Effect> {
        let text = text.trim();
        if !self.supported || text.is_empty() {
            return Vec::new();
        }
        let speak = Effect::Speak {
            text: text.to_string(),
        };
        let effects = match (self.speaking, self.paused, self.current_text == text) {
            (true, true, true) => vec![Effect::ResumeSpeech],
            (true, false, true) => return Vec::new(),
            (true, _, false) => vec![Effect::CancelSpeech, speak],
            (false, _, _) => vec![speak],
        };
        self.current_text = text.to_string();
        self.speaking = true;
        self.paused = false;
        effects
    }

    /// Only an utterance that is audibly speaking can be paused.
    pub(crate) fn pause(&mut self) -> Option<Effect> {
        if !self.speaking || self.paused {
            return None;
        }
        self.paused = true;
        Some(Effect::PauseSpeech)
    }

    /// Cancels unconditionally and forgets the utterance.
    pub(crate) fn stop(&mut self) -> Option<Effect> {
        if !self.supported {
            return None;
        }
        self.speaking = false;
        self.paused = false;
        self.current_text.clear();
        Some(Effect::CancelSpeech)
    }

    /// The host reports the utterance ran to its end. The text is kept so
    /// play speaks it again.
    pub(crate) fn finished(&mut self) -> bool {
        if !self.speaking {
            return false;
        }
        self.speaking = false;
        self.paused = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported() -> SpeechState {
        let mut speech = SpeechState::default();
        speech.set_supported(true);
        speech
    }

    fn speak(text: &str) -> Effect {
        Effect::Speak {
            text: text.to_string(),
        }
    }

    #[test]
    fn unsupported_speech_ignores_every_control() {
        let mut speech = SpeechState::default();
        assert!(speech.play("hello").is_empty());
        assert_eq!(speech.pause(), None);
        assert_eq!(speech.stop(), None);
        assert!(!speech.is_speaking());
    }

    #[test]
    fn pause_then_play_resumes_same_text() {
        let mut speech = supported();
        assert_eq!(speech.play("  Cells divide. "), vec![speak("Cells divide.")]);
        assert!(speech.play("Cells divide.").is_empty());
        assert_eq!(speech.pause(), Some(Effect::PauseSpeech));
        assert_eq!(speech.pause(), None);
        assert_eq!(speech.play("Cells divide."), vec![Effect::ResumeSpeech]);
        assert!(speech.is_speaking());
        assert!(!speech.is_paused());
    }

    #[test]
    fn new_text_replaces_running_utterance() {
        let mut speech = supported();
        speech.play("first view");
        speech.pause();
        assert_eq!(
            speech.play("second view"),
            vec![Effect::CancelSpeech, speak("second view")]
        );
        assert_eq!(speech.current_text(), "second view");
        assert!(!speech.is_paused());
    }

    #[test]
    fn stop_clears_text_and_finish_keeps_it() {
        let mut speech = supported();
        speech.play("text");
        assert!(speech.finished());
        assert!(!speech.finished());
        assert_eq!(speech.current_text(), "text");
        assert_eq!(speech.play("text"), vec![speak("text")]);

        assert_eq!(speech.stop(), Some(Effect::CancelSpeech));
        assert_eq!(speech.current_text(), "");
        assert!(!speech.is_speaking());
    }

    #[test]
    fn losing_support_resets_state() {
        let mut speech = supported();
        speech.play("text");
        assert!(speech.set_supported(false));
        assert_eq!(speech, SpeechState::default());
        assert!(!speech.set_supported(false));
    }
}
