pub const DEFAULT_STUDY_SECS: u32 = 25 * 60;

/// Countdown timer for a study session. Time only moves on [`StudyTimer::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyTimer {
    remaining_secs: u32,
    running: bool,
}

impl Default for StudyTimer {
    fn default() -> Self {
        Self {
            remaining_secs: DEFAULT_STUDY_SECS,
            running: false,
        }
    }
}

impl StudyTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns `false` when already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_secs = DEFAULT_STUDY_SECS;
    }

    /// Switches to a preset length; a running countdown keeps running.
    pub fn apply_preset(&mut self, minutes: u32) {
        self.remaining_secs = minutes.saturating_mul(60);
    }

    /// One second elapsed. Returns `true` when this tick finished the countdown.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.running = false;
            return true;
        }
        false
    }

    /// `MM:SS`, minutes are not capped at 59.
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }
}
