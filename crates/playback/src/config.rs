use crate::speed::Speed;

/// Initial session settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackConfig {
    /// Start playing as soon as an experiment is submitted.
    pub auto_play: bool,
    pub speed: Speed,
}

impl PlaybackConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_play(mut self, auto_play: bool) -> Self {
        self.auto_play = auto_play;
        self
    }

    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }
}
