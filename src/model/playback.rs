//! Playback indicator state
//!
//! The player owns playback; this only mirrors what it reports so rows can
//! show whether they are idle, paused or playing.

/// Events reported by the external player
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    Started { track_id: String },
    Paused { track_id: String },
    Resumed { track_id: String },
    Ended { track_id: String },
}

/// Indicator for a single list row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowPlayback {
    Idle,
    CurrentPaused,
    CurrentPlaying,
}

#[derive(Clone, Debug, Default)]
pub struct PlaybackState {
    current: Option<String>,
    is_playing: bool,
}

impl PlaybackState {
    /// The user picked `track_id`; it becomes current but stays paused until
    /// the player confirms it started.
    pub fn select(&mut self, track_id: &str) {
        self.current = Some(track_id.to_string());
        self.is_playing = false;
    }

    pub fn apply(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::Started { track_id } | PlayerEvent::Resumed { track_id } => {
                self.current = Some(track_id.clone());
                self.is_playing = true;
            }
            PlayerEvent::Paused { track_id } => {
                if self.is_current(track_id) {
                    self.is_playing = false;
                }
            }
            PlayerEvent::Ended { track_id } => {
                // A replaced track reports its end after the new one started
                if self.is_current(track_id) {
                    self.current = None;
                    self.is_playing = false;
                }
            }
        }
    }

    pub fn row_state(&self, track_id: &str) -> RowPlayback {
        if !self.is_current(track_id) {
            RowPlayback::Idle
        } else if self.is_playing {
            RowPlayback::CurrentPlaying
        } else {
            RowPlayback::CurrentPaused
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    fn is_current(&self, track_id: &str) -> bool {
        self.current.as_deref() == Some(track_id)
    }
}
