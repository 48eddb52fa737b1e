//! Core type definitions for the application

use std::time::{Duration, Instant};

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Which screen is shown
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Tracks,
    Books,
    Profile,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Tracks, Screen::Books, Screen::Profile];

    pub fn next(self) -> Self {
        match self {
            Screen::Tracks => Screen::Books,
            Screen::Books => Screen::Profile,
            Screen::Profile => Screen::Tracks,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Screen::Tracks => Screen::Profile,
            Screen::Books => Screen::Tracks,
            Screen::Profile => Screen::Books,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Tracks => "Tracks",
            Screen::Books => "Books",
            Screen::Profile => "Profile",
        }
    }
}

/// Focusable fields of the profile editor, top to bottom
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ProfileField {
    #[default]
    Name,
    BirthDate,
    BirthTime,
    BirthPlace,
    Ayanamsa,
    HouseSystem,
    ChartStyle,
}

impl ProfileField {
    pub const ALL: [ProfileField; 7] = [
        ProfileField::Name,
        ProfileField::BirthDate,
        ProfileField::BirthTime,
        ProfileField::BirthPlace,
        ProfileField::Ayanamsa,
        ProfileField::HouseSystem,
        ProfileField::ChartStyle,
    ];

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + 1).min(Self::ALL.len() - 1)]
    }

    pub fn prev(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[index.saturating_sub(1)]
    }

    /// Free-text fields take typed characters; the rest are pickers.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            ProfileField::Name | ProfileField::BirthDate | ProfileField::BirthTime | ProfileField::BirthPlace
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Name => "Name",
            ProfileField::BirthDate => "Birth date",
            ProfileField::BirthTime => "Birth time",
            ProfileField::BirthPlace => "Birth place",
            ProfileField::Ayanamsa => "Ayanamsa",
            ProfileField::HouseSystem => "House system",
            ProfileField::ChartStyle => "Chart style",
        }
    }
}

/// UI state shared by all screens
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub screen: Screen,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl UiState {
    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
        self.error_timestamp = Some(Instant::now());
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
        self.error_timestamp = None;
    }

    pub fn clear_expired_error(&mut self) {
        if let Some(timestamp) = self.error_timestamp {
            if timestamp.elapsed() > ERROR_DISPLAY_TIME {
                self.clear_error();
            }
        }
    }
}
