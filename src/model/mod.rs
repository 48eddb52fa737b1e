//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Screen / focus enums and shared UI state
//! - `content`: Typed records (tracks, books, places, profiles)
//! - `filter`: Local case-insensitive list filtering
//! - `search`: Debounced remote search with stale-result suppression
//! - `selection`: Favourite ids
//! - `playback`: Row playback indicator mirrored from the player
//! - `screens`: Per-screen state
//! - `app_model`: Main application model tying the pieces together

mod types;
mod content;
mod filter;
mod search;
mod selection;
mod playback;
mod screens;
mod app_model;

pub use types::{ProfileField, Screen, UiState};

pub use content::{
    Ayanamsa, Book, ChartStyle, Choice, HouseSystem, Place, Track, UserProfile,
};

pub use search::{SearchSettings, SearchSnapshot};

pub use selection::SelectionSet;

pub use playback::{PlaybackState, PlayerEvent, RowPlayback};

pub use screens::{BookListState, ProfileDraft, TrackBrowserState};

pub use app_model::{AppModel, RenderState};
