//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists)
//! - `layout`: Main layout structure (screen tabs, status bar)
//! - `tracks`, `books`, `profile`: One renderer per screen
//! - `overlays`: Modal overlays (error, help)

mod utils;
mod layout;
mod tracks;
mod books;
mod profile;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{RenderState, Screen};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, state: &RenderState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Screen tabs
                Constraint::Min(0),    // Current screen
                Constraint::Length(3), // Now playing
            ])
            .split(frame.area());

        layout::render_tabs(frame, chunks[0], state.ui.screen);

        match state.ui.screen {
            Screen::Tracks => tracks::render_tracks(frame, chunks[1], &state.tracks, &state.playback),
            Screen::Books => books::render_books(
                frame,
                chunks[1],
                &state.books,
                &state.visible_books,
                &state.favorites,
            ),
            Screen::Profile => profile::render_profile(frame, chunks[1], &state.profile, &state.place_search),
        }

        layout::render_status_bar(frame, chunks[2], &state.tracks, &state.playback);

        // Error notification overlay (if there's an error)
        if state.ui.error_message.is_some() {
            overlays::render_error_notification(frame, &state.ui);
        }

        // Help popup overlay (if open)
        if state.ui.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
