//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{ProfileField, Screen};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.model.set_should_quit(true).await;
            return Ok(());
        }

        // Handle error message first (blocks all other interactions)
        if self.model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.model.clear_error().await;
            }
            return Ok(());
        }

        // Handle help popup
        if self.model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('?')) {
                self.model.toggle_help_popup().await;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Tab => {
                self.model.cycle_screen(!key.modifiers.contains(KeyModifiers::SHIFT)).await;
                return Ok(());
            }
            KeyCode::BackTab => {
                self.model.cycle_screen(false).await;
                return Ok(());
            }
            _ => {}
        }

        let handled = match self.model.current_screen().await {
            Screen::Tracks => self.handle_tracks_key(key).await,
            Screen::Books => self.handle_books_key(key).await,
            Screen::Profile => self.handle_profile_key(key).await,
        };
        if handled || self.model.is_typing().await {
            return Ok(());
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.model.set_should_quit(true).await;
            }
            KeyCode::Char('h') | KeyCode::Char('?') => {
                self.model.toggle_help_popup().await;
            }
            KeyCode::Char('1') => self.model.set_screen(Screen::Tracks).await,
            KeyCode::Char('2') => self.model.set_screen(Screen::Books).await,
            KeyCode::Char('3') => self.model.set_screen(Screen::Profile).await,
            _ => {}
        }
        Ok(())
    }

    async fn handle_tracks_key(&self, key: KeyEvent) -> bool {
        let searching = self.model.tracks.lock().await.search_active;

        if searching {
            match key.code {
                KeyCode::Esc => self.toggle_search_mode().await,
                KeyCode::Backspace => self.track_query_pop().await,
                KeyCode::Char(c) => self.track_query_push(c).await,
                KeyCode::Up => self.model.tracks.lock().await.move_up(),
                KeyCode::Down => self.model.tracks.lock().await.move_down(),
                KeyCode::Enter => self.play_selected().await,
                _ => return false,
            }
            return true;
        }

        match key.code {
            KeyCode::Char('/') => self.toggle_search_mode().await,
            KeyCode::Up => self.model.tracks.lock().await.move_up(),
            KeyCode::Down => self.model.tracks.lock().await.move_down(),
            KeyCode::Enter => self.play_selected().await,
            KeyCode::Char(' ') => self.toggle_pause().await,
            KeyCode::Char('s') | KeyCode::Char('S') => self.stop_playback().await,
            KeyCode::Char('r') | KeyCode::Char('R') => self.spawn_load(Screen::Tracks),
            _ => return false,
        }
        true
    }

    async fn handle_books_key(&self, key: KeyEvent) -> bool {
        let searching = self.model.books.lock().await.search_active;

        if searching {
            match key.code {
                KeyCode::Esc => self.toggle_book_search().await,
                KeyCode::Backspace => self.book_query_pop().await,
                KeyCode::Char(c) => self.book_query_push(c).await,
                KeyCode::Up => self.book_move_up().await,
                KeyCode::Down => self.book_move_down().await,
                _ => return false,
            }
            return true;
        }

        match key.code {
            KeyCode::Char('/') => self.toggle_book_search().await,
            KeyCode::Up => self.book_move_up().await,
            KeyCode::Down => self.book_move_down().await,
            KeyCode::Char('f') | KeyCode::Char('F') | KeyCode::Enter => {
                // Persisting runs in the background
                let _ = self.toggle_favorite().await;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => self.cycle_category().await,
            KeyCode::Char('v') | KeyCode::Char('V') => self.toggle_favorites_only().await,
            KeyCode::Char('r') | KeyCode::Char('R') => self.spawn_load(Screen::Books),
            _ => return false,
        }
        true
    }

    async fn handle_profile_key(&self, key: KeyEvent) -> bool {
        let focus = self.model.profile.lock().await.focus;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('s') if ctrl => self.save_profile().await,
            KeyCode::Up => self.profile_focus(false).await,
            KeyCode::Down => self.profile_focus(true).await,
            KeyCode::PageUp if focus == ProfileField::BirthPlace => {
                self.move_place_suggestion(false).await
            }
            KeyCode::PageDown if focus == ProfileField::BirthPlace => {
                self.move_place_suggestion(true).await
            }
            KeyCode::Enter if focus == ProfileField::BirthPlace => self.pick_place().await,
            KeyCode::Left if !focus.is_text() => self.profile_cycle_choice(false).await,
            KeyCode::Right if !focus.is_text() => self.profile_cycle_choice(true).await,
            KeyCode::Backspace if focus.is_text() => self.profile_backspace().await,
            KeyCode::Char(c) if focus.is_text() && !ctrl => self.profile_type_char(c).await,
            _ => return false,
        }
        true
    }

    /// Reload a screen without blocking the input loop.
    pub fn spawn_load(&self, screen: Screen) {
        let controller = self.clone();
        tokio::spawn(async move {
            match screen {
                Screen::Tracks => controller.load_tracks().await,
                Screen::Books => controller.load_books().await,
                Screen::Profile => controller.load_profile().await,
            }
        });
    }
}
