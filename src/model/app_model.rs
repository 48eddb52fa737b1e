//! Main application model with state management

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::content::{Book, Place};
use super::playback::{PlaybackState, PlayerEvent};
use super::screens::{BookListState, ProfileDraft, TrackBrowserState};
use super::search::{DebouncedSearch, SearchSettings, SearchSnapshot};
use super::selection::SelectionSet;
use super::types::{Screen, UiState};

/// Everything the view needs for one frame
#[derive(Clone, Debug)]
pub struct RenderState {
    pub ui: UiState,
    pub tracks: TrackBrowserState,
    pub books: BookListState,
    pub visible_books: Vec<Book>,
    pub favorites: SelectionSet,
    pub playback: PlaybackState,
    pub profile: ProfileDraft,
    pub place_search: SearchSnapshot<Place>,
}

/// Main application model containing all state
#[derive(Clone)]
pub struct AppModel {
    pub ui_state: Arc<Mutex<UiState>>,
    pub tracks: Arc<Mutex<TrackBrowserState>>,
    pub books: Arc<Mutex<BookListState>>,
    pub favorites: Arc<RwLock<SelectionSet>>,
    pub playback: Arc<Mutex<PlaybackState>>,
    pub profile: Arc<Mutex<ProfileDraft>>,
    pub place_search: DebouncedSearch<Place>,
    should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(search_settings: SearchSettings) -> Self {
        Self {
            ui_state: Arc::new(Mutex::new(UiState::default())),
            tracks: Arc::new(Mutex::new(TrackBrowserState::default())),
            books: Arc::new(Mutex::new(BookListState::default())),
            favorites: Arc::new(RwLock::new(SelectionSet::new())),
            playback: Arc::new(Mutex::new(PlaybackState::default())),
            profile: Arc::new(Mutex::new(ProfileDraft::default())),
            place_search: DebouncedSearch::new(search_settings),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn current_screen(&self) -> Screen {
        self.ui_state.lock().await.screen
    }

    pub async fn set_screen(&self, screen: Screen) {
        let mut state = self.ui_state.lock().await;
        state.screen = screen;
    }

    pub async fn cycle_screen(&self, forward: bool) {
        let mut state = self.ui_state.lock().await;
        state.screen = if forward { state.screen.next() } else { state.screen.prev() };
    }

    pub async fn set_error(&self, message: String) {
        self.ui_state.lock().await.set_error(message);
    }

    pub async fn clear_error(&self) {
        self.ui_state.lock().await.clear_error();
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        self.ui_state.lock().await.clear_expired_error();
    }

    pub async fn toggle_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = !state.show_help_popup;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    /// True while a text field has keyboard focus, so letters must not act
    /// as shortcuts.
    pub async fn is_typing(&self) -> bool {
        match self.current_screen().await {
            Screen::Tracks => self.tracks.lock().await.search_active,
            Screen::Books => self.books.lock().await.search_active,
            Screen::Profile => self.profile.lock().await.focus.is_text(),
        }
    }

    pub async fn apply_player_event(&self, event: &PlayerEvent) {
        self.playback.lock().await.apply(event);
    }

    pub async fn visible_books(&self) -> Vec<Book> {
        let books = self.books.lock().await;
        let favorites = self.favorites.read().await;
        books.visible_books(&favorites)
    }

    pub async fn render_state(&self) -> RenderState {
        let ui = self.get_ui_state().await;
        let tracks = self.tracks.lock().await.clone();
        let books = self.books.lock().await.clone();
        let favorites = self.favorites.read().await.clone();
        let visible_books = books.visible_books(&favorites);
        let playback = self.playback.lock().await.clone();
        let profile = self.profile.lock().await.clone();
        let place_search = self.place_search.snapshot().await;

        RenderState {
            ui,
            tracks,
            books,
            visible_books,
            favorites,
            playback,
            profile,
            place_search,
        }
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new(SearchSettings::default())
    }
}
