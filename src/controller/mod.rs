//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input
//! and coordinates between the model and the external services.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `tracks`: Track browser loading, search and playback
//! - `books`: Book list loading, filters and favourites
//! - `profile`: Profile editor, place search and saving
//! - `player_events`: Player event listener

mod input;
mod tracks;
mod books;
mod profile;
mod player_events;

use crate::error::AppError;
use crate::model::AppModel;
use crate::services::Services;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: AppModel,
    pub(crate) services: Services,
}

impl AppController {
    pub fn new(model: AppModel, services: Services) -> Self {
        Self { model, services }
    }

    /// Fails with the probe's offline message when there is no network.
    pub(crate) async fn ensure_online(&self) -> Result<(), AppError> {
        if self.services.connectivity.has_connection().await {
            Ok(())
        } else {
            Err(AppError::Offline(self.services.connectivity.offline_message()))
        }
    }

    /// Log the full error and show its user-facing message in the overlay.
    pub(crate) async fn report_error(&self, operation: &str, error: &AppError) {
        tracing::error!(
            operation,
            error = %error,
            retryable = error.is_retryable(),
            "Operation failed"
        );
        self.model.set_error(error.user_message()).await;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory services for driving the controller in tests.

    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::error::AppError;
    use crate::model::{AppModel, Book, Place, SearchSettings, Track, UserProfile};
    use crate::services::{
        ConnectivityProbe, ContentService, FavoritesStore, LocationSearch, Player, Services,
        UserStore,
    };
    use super::AppController;

    pub const OFFLINE: &str = "No internet connection.";

    #[derive(Default)]
    pub struct FakeContent {
        pub tracks: Mutex<Vec<Track>>,
        pub books: Mutex<Vec<Book>>,
        pub fail: AtomicBool,
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentService for FakeContent {
        async fn fetch_tracks(&self) -> Result<Vec<Track>, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::fetch("HTTP 502 from upstream"));
            }
            Ok(self.tracks.lock().unwrap().clone())
        }

        async fn fetch_books(&self) -> Result<Vec<Book>, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::fetch("HTTP 502 from upstream"));
            }
            Ok(self.books.lock().unwrap().clone())
        }
    }

    pub struct FakeConnectivity {
        pub online: AtomicBool,
    }

    #[async_trait]
    impl ConnectivityProbe for FakeConnectivity {
        async fn has_connection(&self) -> bool {
            self.online.load(Ordering::SeqCst)
        }

        fn offline_message(&self) -> String {
            OFFLINE.to_string()
        }
    }

    #[derive(Default)]
    pub struct FakeLocations {
        pub places: Mutex<Vec<Place>>,
        pub queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LocationSearch for FakeLocations {
        async fn search(&self, query: &str) -> Result<Vec<Place>, AppError> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.places.lock().unwrap().clone())
        }
    }

    #[derive(Default)]
    pub struct FakeFavorites {
        pub ids: Mutex<HashSet<String>>,
        pub fail: AtomicBool,
    }

    #[async_trait]
    impl FavoritesStore for FakeFavorites {
        async fn toggle(&self, id: &str) -> Result<bool, AppError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::persistence("disk full"));
            }
            let mut ids = self.ids.lock().unwrap();
            if ids.remove(id) {
                Ok(false)
            } else {
                ids.insert(id.to_string());
                Ok(true)
            }
        }

        async fn current_set(&self) -> Result<HashSet<String>, AppError> {
            Ok(self.ids.lock().unwrap().clone())
        }
    }

    #[derive(Default)]
    pub struct FakeUsers {
        pub saved: Mutex<Option<UserProfile>>,
        pub saves: AtomicUsize,
        pub fail: AtomicBool,
    }

    #[async_trait]
    impl UserStore for FakeUsers {
        async fn save(&self, profile: &UserProfile) -> Result<(), AppError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::persistence("permission denied: /data/profile.json"));
            }
            *self.saved.lock().unwrap() = Some(profile.clone());
            Ok(())
        }

        async fn load(&self) -> Result<Option<UserProfile>, AppError> {
            Ok(self.saved.lock().unwrap().clone())
        }
    }

    /// Records commands; events are fed to the model by the test itself.
    #[derive(Default)]
    pub struct FakePlayer {
        pub commands: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Player for FakePlayer {
        async fn play(&self, track: &Track) -> Result<(), AppError> {
            self.commands.lock().unwrap().push(format!("play {}", track.id));
            Ok(())
        }

        async fn pause(&self) -> Result<(), AppError> {
            self.commands.lock().unwrap().push("pause".to_string());
            Ok(())
        }

        async fn resume(&self) -> Result<(), AppError> {
            self.commands.lock().unwrap().push("resume".to_string());
            Ok(())
        }

        async fn stop(&self) -> Result<(), AppError> {
            self.commands.lock().unwrap().push("stop".to_string());
            Ok(())
        }
    }

    pub struct Harness {
        pub controller: AppController,
        pub content: Arc<FakeContent>,
        pub connectivity: Arc<FakeConnectivity>,
        pub locations: Arc<FakeLocations>,
        pub favorites: Arc<FakeFavorites>,
        pub users: Arc<FakeUsers>,
        pub player: Arc<FakePlayer>,
    }

    impl Harness {
        pub fn new() -> Self {
            let content = Arc::new(FakeContent::default());
            let connectivity = Arc::new(FakeConnectivity {
                online: AtomicBool::new(true),
            });
            let locations = Arc::new(FakeLocations::default());
            let favorites = Arc::new(FakeFavorites::default());
            let users = Arc::new(FakeUsers::default());
            let player = Arc::new(FakePlayer::default());

            let services = Services {
                content: content.clone(),
                connectivity: connectivity.clone(),
                locations: locations.clone(),
                favorites: favorites.clone(),
                users: users.clone(),
                player: player.clone(),
            };
            let controller = AppController::new(AppModel::new(SearchSettings::default()), services);

            Self {
                controller,
                content,
                connectivity,
                locations,
                favorites,
                users,
                player,
            }
        }

        pub fn model(&self) -> &AppModel {
            &self.controller.model
        }
    }

    pub fn track(id: &str, title: &str, subtitle: &str) -> Track {
        Track {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            audio_url: format!("https://cdn.example.org/{id}.mp3"),
            duration_secs: Some(300),
            artwork_url: None,
        }
    }

    pub fn book(id: &str, title: &str, author: &str, category: &str) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            category: category.to_string(),
            cover_url: None,
            description: None,
        }
    }

    pub fn place(name: &str) -> Place {
        Place {
            name: name.to_string(),
            latitude: 28.61,
            longitude: 77.21,
        }
    }
}
