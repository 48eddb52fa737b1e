//! External collaborators
//!
//! Each service is a trait so the controller can be driven by in-memory fakes
//! in tests. Production implementations:
//!
//! - `http_content`: track and book listings over HTTP
//! - `connectivity`: TCP reachability probe
//! - `geocoder`: Nominatim place search
//! - `favorites`: favourite ids in a JSON file
//! - `profile_store`: the user profile in a JSON file
//! - `player`: external command-line audio player

mod http_content;
mod connectivity;
mod geocoder;
mod favorites;
mod profile_store;
mod player;

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::AppError;
use crate::model::{Book, Place, Track, UserProfile};

pub use http_content::HttpContentService;
pub use connectivity::TcpConnectivityProbe;
pub use geocoder::NominatimSearch;
pub use favorites::JsonFavoritesStore;
pub use profile_store::JsonUserStore;
pub use player::ProcessPlayer;

#[async_trait]
pub trait ContentService: Send + Sync {
    async fn fetch_tracks(&self) -> Result<Vec<Track>, AppError>;
    async fn fetch_books(&self) -> Result<Vec<Book>, AppError>;
}

#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn has_connection(&self) -> bool;
    fn offline_message(&self) -> String;
}

#[async_trait]
pub trait LocationSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Place>, AppError>;
}

#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Flip `id` in the persisted set; returns whether it is now a favourite.
    async fn toggle(&self, id: &str) -> Result<bool, AppError>;
    async fn current_set(&self) -> Result<HashSet<String>, AppError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn save(&self, profile: &UserProfile) -> Result<(), AppError>;
    async fn load(&self) -> Result<Option<UserProfile>, AppError>;
}

/// Playback is owned by the player; state changes come back as
/// [`crate::model::PlayerEvent`]s on the channel handed out at construction.
#[async_trait]
pub trait Player: Send + Sync {
    async fn play(&self, track: &Track) -> Result<(), AppError>;
    async fn pause(&self) -> Result<(), AppError>;
    async fn resume(&self) -> Result<(), AppError>;
    async fn stop(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct Services {
    pub content: Arc<dyn ContentService>,
    pub connectivity: Arc<dyn ConnectivityProbe>,
    pub locations: Arc<dyn LocationSearch>,
    pub favorites: Arc<dyn FavoritesStore>,
    pub users: Arc<dyn UserStore>,
    pub player: Arc<dyn Player>,
}

/// Shared `reqwest` client with the configured timeout and user agent.
pub fn http_client(config: &crate::config::ServiceConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.request_timeout())
        .user_agent(config.user_agent.clone())
        .build()
}
