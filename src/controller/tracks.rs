//! Track browser: loading, local search and playback control

use crate::error::AppError;
use crate::model::{PlayerEvent, RowPlayback, Track};
use super::AppController;

impl AppController {
    pub async fn load_tracks(&self) {
        {
            let mut tracks = self.model.tracks.lock().await;
            tracks.loading = true;
            tracks.error = None;
        }

        let result = self.fetch_tracks().await;

        let mut tracks = self.model.tracks.lock().await;
        tracks.loading = false;
        match result {
            Ok(loaded) => {
                tracing::info!(count = loaded.len(), "Tracks loaded");
                tracks.set_tracks(loaded);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load tracks");
                tracks.error = Some(e.user_message());
            }
        }
    }

    async fn fetch_tracks(&self) -> Result<Vec<Track>, AppError> {
        self.ensure_online().await?;
        self.services.content.fetch_tracks().await
    }

    pub async fn toggle_search_mode(&self) {
        let mut tracks = self.model.tracks.lock().await;
        tracks.toggle_search();
        tracing::debug!(active = tracks.search_active, "Track search toggled");
    }

    pub async fn update_track_query(&self, text: String) {
        self.model.tracks.lock().await.set_query(text);
    }

    pub async fn track_query_push(&self, c: char) {
        let mut query = self.model.tracks.lock().await.query.clone();
        query.push(c);
        self.update_track_query(query).await;
    }

    pub async fn track_query_pop(&self) {
        let mut query = self.model.tracks.lock().await.query.clone();
        query.pop();
        self.update_track_query(query).await;
    }

    /// Play the highlighted row, or pause / resume it if it is already current.
    pub async fn play_selected(&self) {
        let Some(track) = self.model.tracks.lock().await.selected_track().cloned() else {
            return;
        };
        let row = self.model.playback.lock().await.row_state(&track.id);

        let result = match row {
            RowPlayback::Idle => {
                self.model.playback.lock().await.select(&track.id);
                self.services.player.play(&track).await
            }
            RowPlayback::CurrentPlaying => self.services.player.pause().await,
            RowPlayback::CurrentPaused => self.services.player.resume().await,
        };

        if let Err(e) = result {
            if row == RowPlayback::Idle {
                // Nothing is playing; drop the pending selection
                self.model
                    .apply_player_event(&PlayerEvent::Ended { track_id: track.id.clone() })
                    .await;
            }
            self.report_error("play_selected", &e).await;
        }
    }

    /// Pause or resume whatever is current, regardless of the highlighted row.
    pub async fn toggle_pause(&self) {
        let (current, playing) = {
            let playback = self.model.playback.lock().await;
            (playback.current().map(str::to_string), playback.is_playing())
        };
        if current.is_none() {
            return;
        }

        let result = if playing {
            self.services.player.pause().await
        } else {
            self.services.player.resume().await
        };
        if let Err(e) = result {
            self.report_error("toggle_pause", &e).await;
        }
    }

    pub async fn stop_playback(&self) {
        if let Err(e) = self.services.player.stop().await {
            self.report_error("stop_playback", &e).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use crate::error::FETCH_FAILED_MESSAGE;
    use crate::model::{PlayerEvent, RowPlayback};
    use super::super::test_support::{track, Harness, OFFLINE};

    fn sample_tracks() -> Vec<crate::model::Track> {
        vec![
            track("t1", "Aarti Sangam", "Morning"),
            track("t2", "Bhajan", "Evening"),
        ]
    }

    #[tokio::test]
    async fn offline_load_never_fetches() {
        let h = Harness::new();
        h.connectivity.online.store(false, Ordering::SeqCst);

        h.controller.load_tracks().await;

        assert_eq!(h.content.calls.load(Ordering::SeqCst), 0);
        let tracks = h.model().tracks.lock().await;
        assert_eq!(tracks.error.as_deref(), Some(OFFLINE));
        assert!(!tracks.loading);
    }

    #[tokio::test]
    async fn load_then_search_filters_locally() {
        let h = Harness::new();
        *h.content.tracks.lock().unwrap() = sample_tracks();
        h.controller.load_tracks().await;

        h.controller.toggle_search_mode().await;
        h.controller.update_track_query("aarti".to_string()).await;
        {
            let tracks = h.model().tracks.lock().await;
            assert_eq!(tracks.visible.len(), 1);
            assert_eq!(tracks.visible[0].id, "t1");
        }

        h.controller.toggle_search_mode().await;
        let tracks = h.model().tracks.lock().await;
        assert!(!tracks.search_active);
        assert_eq!(tracks.query, "");
        assert_eq!(tracks.visible.len(), 2);
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_list() {
        let h = Harness::new();
        *h.content.tracks.lock().unwrap() = sample_tracks();
        h.controller.load_tracks().await;

        h.content.fail.store(true, Ordering::SeqCst);
        h.controller.load_tracks().await;

        let tracks = h.model().tracks.lock().await;
        assert_eq!(tracks.tracks.len(), 2);
        assert_eq!(tracks.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn selected_row_cycles_play_pause_resume() {
        let h = Harness::new();
        *h.content.tracks.lock().unwrap() = sample_tracks();
        h.controller.load_tracks().await;

        h.controller.play_selected().await;
        assert_eq!(
            h.model().playback.lock().await.row_state("t1"),
            RowPlayback::CurrentPaused
        );

        h.model()
            .apply_player_event(&PlayerEvent::Started { track_id: "t1".into() })
            .await;
        h.controller.play_selected().await;
        h.model()
            .apply_player_event(&PlayerEvent::Paused { track_id: "t1".into() })
            .await;
        h.controller.play_selected().await;

        assert_eq!(
            *h.player.commands.lock().unwrap(),
            vec!["play t1".to_string(), "pause".to_string(), "resume".to_string()]
        );
    }

    #[tokio::test]
    async fn toggle_pause_without_current_track_does_nothing() {
        let h = Harness::new();
        h.controller.toggle_pause().await;
        assert!(h.player.commands.lock().unwrap().is_empty());
    }
}
