//! Player event listener feeding the playback indicator

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::model::PlayerEvent;
use super::AppController;

impl AppController {
    pub fn start_player_event_listener(
        &self,
        mut events: mpsc::UnboundedReceiver<PlayerEvent>,
    ) -> JoinHandle<()> {
        let model = self.model.clone();
        tracing::info!("Starting player event listener");

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if model.should_quit().await {
                    tracing::debug!("Player event listener shutting down");
                    break;
                }

                match &event {
                    PlayerEvent::Started { track_id } => {
                        tracing::info!(track_id = %track_id, "PlayerEvent::Started");
                    }
                    PlayerEvent::Ended { track_id } => {
                        tracing::info!(track_id = %track_id, "PlayerEvent::Ended");
                    }
                    PlayerEvent::Paused { track_id } | PlayerEvent::Resumed { track_id } => {
                        tracing::debug!(track_id = %track_id, ?event, "Player state changed");
                    }
                }
                model.apply_player_event(&event).await;
            }
        })
    }
}
