//! Playback through an external command-line player
//!
//! Each track runs as a child process with the audio URL as its last
//! argument. Pause and resume stop and continue the process with signals.

use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::error::AppError;
use crate::model::{PlayerEvent, Track};
use super::Player;

struct Running {
    generation: u64,
    track_id: String,
    pid: Option<u32>,
    paused: bool,
    kill: oneshot::Sender<()>,
}

#[derive(Clone, Copy, Debug)]
enum Signal {
    Stop,
    Continue,
}

pub struct ProcessPlayer {
    command: String,
    args: Vec<String>,
    events: mpsc::UnboundedSender<PlayerEvent>,
    current: Arc<Mutex<Option<Running>>>,
    generation: Mutex<u64>,
}

impl ProcessPlayer {
    pub fn new(
        command: impl Into<String>,
        args: Vec<String>,
    ) -> (Self, mpsc::UnboundedReceiver<PlayerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let player = Self {
            command: command.into(),
            args,
            events: tx,
            current: Arc::new(Mutex::new(None)),
            generation: Mutex::new(0),
        };
        (player, rx)
    }

    async fn next_generation(&self) -> u64 {
        let mut generation = self.generation.lock().await;
        *generation += 1;
        *generation
    }

    async fn signal_current(&self, signal: Signal) -> Result<(), AppError> {
        let mut current = self.current.lock().await;
        let Some(running) = current.as_mut() else {
            tracing::debug!(?signal, "No track running");
            return Ok(());
        };

        let want_paused = matches!(signal, Signal::Stop);
        if running.paused == want_paused {
            return Ok(());
        }

        let pid = running
            .pid
            .ok_or_else(|| AppError::playback("player process has already exited"))?;
        send_signal(pid, signal)?;
        running.paused = want_paused;

        let track_id = running.track_id.clone();
        let event = if want_paused {
            PlayerEvent::Paused { track_id }
        } else {
            PlayerEvent::Resumed { track_id }
        };
        let _ = self.events.send(event);
        Ok(())
    }
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: Signal) -> Result<(), AppError> {
    let sig = match signal {
        Signal::Stop => libc::SIGSTOP,
        Signal::Continue => libc::SIGCONT,
    };
    // SAFETY: kill(2) has no memory-safety preconditions
    let rc = unsafe { libc::kill(pid as libc::pid_t, sig) };
    if rc == 0 {
        Ok(())
    } else {
        Err(AppError::playback(std::io::Error::last_os_error()))
    }
}

#[cfg(not(unix))]
fn send_signal(_pid: u32, signal: Signal) -> Result<(), AppError> {
    tracing::warn!(?signal, "Process signals are unavailable on this platform");
    Err(AppError::playback("pause and resume need a unix platform"))
}

#[async_trait]
impl Player for ProcessPlayer {
    async fn play(&self, track: &Track) -> Result<(), AppError> {
        self.stop().await?;

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .arg(&track.audio_url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(AppError::playback)?;

        let generation = self.next_generation().await;
        let (kill_tx, kill_rx) = oneshot::channel();
        *self.current.lock().await = Some(Running {
            generation,
            track_id: track.id.clone(),
            pid: child.id(),
            paused: false,
            kill: kill_tx,
        });

        tracing::info!(track_id = %track.id, title = %track.title, pid = ?child.id(), "Playback started");
        let _ = self.events.send(PlayerEvent::Started {
            track_id: track.id.clone(),
        });

        let current = Arc::clone(&self.current);
        let events = self.events.clone();
        let track_id = track.id.clone();
        tokio::spawn(async move {
            tokio::select! {
                status = child.wait() => {
                    tracing::debug!(track_id = %track_id, ?status, "Player process exited");
                }
                _ = kill_rx => {
                    if let Err(e) = child.kill().await {
                        tracing::warn!(track_id = %track_id, error = %e, "Failed to kill player process");
                    }
                }
            }

            {
                let mut current = current.lock().await;
                if current.as_ref().is_some_and(|r| r.generation == generation) {
                    *current = None;
                }
            }
            let _ = events.send(PlayerEvent::Ended { track_id });
        });

        Ok(())
    }

    async fn pause(&self) -> Result<(), AppError> {
        self.signal_current(Signal::Stop).await
    }

    async fn resume(&self) -> Result<(), AppError> {
        self.signal_current(Signal::Continue).await
    }

    async fn stop(&self) -> Result<(), AppError> {
        if let Some(running) = self.current.lock().await.take() {
            tracing::debug!(track_id = %running.track_id, "Stopping playback");
            let _ = running.kill.send(());
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    fn track(id: &str, audio_url: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Track {id}"),
            subtitle: String::new(),
            audio_url: audio_url.to_string(),
            duration_secs: None,
            artwork_url: None,
        }
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<PlayerEvent>) -> PlayerEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("player event timed out")
            .expect("player channel closed")
    }

    #[tokio::test]
    async fn short_process_reports_start_and_end() {
        let (player, mut rx) = ProcessPlayer::new("sleep", vec![]);
        player.play(&track("a", "0")).await.unwrap();

        assert_eq!(next_event(&mut rx).await, PlayerEvent::Started { track_id: "a".into() });
        assert_eq!(next_event(&mut rx).await, PlayerEvent::Ended { track_id: "a".into() });
    }

    #[tokio::test]
    async fn pause_and_resume_emit_events_once() {
        let (player, mut rx) = ProcessPlayer::new("sleep", vec![]);
        player.play(&track("a", "30")).await.unwrap();
        assert_eq!(next_event(&mut rx).await, PlayerEvent::Started { track_id: "a".into() });

        player.pause().await.unwrap();
        player.pause().await.unwrap();
        assert_eq!(next_event(&mut rx).await, PlayerEvent::Paused { track_id: "a".into() });

        player.resume().await.unwrap();
        assert_eq!(next_event(&mut rx).await, PlayerEvent::Resumed { track_id: "a".into() });

        player.stop().await.unwrap();
        assert_eq!(next_event(&mut rx).await, PlayerEvent::Ended { track_id: "a".into() });
    }

    #[tokio::test]
    async fn playing_another_track_ends_the_first() {
        let (player, mut rx) = ProcessPlayer::new("sleep", vec![]);
        player.play(&track("a", "30")).await.unwrap();
        player.play(&track("b", "30")).await.unwrap();

        let mut events = Vec::new();
        for _ in 0..3 {
            events.push(next_event(&mut rx).await);
        }
        assert_eq!(events[0], PlayerEvent::Started { track_id: "a".into() });
        assert!(events.contains(&PlayerEvent::Ended { track_id: "a".into() }));
        assert!(events.contains(&PlayerEvent::Started { track_id: "b".into() }));

        player.stop().await.unwrap();
    }

    #[tokio::test]
    async fn missing_command_is_a_playback_error() {
        let (player, _rx) = ProcessPlayer::new("definitely-not-a-player-binary", vec![]);
        let err = player.play(&track("a", "x")).await.unwrap_err();
        assert!(matches!(err, AppError::Playback(_)));
    }

    #[tokio::test]
    async fn pause_without_a_track_is_a_no_op() {
        let (player, mut rx) = ProcessPlayer::new("sleep", vec![]);
        player.pause().await.unwrap();
        assert!(rx.try_recv().is_err());
    }
}
