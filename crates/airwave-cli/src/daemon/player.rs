//! The daemon's single playback session over the external player process.

use serde::Serialize;
use tokio::sync::RwLock;

use spindle::{Player, PlayerError};

/// Snapshot returned by `/api/status`.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerStatus {
	pub uuid: Option<String>,
	pub paused: bool,
	pub volume: i64,
	pub title: Option<String>,
}

#[derive(Debug)]
struct Session {
	uuid: Option<String>,
	title: Option<String>,
	/// Last commanded volume; the fallback when a live read fails.
	volume: i64,
}

/// Exactly one playback session exists system-wide: the identity of what
/// is loaded plus the handle driving the player process. Every HTTP
/// handler observes and mutates this same instance; there is no
/// per-client session.
pub struct RadioPlayer {
	player: Player,
	session: RwLock<Session>,
}

impl RadioPlayer {
	pub fn new(player: Player) -> Self {
		Self {
			player,
			session: RwLock::new(Session {
				uuid: None,
				title: None,
				volume: spindle::DEFAULT_VOLUME,
			}),
		}
	}

	/// Load a station. Valid from any state: playing over a live session
	/// abandons the old identity without an explicit stop. When two plays
	/// interleave, the last load to finish owns the session identity —
	/// accepted behavior for a single-operator tool.
	pub async fn play(&self, uuid: &str, url: &str, title: Option<&str>) -> Result<(), PlayerError> {
		self.player.load(url).await?;
		let mut session = self.session.write().await;
		session.uuid = Some(uuid.to_string());
		session.title = title.map(|t| t.to_string());
		Ok(())
	}

	pub async fn toggle_pause(&self) -> Result<(), PlayerError> {
		self.player.toggle_pause().await
	}

	/// Stop playback and clear the session identity. The player process
	/// stays up in idle mode.
	pub async fn stop(&self) -> Result<(), PlayerError> {
		self.player.stop().await?;
		let mut session = self.session.write().await;
		session.uuid = None;
		session.title = None;
		Ok(())
	}

	/// Volume is orthogonal to the play/pause/stop machine — valid in
	/// every state. The adapter clamps; the stored value is returned.
	pub async fn set_volume(&self, volume: i64) -> Result<i64, PlayerError> {
		let stored = self.player.set_volume(volume).await?;
		self.session.write().await.volume = stored;
		Ok(stored)
	}

	/// Pure read; never fails and never transitions state. Pause and
	/// volume come from the live process, with defaults substituted when
	/// it reports nothing loaded.
	pub async fn status(&self) -> PlayerStatus {
		let (uuid, title, last_volume) = {
			let session = self.session.read().await;
			(session.uuid.clone(), session.title.clone(), session.volume)
		};
		PlayerStatus {
			uuid,
			title,
			paused: self.player.paused().await,
			volume: self.player.volume_or(last_volume).await,
		}
	}

	/// Terminate the player process.
	pub async fn shutdown(&self) {
		self.player.terminate().await;
	}
}
