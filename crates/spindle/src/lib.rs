//! # spindle
//!
//! Media-player process toolkit.
//!
//! Spawns one mpv process in persistent idle mode and drives it over its
//! JSON IPC socket. The process plays nothing until told to; commands are
//! queued through a single writer task and never raced against startup —
//! a handle only exists after the readiness handshake has completed.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use spindle::{Player, PlayerOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), spindle::PlayerError> {
//! let player = Player::spawn(PlayerOptions {
//!     binary: None,
//!     socket: "/tmp/myapp-mpv.sock".into(),
//!     extra_args: vec![],
//! })
//! .await?;
//!
//! player.load("https://example.com/stream.mp3").await?;
//! player.set_volume(80).await?;
//! # Ok(())
//! # }
//! ```

pub mod ipc;
pub mod process;
pub mod protocol;

pub use ipc::{Ipc, IpcError};
pub use protocol::{MpvCommand, MpvEvent, MpvMessage, MpvResponse};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

const READY_TIMEOUT: Duration = Duration::from_secs(5);
const READY_POLL: Duration = Duration::from_millis(100);

/// Default substituted when the pause property cannot be read
/// (typically: nothing loaded yet).
pub const DEFAULT_PAUSED: bool = false;
/// Default substituted when the volume property cannot be read.
pub const DEFAULT_VOLUME: i64 = 100;

/// Errors from spawning or driving the player process.
#[derive(Debug)]
pub enum PlayerError {
	/// No mpv executable found.
	NotFound,
	/// Failed to spawn the process.
	Spawn(std::io::Error),
	/// IPC transport failure.
	Ipc(IpcError),
	/// The IPC channel never became ready within the startup deadline.
	ReadyTimeout,
	/// The player rejected a command.
	CommandFailed(String),
}

impl std::fmt::Display for PlayerError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			PlayerError::NotFound => write!(f, "mpv executable not found"),
			PlayerError::Spawn(e) => write!(f, "failed to spawn player: {}", e),
			PlayerError::Ipc(e) => write!(f, "player ipc error: {}", e),
			PlayerError::ReadyTimeout => write!(f, "player ipc did not become ready in time"),
			PlayerError::CommandFailed(e) => write!(f, "player command failed: {}", e),
		}
	}
}

impl std::error::Error for PlayerError {}

impl From<IpcError> for PlayerError {
	fn from(e: IpcError) -> Self {
		PlayerError::Ipc(e)
	}
}

/// Options for spawning the player process.
pub struct PlayerOptions {
	/// Explicit mpv path; autodetected when `None`.
	pub binary: Option<PathBuf>,
	/// Where the IPC socket is created.
	pub socket: PathBuf,
	/// Extra arguments appended to the mpv command line.
	pub extra_args: Vec<String>,
}

/// Handle to one mpv process in idle mode.
///
/// Cheap to clone; all clones drive the same process through the same
/// serialized IPC connection.
#[derive(Clone)]
pub struct Player {
	ipc: Ipc,
	child: Arc<Mutex<Option<tokio::process::Child>>>,
	socket: PathBuf,
}

impl Player {
	/// Spawn the player and wait until its IPC channel accepts commands.
	///
	/// The handshake polls the socket with a no-op property query until it
	/// answers, bounded by a 5 s deadline. No command can be issued before
	/// the handshake completes, so nothing is ever dropped into a
	/// half-started process.
	pub async fn spawn(opts: PlayerOptions) -> Result<Self, PlayerError> {
		// Stale socket from a previous crash would shadow the new one.
		let _ = std::fs::remove_file(&opts.socket);

		let mut child = process::spawn_mpv(opts.binary.as_deref(), &opts.socket, &opts.extra_args)?;
		let ipc = match await_ready(&opts.socket).await {
			Ok(ipc) => ipc,
			Err(e) => {
				// Don't leak a half-started process behind a failed handshake.
				let _ = child.kill().await;
				let _ = std::fs::remove_file(&opts.socket);
				return Err(e);
			}
		};

		Ok(Self {
			ipc,
			child: Arc::new(Mutex::new(Some(child))),
			socket: opts.socket,
		})
	}

	/// Attach to an already-listening IPC socket, with the same readiness
	/// handshake. The process is not owned and will not be killed on
	/// [`terminate`](Self::terminate).
	pub async fn connect(socket: &Path) -> Result<Self, PlayerError> {
		let ipc = await_ready(socket).await?;
		Ok(Self {
			ipc,
			child: Arc::new(Mutex::new(None)),
			socket: socket.to_path_buf(),
		})
	}

	/// Load a stream URL, replacing whatever is currently playing.
	pub async fn load(&self, url: &str) -> Result<(), PlayerError> {
		self.expect_success(MpvCommand::loadfile(url)).await
	}

	/// Toggle pause.
	pub async fn toggle_pause(&self) -> Result<(), PlayerError> {
		self.expect_success(MpvCommand::cycle_pause()).await
	}

	/// Stop playback. The process stays alive in idle mode.
	pub async fn stop(&self) -> Result<(), PlayerError> {
		self.expect_success(MpvCommand::stop()).await
	}

	/// Set the output volume, clamped to 0-100. Returns the stored value.
	pub async fn set_volume(&self, volume: i64) -> Result<i64, PlayerError> {
		let clamped = volume.clamp(0, 100);
		self.expect_success(MpvCommand::set_volume(clamped)).await?;
		Ok(clamped)
	}

	/// Read a property. Fails with `CommandFailed` when the player reports
	/// it unavailable — use [`paused`](Self::paused) or
	/// [`volume_or`](Self::volume_or) for the defaulted reads.
	pub async fn get_property(&self, name: &str) -> Result<serde_json::Value, PlayerError> {
		let resp = self.ipc.send(MpvCommand::get_property(name)).await?;
		if resp.is_success() {
			Ok(resp.data.unwrap_or(serde_json::Value::Null))
		} else {
			Err(PlayerError::CommandFailed(resp.error))
		}
	}

	/// Current pause state; [`DEFAULT_PAUSED`] when the query fails.
	pub async fn paused(&self) -> bool {
		self.get_property("pause")
			.await
			.ok()
			.and_then(|v| v.as_bool())
			.unwrap_or(DEFAULT_PAUSED)
	}

	/// Current volume; `fallback` when the query fails.
	pub async fn volume_or(&self, fallback: i64) -> i64 {
		self.get_property("volume")
			.await
			.ok()
			.and_then(|v| v.as_f64())
			.map(|v| v.round() as i64)
			.unwrap_or(fallback)
	}

	/// Ask the process to quit, then make sure it is gone and the socket
	/// file is removed. Safe to call when the process already died.
	pub async fn terminate(&self) {
		let _ = self.ipc.send(MpvCommand::quit()).await;

		let mut child = self.child.lock().await;
		if let Some(mut c) = child.take() {
			let _ = c.kill().await;
		}

		let _ = std::fs::remove_file(&self.socket);
	}

	async fn expect_success(&self, cmd: MpvCommand) -> Result<(), PlayerError> {
		let resp = self.ipc.send(cmd).await?;
		if resp.is_success() {
			Ok(())
		} else {
			Err(PlayerError::CommandFailed(resp.error))
		}
	}
}

async fn await_ready(socket: &Path) -> Result<Ipc, PlayerError> {
	let deadline = tokio::time::Instant::now() + READY_TIMEOUT;

	loop {
		if let Ok(ipc) = Ipc::connect(socket).await {
			if ipc.send(MpvCommand::get_property("mpv-version")).await.is_ok() {
				return Ok(ipc);
			}
		}
		if tokio::time::Instant::now() >= deadline {
			return Err(PlayerError::ReadyTimeout);
		}
		tokio::time::sleep(READY_POLL).await;
	}
}
