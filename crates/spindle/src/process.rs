//! Player process detection and spawning.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::PlayerError;

/// Locate the mpv executable: PATH first, then common install locations.
pub fn find_mpv() -> Option<PathBuf> {
	if let Ok(path) = which::which("mpv") {
		return Some(path);
	}

	let common = [
		"/usr/bin/mpv",
		"/usr/local/bin/mpv",
		"/opt/homebrew/bin/mpv",
	];
	common.iter().map(PathBuf::from).find(|p| p.exists())
}

/// Spawn mpv in idle mode with its JSON IPC server on `socket`.
///
/// Idle mode keeps the process alive with nothing loaded; playback starts
/// only on an explicit `loadfile`. Audio only, no terminal.
pub fn spawn_mpv(
	binary: Option<&Path>,
	socket: &Path,
	extra_args: &[String],
) -> Result<tokio::process::Child, PlayerError> {
	let exe = match binary {
		Some(b) => b.to_path_buf(),
		None => find_mpv().ok_or(PlayerError::NotFound)?,
	};

	tracing::info!("spawning player: {} (ipc {})", exe.display(), socket.display());

	let mut cmd = tokio::process::Command::new(&exe);
	cmd.arg(format!("--input-ipc-server={}", socket.display()))
		.arg("--idle=yes")
		.arg("--no-video")
		.arg("--no-terminal");

	for arg in extra_args {
		cmd.arg(arg);
	}

	cmd.stdin(Stdio::null())
		.stdout(Stdio::null())
		.stderr(Stdio::null())
		.spawn()
		.map_err(PlayerError::Spawn)
}
