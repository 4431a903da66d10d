use std::path::PathBuf;
use std::time::Duration;

use crate::client::{self, ClientError};
use crate::paths::DaemonPaths;

const STARTUP_ATTEMPTS: u32 = 30;
const STARTUP_POLL: Duration = Duration::from_millis(100);

/// Daemon-side handle for PID file bookkeeping.
pub struct Daemon {
	pub paths: DaemonPaths,
}

impl Daemon {
	pub fn new(app_name: impl Into<String>) -> Self {
		Self {
			paths: DaemonPaths::new(app_name),
		}
	}

	/// Record our PID. Best-effort: a failure is logged, never fatal.
	pub fn write_pid(&self) {
		let state_dir = self.paths.state_dir();
		if let Err(e) = std::fs::create_dir_all(&state_dir) {
			tracing::warn!("failed to create state dir {}: {}", state_dir.display(), e);
			return;
		}
		let pid_path = self.paths.pid_path();
		if let Err(e) = std::fs::write(&pid_path, std::process::id().to_string()) {
			tracing::warn!("failed to write pid file {}: {}", pid_path.display(), e);
		}
	}

	/// Remove the PID file. Best-effort.
	pub fn cleanup(&self) {
		let _ = std::fs::remove_file(self.paths.pid_path());
	}
}

/// Make sure a daemon is reachable on `port`.
///
/// If the status endpoint already answers, returns immediately — safe to
/// call before every client command. Otherwise spawns `current_exe()` with
/// `args` as a detached background process and polls until it answers or
/// the startup budget (30 × 100 ms) runs out. A daemon that comes up late
/// is left running and found by the next call.
pub async fn ensure_daemon(port: u16, args: &[&str]) -> Result<(), ClientError> {
	if client::is_running(port).await {
		return Ok(());
	}

	spawn_detached(args)?;

	for _ in 0..STARTUP_ATTEMPTS {
		tokio::time::sleep(STARTUP_POLL).await;
		if client::is_running(port).await {
			return Ok(());
		}
	}

	Err(ClientError::StartupTimeout)
}

fn spawn_detached(args: &[&str]) -> Result<(), ClientError> {
	let binary = find_current_binary();
	let mut cmd = std::process::Command::new(&binary);
	cmd.args(args)
		.stdin(std::process::Stdio::null())
		.stdout(std::process::Stdio::null())
		.stderr(std::process::Stdio::null());

	// Own process group: the daemon must outlive this invocation.
	#[cfg(unix)]
	{
		use std::os::unix::process::CommandExt;
		cmd.process_group(0);
	}

	cmd.spawn().map_err(ClientError::Spawn)?;
	Ok(())
}

fn find_current_binary() -> PathBuf {
	std::env::current_exe().unwrap_or_else(|_| PathBuf::from("airwave"))
}
