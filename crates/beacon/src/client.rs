use std::io;
use std::time::Duration;

use crate::paths::DaemonPaths;

const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Errors from daemon lifecycle operations.
#[derive(Debug)]
pub enum ClientError {
	/// Daemon did not become reachable within the startup budget.
	StartupTimeout,
	/// Failed to spawn the daemon process.
	Spawn(io::Error),
}

impl std::fmt::Display for ClientError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ClientError::StartupTimeout => write!(f, "daemon did not start in time"),
			ClientError::Spawn(e) => write!(f, "failed to spawn daemon: {}", e),
		}
	}
}

impl std::error::Error for ClientError {}

/// Check whether a daemon answers its status endpoint on the given port.
///
/// Any connection error, timeout, or non-2xx answer counts as "not running".
pub async fn is_running(port: u16) -> bool {
	let url = format!("http://127.0.0.1:{}/api/status", port);
	let client = match reqwest::Client::builder().timeout(PROBE_TIMEOUT).build() {
		Ok(c) => c,
		Err(_) => return false,
	};
	match client.get(&url).send().await {
		Ok(resp) => resp.status().is_success(),
		Err(_) => false,
	}
}

/// Read the PID of a running daemon from its PID file.
pub fn read_pid(paths: &DaemonPaths) -> Option<u32> {
	let pid_path = paths.pid_path();
	std::fs::read_to_string(pid_path)
		.ok()
		.and_then(|s| s.trim().parse().ok())
}
