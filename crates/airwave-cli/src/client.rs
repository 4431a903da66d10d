//! HTTP client side of the control protocol. Every CLI command that
//! touches the player is one request against the daemon, which is
//! auto-started on demand.

use std::time::Duration;

use serde_json::Value;

const QUIT_TIMEOUT: Duration = Duration::from_secs(2);

pub struct DaemonClient {
	http: reqwest::Client,
	base: String,
	port: u16,
}

impl DaemonClient {
	pub fn new(port: u16) -> Self {
		Self {
			http: reqwest::Client::new(),
			base: format!("http://127.0.0.1:{}", port),
			port,
		}
	}

	pub async fn is_up(&self) -> bool {
		beacon::is_running(self.port).await
	}

	/// Reuse a running daemon or spawn one detached and wait for it.
	/// Exits the invocation when the startup budget is exhausted; a
	/// late-starting daemon will be found by the next command.
	async fn ensure(&self) {
		if let Err(e) = beacon::ensure_daemon(self.port, &["server"]).await {
			eprintln!("error: {}", e);
			eprintln!("try running `airwave server` manually");
			std::process::exit(1);
		}
	}

	pub async fn get(&self, path: &str) -> Result<Value, reqwest::Error> {
		self.ensure().await;
		let resp = self.http.get(format!("{}{}", self.base, path)).send().await?;
		resp.json().await
	}

	pub async fn post(&self, path: &str, body: &Value) -> Result<Value, reqwest::Error> {
		self.ensure().await;
		let resp = self
			.http
			.post(format!("{}{}", self.base, path))
			.json(body)
			.send()
			.await?;
		resp.json().await
	}

	/// Ask the daemon to shut down. The daemon closes its socket while the
	/// response is in flight, so a connection error here is the expected
	/// success signal, not a failure.
	pub async fn quit(&self) {
		let client = reqwest::Client::builder().timeout(QUIT_TIMEOUT).build();
		if let Ok(client) = client {
			let _ = client.get(format!("{}/api/quit", self.base)).send().await;
		}
	}
}
