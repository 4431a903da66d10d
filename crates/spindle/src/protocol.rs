//! mpv JSON IPC message types.
//!
//! Reference: <https://mpv.io/manual/master/#json-ipc>

use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

static REQUEST_ID: AtomicI64 = AtomicI64::new(1);

fn next_request_id() -> i64 {
	REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// A single command in mpv's JSON IPC format.
#[derive(Debug, Clone, Serialize)]
pub struct MpvCommand {
	pub command: Vec<serde_json::Value>,
	pub request_id: i64,
}

impl MpvCommand {
	pub fn new(args: Vec<serde_json::Value>) -> Self {
		Self {
			command: args,
			request_id: next_request_id(),
		}
	}

	/// Load a URL, replacing whatever is currently playing.
	pub fn loadfile(url: &str) -> Self {
		Self::new(vec!["loadfile".into(), url.into()])
	}

	/// Stop playback and unload the current file.
	pub fn stop() -> Self {
		Self::new(vec!["stop".into()])
	}

	/// Toggle the pause property.
	pub fn cycle_pause() -> Self {
		Self::new(vec!["cycle".into(), "pause".into()])
	}

	/// Set volume (0-100).
	pub fn set_volume(volume: i64) -> Self {
		Self::new(vec!["set_property".into(), "volume".into(), volume.into()])
	}

	/// Read a property value.
	pub fn get_property(name: &str) -> Self {
		Self::new(vec!["get_property".into(), name.into()])
	}

	/// Quit the player process.
	pub fn quit() -> Self {
		Self::new(vec!["quit".into()])
	}
}

/// Response to a command.
#[derive(Debug, Clone, Deserialize)]
pub struct MpvResponse {
	/// "success" or an error string such as "property unavailable".
	pub error: String,
	#[serde(default)]
	pub data: Option<serde_json::Value>,
	pub request_id: i64,
}

impl MpvResponse {
	pub fn is_success(&self) -> bool {
		self.error == "success"
	}
}

/// Unsolicited event pushed by the player (property changes, end-file, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct MpvEvent {
	pub event: String,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub data: Option<serde_json::Value>,
	#[serde(default)]
	pub reason: Option<String>,
}

/// A line received from the IPC socket: either a response or an event.
#[derive(Debug, Clone)]
pub enum MpvMessage {
	Response(MpvResponse),
	Event(MpvEvent),
}

impl MpvMessage {
	/// Responses carry a `request_id`; everything else is an event.
	pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
		if line.contains("request_id") {
			let response: MpvResponse = serde_json::from_str(line)?;
			Ok(MpvMessage::Response(response))
		} else {
			let event: MpvEvent = serde_json::from_str(line)?;
			Ok(MpvMessage::Event(event))
		}
	}
}
