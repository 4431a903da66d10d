use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tokio::sync::Mutex;

use spindle::{Player, PlayerError};

static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

fn temp_socket(name: &str) -> PathBuf {
	let n = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
	std::env::temp_dir().join(format!("spn-{}-{}.sock", n, name))
}

#[derive(Default)]
struct StubState {
	loaded: bool,
	paused: bool,
	volume: Option<f64>,
	commands: Vec<Value>,
}

type SharedStub = Arc<Mutex<StubState>>;

/// Speaks just enough of the mpv JSON IPC protocol for the adapter:
/// stateful volume and pause, "property unavailable" for reads before
/// anything is loaded.
fn start_stub(socket: &Path) -> SharedStub {
	let state: SharedStub = Arc::default();
	let listener = UnixListener::bind(socket).unwrap();
	let shared = Arc::clone(&state);

	tokio::spawn(async move {
		loop {
			let (stream, _) = match listener.accept().await {
				Ok(s) => s,
				Err(_) => break,
			};
			let shared = Arc::clone(&shared);
			tokio::spawn(async move {
				serve_stub(stream, shared).await;
			});
		}
	});

	state
}

async fn serve_stub(stream: tokio::net::UnixStream, state: SharedStub) {
	let (reader, mut writer) = stream.into_split();
	let mut lines = BufReader::new(reader).lines();

	while let Ok(Some(line)) = lines.next_line().await {
		let req: Value = match serde_json::from_str(&line) {
			Ok(v) => v,
			Err(_) => continue,
		};
		let id = req["request_id"].clone();
		let cmd = req["command"].as_array().cloned().unwrap_or_default();

		let mut st = state.lock().await;
		st.commands.push(req["command"].clone());

		let (error, data) = match cmd.first().and_then(|v| v.as_str()) {
			Some("get_property") => match cmd.get(1).and_then(|v| v.as_str()) {
				Some("mpv-version") => ("success", json!("mpv 0.0-stub")),
				Some("pause") if st.loaded => ("success", json!(st.paused)),
				Some("volume") if st.volume.is_some() => ("success", json!(st.volume.unwrap())),
				_ => ("property unavailable", Value::Null),
			},
			Some("set_property") if cmd.get(1).and_then(|v| v.as_str()) == Some("volume") => {
				st.volume = cmd.get(2).and_then(|v| v.as_f64());
				("success", Value::Null)
			}
			Some("loadfile") => {
				st.loaded = true;
				st.paused = false;
				("success", Value::Null)
			}
			Some("cycle") => {
				st.paused = !st.paused;
				("success", Value::Null)
			}
			Some("stop") => {
				st.loaded = false;
				st.paused = false;
				("success", Value::Null)
			}
			Some("quit") => ("success", Value::Null),
			_ => ("invalid parameter", Value::Null),
		};
		drop(st);

		let resp = json!({"error": error, "data": data, "request_id": id});
		let mut out = resp.to_string().into_bytes();
		out.push(b'\n');
		if writer.write_all(&out).await.is_err() {
			break;
		}
	}
}

// --- Readiness handshake ---

#[tokio::test]
async fn handshake_connects_to_live_socket() {
	let socket = temp_socket("handshake");
	let _stub = start_stub(&socket);

	let player = Player::connect(&socket).await.expect("handshake should succeed");
	let version = player.get_property("mpv-version").await.unwrap();
	assert_eq!(version, json!("mpv 0.0-stub"));

	let _ = std::fs::remove_file(&socket);
}

#[tokio::test]
async fn handshake_waits_for_late_socket() {
	let socket = temp_socket("late");
	let bind_at = socket.clone();
	tokio::spawn(async move {
		tokio::time::sleep(std::time::Duration::from_millis(300)).await;
		start_stub(&bind_at);
	});

	let player = Player::connect(&socket).await.expect("ready after late bind");
	assert!(!player.paused().await);

	let _ = std::fs::remove_file(&socket);
}

#[tokio::test]
async fn handshake_times_out_without_listener() {
	let socket = temp_socket("absent");
	match Player::connect(&socket).await {
		Err(PlayerError::ReadyTimeout) => {}
		Err(other) => panic!("expected ReadyTimeout, got {}", other),
		Ok(_) => panic!("expected ReadyTimeout, got a handle"),
	}
}

// --- Commands ---

#[tokio::test]
async fn load_and_pause_roundtrip() {
	let socket = temp_socket("load");
	let stub = start_stub(&socket);
	let player = Player::connect(&socket).await.unwrap();

	player.load("http://radio.example/jazz").await.unwrap();
	assert!(!player.paused().await);

	player.toggle_pause().await.unwrap();
	assert!(player.paused().await);
	player.toggle_pause().await.unwrap();
	assert!(!player.paused().await);

	let sent = stub.lock().await.commands.clone();
	assert!(sent
		.iter()
		.any(|c| c[0] == "loadfile" && c[1] == "http://radio.example/jazz"));

	let _ = std::fs::remove_file(&socket);
}

#[tokio::test]
async fn volume_clamped_at_adapter() {
	let socket = temp_socket("clamp");
	let stub = start_stub(&socket);
	let player = Player::connect(&socket).await.unwrap();

	assert_eq!(player.set_volume(150).await.unwrap(), 100);
	assert_eq!(player.volume_or(0).await, 100);

	assert_eq!(player.set_volume(-5).await.unwrap(), 0);
	assert_eq!(player.volume_or(100).await, 0);

	// The wire never saw an out-of-range value.
	let sent = stub.lock().await.commands.clone();
	let volumes: Vec<i64> = sent
		.iter()
		.filter(|c| c[0] == "set_property" && c[1] == "volume")
		.map(|c| c[2].as_f64().unwrap() as i64)
		.collect();
	assert_eq!(volumes, vec![100, 0]);

	let _ = std::fs::remove_file(&socket);
}

#[tokio::test]
async fn property_defaults_when_nothing_loaded() {
	let socket = temp_socket("defaults");
	let _stub = start_stub(&socket);
	let player = Player::connect(&socket).await.unwrap();

	assert!(!player.paused().await);
	assert_eq!(player.volume_or(100).await, 100);
	assert_eq!(player.volume_or(42).await, 42);

	let _ = std::fs::remove_file(&socket);
}

#[tokio::test]
async fn stop_returns_pause_to_default() {
	let socket = temp_socket("stop");
	let _stub = start_stub(&socket);
	let player = Player::connect(&socket).await.unwrap();

	player.load("http://radio.example/news").await.unwrap();
	player.toggle_pause().await.unwrap();
	assert!(player.paused().await);

	player.stop().await.unwrap();
	// Unloaded again: the property read fails and the default kicks in.
	assert!(!player.paused().await);

	let _ = std::fs::remove_file(&socket);
}

#[tokio::test]
async fn commands_reach_socket_in_order() {
	let socket = temp_socket("order");
	let stub = start_stub(&socket);
	let player = Player::connect(&socket).await.unwrap();

	player.load("http://radio.example/one").await.unwrap();
	player.set_volume(20).await.unwrap();
	player.stop().await.unwrap();

	let sent = stub.lock().await.commands.clone();
	let names: Vec<String> = sent
		.iter()
		.filter_map(|c| c[0].as_str().map(|s| s.to_string()))
		.filter(|n| n != "get_property")
		.collect();
	assert_eq!(names, vec!["loadfile", "set_property", "stop"]);

	let _ = std::fs::remove_file(&socket);
}

#[tokio::test]
async fn terminate_sends_quit_and_removes_socket() {
	let socket = temp_socket("terminate");
	let stub = start_stub(&socket);
	let player = Player::connect(&socket).await.unwrap();

	player.terminate().await;

	let sent = stub.lock().await.commands.clone();
	assert!(sent.iter().any(|c| c[0] == "quit"));
	assert!(!socket.exists());
}
