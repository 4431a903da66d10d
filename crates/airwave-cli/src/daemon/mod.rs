//! The radio daemon: owns the player process and serves the control
//! protocol until a termination signal or a quit request arrives.

pub mod api;
pub mod player;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

use crate::config;

pub async fn run(args: &[String]) {
	tracing_subscriber::fmt().init();

	let global_config = config::load_global_config();
	let port = parse_port_arg(args).unwrap_or_else(|| config::control_port(&global_config));

	let daemon = beacon::Daemon::new(crate::APP_NAME);
	let state_dir = daemon.paths.state_dir();
	let _ = std::fs::create_dir_all(&state_dir);

	// The player comes up first, in idle mode; the control protocol is
	// only reachable once commands can actually be issued.
	let player = match spindle::Player::spawn(spindle::PlayerOptions {
		binary: global_config.player.binary.as_ref().map(PathBuf::from),
		socket: state_dir.join("mpv.sock"),
		extra_args: global_config.player.extra_args.clone(),
	})
	.await
	{
		Ok(p) => p,
		Err(e) => {
			tracing::error!("failed to start player: {}", e);
			std::process::exit(1);
		}
	};

	let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
	let radio_player = Arc::new(player::RadioPlayer::new(player));

	let state = api::AppState {
		player: Arc::clone(&radio_player),
		search_cache: Arc::new(RwLock::new(Vec::new())),
		http: reqwest::Client::new(),
		search: global_config.search.clone(),
		shutdown: shutdown_tx,
	};

	let app = api::router(state);
	let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
	let listener = match tokio::net::TcpListener::bind(addr).await {
		Ok(l) => l,
		Err(e) => {
			tracing::error!("failed to bind {}: {}", addr, e);
			radio_player.shutdown().await;
			std::process::exit(1);
		}
	};

	// PID file only once the listener is up: reachable implies recorded.
	daemon.write_pid();
	tracing::info!("daemon listening on {} (pid {})", addr, std::process::id());

	let server = tokio::spawn(async move {
		if let Err(e) = axum::serve(listener, app).await {
			tracing::error!("http server error: {}", e);
		}
	});

	tokio::select! {
		_ = server => {},
		_ = shutdown_rx.recv() => {
			tracing::info!("quit requested");
		}
		_ = shutdown_signal() => {
			tracing::info!("shutting down");
		}
	}

	// Teardown order: player process first, then the PID file, even when
	// the player already died on its own.
	radio_player.shutdown().await;
	daemon.cleanup();
}

async fn shutdown_signal() {
	#[cfg(unix)]
	{
		use tokio::signal::unix::{signal, SignalKind};
		match signal(SignalKind::terminate()) {
			Ok(mut term) => {
				tokio::select! {
					_ = tokio::signal::ctrl_c() => {},
					_ = term.recv() => {},
				}
			}
			Err(_) => {
				let _ = tokio::signal::ctrl_c().await;
			}
		}
	}
	#[cfg(not(unix))]
	{
		let _ = tokio::signal::ctrl_c().await;
	}
}

fn parse_port_arg(args: &[String]) -> Option<u16> {
	let mut iter = args.iter();
	while let Some(arg) = iter.next() {
		if arg == "-p" || arg == "--port" {
			return iter.next().and_then(|v| v.parse().ok());
		}
	}
	None
}
