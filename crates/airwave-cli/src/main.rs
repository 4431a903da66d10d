mod cache;
mod client;
mod config;
mod daemon;
mod favorites;
mod output;
mod playlist;
mod radio;

use owo_colors::OwoColorize;

use crate::client::DaemonClient;
use crate::radio::Station;

pub const APP_NAME: &str = "airwave";

#[tokio::main]
async fn main() {
	let args: Vec<String> = std::env::args().skip(1).collect();

	if args.is_empty() {
		print_usage();
		return;
	}

	match args[0].as_str() {
		"help" | "--help" | "-h" => print_usage(),
		"version" | "--version" | "-V" => println!("airwave {}", env!("CARGO_PKG_VERSION")),
		"search" => cmd_search(&args[1..]).await,
		"play" => cmd_play(&args[1..]).await,
		"pause" => cmd_pause().await,
		"stop" => cmd_stop().await,
		"vol" => cmd_vol(&args[1..]).await,
		"status" => cmd_status().await,
		"quit" => cmd_quit().await,
		"server" => daemon::run(&args[1..]).await,
		"fav" => cmd_fav(&args[1..]).await,
		"playlist" => cmd_playlist(&args[1..]).await,
		name => {
			eprintln!("unknown command: {}", name);
			eprintln!("run 'airwave help' for usage");
			std::process::exit(1);
		}
	}
}

fn print_usage() {
	eprintln!("{} {} — internet radio in your terminal", "airwave".bold(), env!("CARGO_PKG_VERSION"));
	eprintln!();
	eprintln!("usage: {} <command> [options]", "airwave".bold());
	eprintln!();

	eprintln!("{}", "stations".cyan().bold());
	eprintln!("  {} <term> [-c country] [-t tag] [-l limit]", "search".bold());
	eprintln!("  {} [num]                 Play result <num>, or replay the last station", "play".bold());
	eprintln!();

	eprintln!("{}", "playback".cyan().bold());
	eprintln!("  {}                      Toggle pause", "pause".bold());
	eprintln!("  {}                       Stop playback", "stop".bold());
	eprintln!("  {} <0-100>                Set volume", "vol".bold());
	eprintln!("  {}                     Show what is playing", "status".bold());
	eprintln!();

	eprintln!("{}", "collections".cyan().bold());
	eprintln!("  {} [list|add <num>|rm <num>|play <num>]", "fav".bold());
	eprintln!("  {} [list|add <name> <num>|rm <name> <num>|del <name>|play <name> [num]]", "playlist".bold());
	eprintln!();

	eprintln!("{}", "system".cyan().bold());
	eprintln!("  {} [-p port]            Run the daemon in the foreground", "server".bold());
	eprintln!("  {}                       Shut down the daemon and the player", "quit".bold());
	eprintln!();
	eprintln!("The daemon starts itself in the background on the first playback");
	eprintln!("command; the web UI is served at http://localhost:4242/ while it runs.");
}

fn daemon_client() -> DaemonClient {
	let global_config = config::load_global_config();
	DaemonClient::new(config::control_port(&global_config))
}

/// Parse a 1-based index argument; exits the invocation on bad input.
fn parse_index(arg: Option<&String>) -> usize {
	match arg.and_then(|v| v.parse::<usize>().ok()) {
		Some(n) if n >= 1 => n - 1,
		_ => {
			eprintln!("Index must be a positive integer.");
			std::process::exit(1);
		}
	}
}

// --- search (no daemon needed — talks to Radio-Browser directly) ---

async fn cmd_search(args: &[String]) {
	let mut term_parts: Vec<String> = Vec::new();
	let mut country = None;
	let mut tag = None;
	let mut limit = None;

	let mut iter = args.iter();
	while let Some(arg) = iter.next() {
		match arg.as_str() {
			"-c" | "--country" => country = iter.next().cloned(),
			"-t" | "--tag" => tag = iter.next().cloned(),
			"-l" | "--limit" => limit = iter.next().and_then(|v| v.parse().ok()),
			other => term_parts.push(other.to_string()),
		}
	}

	if term_parts.is_empty() {
		eprintln!("usage: airwave search <term> [-c country] [-t tag] [-l limit]");
		std::process::exit(1);
	}

	let global_config = config::load_global_config();
	let query = radio::SearchQuery {
		name: term_parts.join(" "),
		country,
		tag,
		limit: limit.unwrap_or(global_config.search.limit),
	};

	let http = reqwest::Client::new();
	let stations = match radio::search_stations(&http, &global_config.search.server, &query).await {
		Ok(stations) => stations,
		Err(e) => {
			eprintln!("error: {}", e);
			std::process::exit(1);
		}
	};

	if stations.is_empty() {
		println!("No stations found.");
		return;
	}

	output::render_stations(&stations);
	cache::save_last_search(&stations);
	println!();
	println!(
		"{} result(s) cached. Use  {}  to listen.",
		stations.len(),
		"airwave play <num>".bold()
	);
}

// --- play ---

async fn cmd_play(args: &[String]) {
	let station = if args.first().is_some() {
		let index = parse_index(args.first());
		let stations = cache::load_last_search();
		if stations.is_empty() {
			eprintln!("No cached search - run `airwave search ...` first.");
			std::process::exit(1);
		}
		match stations.get(index) {
			Some(station) => station.clone(),
			None => {
				eprintln!(
					"No station at index {}. ({} results cached)",
					index + 1,
					stations.len()
				);
				std::process::exit(1);
			}
		}
	} else {
		match cache::load_last_played() {
			Some(station) => station,
			None => {
				eprintln!("No last played station. Use  airwave play <num>  after a search.");
				std::process::exit(1);
			}
		}
	};

	play_station(&station).await;
}

/// Send the full station record to the daemon and remember it on success.
async fn play_station(station: &Station) {
	let daemon = daemon_client();
	let body = serde_json::json!({
		"uuid": station.stationuuid,
		"url": station.url_resolved,
		"name": station.name,
	});

	match daemon.post("/api/play", &body).await {
		Ok(data) if data["ok"].as_bool().unwrap_or(false) => {
			cache::save_last_played(station);
			println!("Now playing: {}", station.name.bold());
		}
		Ok(data) => {
			eprintln!(
				"Failed to play: {}",
				data["error"].as_str().unwrap_or("unknown error")
			);
			std::process::exit(1);
		}
		Err(e) => {
			eprintln!("error: {}", e);
			std::process::exit(1);
		}
	}
}

// --- transport controls ---

async fn cmd_pause() {
	match daemon_client().get("/api/pause").await {
		Ok(_) => println!("Toggled pause"),
		Err(e) => {
			eprintln!("error: {}", e);
			std::process::exit(1);
		}
	}
}

async fn cmd_stop() {
	match daemon_client().get("/api/stop").await {
		Ok(_) => println!("Stopped"),
		Err(e) => {
			eprintln!("error: {}", e);
			std::process::exit(1);
		}
	}
}

async fn cmd_vol(args: &[String]) {
	let volume = args.first().and_then(|v| v.parse::<i64>().ok());
	let Some(volume) = volume.filter(|v| (0..=100).contains(v)) else {
		eprintln!("Volume must be 0-100");
		std::process::exit(1);
	};

	match daemon_client().get(&format!("/api/vol?v={}", volume)).await {
		Ok(_) => println!("Volume set to {}", volume),
		Err(e) => {
			eprintln!("error: {}", e);
			std::process::exit(1);
		}
	}
}

async fn cmd_status() {
	match daemon_client().get("/api/status").await {
		Ok(status) => output::render_status(&status),
		Err(e) => {
			eprintln!("error: {}", e);
			std::process::exit(1);
		}
	}
}

async fn cmd_quit() {
	let daemon = daemon_client();
	if !daemon.is_up().await {
		println!("Daemon is not running.");
		return;
	}
	daemon.quit().await;
	println!("Radio daemon stopped.");
}

// --- favorites ---

async fn cmd_fav(args: &[String]) {
	match args.first().map(|s| s.as_str()) {
		None | Some("list") => {
			let favs = favorites::load_favorites();
			if favs.is_empty() {
				println!("No favorites yet. Use  airwave fav add <num>  after a search.");
				return;
			}
			output::render_stations(&favs);
		}
		Some("add") => {
			let index = parse_index(args.get(1));
			let stations = cache::load_last_search();
			let Some(station) = stations.get(index) else {
				eprintln!("No station at index {} in the last search.", index + 1);
				std::process::exit(1);
			};
			if favorites::add_favorite(station) {
				println!("Added favorite: {}", station.name.bold());
			} else {
				println!("Already a favorite: {}", station.name);
			}
		}
		Some("rm") => {
			let index = parse_index(args.get(1));
			match favorites::remove_favorite_at(index) {
				Some(station) => println!("Removed favorite: {}", station.name),
				None => {
					eprintln!("No favorite at index {}.", index + 1);
					std::process::exit(1);
				}
			}
		}
		Some("play") => {
			let index = parse_index(args.get(1));
			let favs = favorites::load_favorites();
			let Some(station) = favs.get(index) else {
				eprintln!("No favorite at index {}.", index + 1);
				std::process::exit(1);
			};
			play_station(station).await;
		}
		Some(other) => {
			eprintln!("unknown fav command: {}", other);
			eprintln!("usage: airwave fav [list|add <num>|rm <num>|play <num>]");
			std::process::exit(1);
		}
	}
}

// --- playlists ---

async fn cmd_playlist(args: &[String]) {
	match args.first().map(|s| s.as_str()) {
		None | Some("list") => {
			let playlists = playlist::list_playlists();
			if playlists.is_empty() {
				println!("No playlists. Use  airwave playlist add <name> <num>  after a search.");
				return;
			}
			for (name, uuids) in &playlists {
				println!("{} ({} station(s))", name.bold(), uuids.len());
				for uuid in uuids {
					println!("  {}", uuid.dimmed());
				}
			}
		}
		Some("add") => {
			let Some(name) = args.get(1) else {
				eprintln!("usage: airwave playlist add <name> <num>");
				std::process::exit(1);
			};
			let index = parse_index(args.get(2));
			let stations = cache::load_last_search();
			let Some(station) = stations.get(index) else {
				eprintln!("No station at index {} in the last search.", index + 1);
				std::process::exit(1);
			};
			playlist::add_to_playlist(name, &station.stationuuid);
			println!("Added {} to {}", station.name.bold(), name);
		}
		Some("rm") => {
			let Some(name) = args.get(1) else {
				eprintln!("usage: airwave playlist rm <name> <num>");
				std::process::exit(1);
			};
			let index = parse_index(args.get(2));
			match playlist::remove_from_playlist(name, index) {
				Some(uuid) => println!("Removed {} from {}", uuid, name),
				None => {
					eprintln!("No entry {} in playlist {}.", index + 1, name);
					std::process::exit(1);
				}
			}
		}
		Some("del") => {
			let Some(name) = args.get(1) else {
				eprintln!("usage: airwave playlist del <name>");
				std::process::exit(1);
			};
			if playlist::delete_playlist(name) {
				println!("Deleted playlist {}", name);
			} else {
				eprintln!("No playlist named {}.", name);
				std::process::exit(1);
			}
		}
		Some("play") => {
			let Some(name) = args.get(1) else {
				eprintln!("usage: airwave playlist play <name> [num]");
				std::process::exit(1);
			};
			let index = match args.get(2) {
				Some(_) => parse_index(args.get(2)),
				None => 0,
			};
			let uuids = playlist::get_playlist(name);
			let Some(uuid) = uuids.get(index) else {
				eprintln!("No entry {} in playlist {}.", index + 1, name);
				std::process::exit(1);
			};

			// Playlists store uuids only; resolve the record first.
			let global_config = config::load_global_config();
			let http = reqwest::Client::new();
			let stations = match radio::stations_by_uuid(
				&http,
				&global_config.search.server,
				&[uuid.clone()],
			)
			.await
			{
				Ok(stations) => stations,
				Err(e) => {
					eprintln!("error: {}", e);
					std::process::exit(1);
				}
			};
			let Some(station) = stations.first() else {
				eprintln!("Station {} is no longer listed.", uuid);
				std::process::exit(1);
			};
			play_station(station).await;
		}
		Some(other) => {
			eprintln!("unknown playlist command: {}", other);
			eprintln!("usage: airwave playlist [list|add <name> <num>|rm <name> <num>|del <name>|play <name> [num]]");
			std::process::exit(1);
		}
	}
}
