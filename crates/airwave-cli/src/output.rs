//! Terminal rendering for CLI commands.

use owo_colors::OwoColorize;
use serde_json::Value;

use crate::radio::Station;

/// Numbered station listing, 1-based to match `airwave play <num>`.
pub fn render_stations(stations: &[Station]) {
	for (i, station) in stations.iter().enumerate() {
		let num = format!("{:>3}", i + 1);
		let bitrate = if station.bitrate > 0 {
			format!("{}k", station.bitrate)
		} else {
			"?k".to_string()
		};
		println!(
			"{}) {}  [{}]  {}/{}",
			num.bold(),
			station.name,
			station.country.dimmed(),
			station.codec.to_lowercase(),
			bitrate
		);
	}
}

pub fn render_status(status: &Value) {
	match status.get("uuid").and_then(|v| v.as_str()) {
		None => println!("Nothing playing"),
		Some(uuid) => {
			let title = status["title"].as_str().unwrap_or(uuid);
			let paused = status["paused"].as_bool().unwrap_or(false);
			let volume = status["volume"].as_i64().unwrap_or(100);
			println!("{} {}", "station".cyan().bold(), title);
			println!("{} {}", "paused ".cyan().bold(), paused);
			println!("{} {}", "volume ".cyan().bold(), volume);
		}
	}
}
