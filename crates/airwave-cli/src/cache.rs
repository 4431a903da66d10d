//! CLI-side caches: the last search result list and the last played
//! station. Writes are best-effort — a failed write never breaks the
//! command that triggered it.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::radio::Station;

fn state_dir() -> PathBuf {
	beacon::DaemonPaths::new(crate::APP_NAME).state_dir()
}

fn last_search_path() -> PathBuf {
	state_dir().join("last-search.json")
}

fn last_played_path() -> PathBuf {
	state_dir().join("last-played.json")
}

pub fn save_last_search(stations: &[Station]) {
	write_json(&last_search_path(), &stations);
}

pub fn load_last_search() -> Vec<Station> {
	read_json(&last_search_path()).unwrap_or_default()
}

pub fn save_last_played(station: &Station) {
	write_json(&last_played_path(), station);
}

pub fn load_last_played() -> Option<Station> {
	read_json(&last_played_path())
}

fn write_json<T: Serialize>(path: &Path, value: &T) {
	if let Some(parent) = path.parent() {
		let _ = std::fs::create_dir_all(parent);
	}
	match serde_json::to_vec_pretty(value) {
		Ok(data) => {
			let _ = std::fs::write(path, data);
		}
		Err(e) => tracing::warn!("failed to encode {}: {}", path.display(), e),
	}
}

/// Missing or corrupt files read as `None`.
fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
	let content = std::fs::read_to_string(path).ok()?;
	serde_json::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicU32, Ordering};

	static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

	fn temp_file(name: &str) -> PathBuf {
		let n = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
		std::env::temp_dir().join(format!("awc-{}-{}.json", n, name))
	}

	fn station(uuid: &str) -> Station {
		Station {
			name: format!("Station {}", uuid),
			url_resolved: format!("http://radio.example/{}", uuid),
			stationuuid: uuid.to_string(),
			country: "UK".into(),
			codec: "MP3".into(),
			bitrate: 128,
			tags: String::new(),
		}
	}

	#[test]
	fn json_roundtrip() {
		let path = temp_file("roundtrip");
		write_json(&path, &vec![station("a"), station("b")]);
		let back: Vec<Station> = read_json(&path).unwrap();
		assert_eq!(back.len(), 2);
		assert_eq!(back[1].stationuuid, "b");
		let _ = std::fs::remove_file(&path);
	}

	#[test]
	fn read_missing_is_none() {
		let path = temp_file("missing");
		assert!(read_json::<Vec<Station>>(&path).is_none());
	}

	#[test]
	fn read_corrupt_is_none() {
		let path = temp_file("corrupt");
		std::fs::write(&path, "{not json").unwrap();
		assert!(read_json::<Vec<Station>>(&path).is_none());
		let _ = std::fs::remove_file(&path);
	}

	#[test]
	fn write_creates_parent_dirs() {
		let n = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
		let dir = std::env::temp_dir().join(format!("awc-dir-{}", n));
		let path = dir.join("nested").join("cache.json");
		write_json(&path, &station("x"));
		let back: Station = read_json(&path).unwrap();
		assert_eq!(back.stationuuid, "x");
		let _ = std::fs::remove_dir_all(&dir);
	}
}
