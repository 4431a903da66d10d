//! Named playlists, stored at ~/.config/airwave/playlists.json as a map
//! of playlist name to station uuids. Records are resolved back to full
//! stations through the Radio-Browser byuuid lookup when played.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub type Playlists = BTreeMap<String, Vec<String>>;

fn playlists_path() -> PathBuf {
	beacon::DaemonPaths::new(crate::APP_NAME)
		.config_dir()
		.join("playlists.json")
}

pub fn list_playlists() -> Playlists {
	load_from(&playlists_path())
}

pub fn get_playlist(name: &str) -> Vec<String> {
	load_from(&playlists_path()).remove(name).unwrap_or_default()
}

/// Append a uuid to a playlist, creating it on first use. Duplicates are
/// ignored.
pub fn add_to_playlist(name: &str, uuid: &str) {
	add_at(&playlists_path(), name, uuid);
}

/// Remove the entry at `index` (0-based). An emptied playlist disappears.
pub fn remove_from_playlist(name: &str, index: usize) -> Option<String> {
	remove_at(&playlists_path(), name, index)
}

/// Delete a whole playlist. Returns false if it did not exist.
pub fn delete_playlist(name: &str) -> bool {
	delete_at(&playlists_path(), name)
}

fn load_from(path: &Path) -> Playlists {
	match std::fs::read_to_string(path) {
		Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
		Err(_) => Playlists::new(),
	}
}

fn save_to(path: &Path, playlists: &Playlists) {
	if let Some(parent) = path.parent() {
		let _ = std::fs::create_dir_all(parent);
	}
	match serde_json::to_vec_pretty(playlists) {
		Ok(data) => {
			let _ = std::fs::write(path, data);
		}
		Err(e) => tracing::warn!("failed to encode playlists: {}", e),
	}
}

fn add_at(path: &Path, name: &str, uuid: &str) {
	let mut playlists = load_from(path);
	let entries = playlists.entry(name.to_string()).or_default();
	if !entries.iter().any(|u| u == uuid) {
		entries.push(uuid.to_string());
	}
	save_to(path, &playlists);
}

fn remove_at(path: &Path, name: &str, index: usize) -> Option<String> {
	let mut playlists = load_from(path);
	let entries = playlists.get_mut(name)?;
	if index >= entries.len() {
		return None;
	}
	let removed = entries.remove(index);
	if entries.is_empty() {
		playlists.remove(name);
	}
	save_to(path, &playlists);
	Some(removed)
}

fn delete_at(path: &Path, name: &str) -> bool {
	let mut playlists = load_from(path);
	let existed = playlists.remove(name).is_some();
	if existed {
		save_to(path, &playlists);
	}
	existed
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicU32, Ordering};

	static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

	fn temp_file(name: &str) -> PathBuf {
		let n = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
		std::env::temp_dir().join(format!("awp-{}-{}.json", n, name))
	}

	#[test]
	fn add_creates_and_dedupes() {
		let path = temp_file("add");
		add_at(&path, "morning", "uuid-1");
		add_at(&path, "morning", "uuid-2");
		add_at(&path, "morning", "uuid-1");

		let playlists = load_from(&path);
		assert_eq!(playlists["morning"], vec!["uuid-1", "uuid-2"]);
		let _ = std::fs::remove_file(&path);
	}

	#[test]
	fn remove_drops_empty_playlist() {
		let path = temp_file("rm");
		add_at(&path, "night", "uuid-1");

		assert_eq!(remove_at(&path, "night", 0).as_deref(), Some("uuid-1"));
		assert!(load_from(&path).get("night").is_none());

		assert!(remove_at(&path, "night", 0).is_none());
		assert!(remove_at(&path, "missing", 0).is_none());
		let _ = std::fs::remove_file(&path);
	}

	#[test]
	fn delete_whole_playlist() {
		let path = temp_file("del");
		add_at(&path, "a", "u1");
		add_at(&path, "b", "u2");

		assert!(delete_at(&path, "a"));
		assert!(!delete_at(&path, "a"));

		let playlists = load_from(&path);
		assert_eq!(playlists.len(), 1);
		assert!(playlists.contains_key("b"));
		let _ = std::fs::remove_file(&path);
	}

	#[test]
	fn corrupt_file_reads_empty() {
		let path = temp_file("corrupt");
		std::fs::write(&path, "nope").unwrap();
		assert!(load_from(&path).is_empty());
		let _ = std::fs::remove_file(&path);
	}
}
