//! Favorite stations, persisted as full records in
//! ~/.config/airwave/favorites.json so they stay playable without a
//! fresh search.

use std::path::{Path, PathBuf};

use crate::radio::Station;

fn favorites_path() -> PathBuf {
	beacon::DaemonPaths::new(crate::APP_NAME)
		.config_dir()
		.join("favorites.json")
}

pub fn load_favorites() -> Vec<Station> {
	load_from(&favorites_path())
}

/// Add a station. Returns false if it is already a favorite.
pub fn add_favorite(station: &Station) -> bool {
	add_at(&favorites_path(), station)
}

/// Remove by 0-based index. Returns the removed station.
pub fn remove_favorite_at(index: usize) -> Option<Station> {
	remove_at(&favorites_path(), index)
}

fn load_from(path: &Path) -> Vec<Station> {
	match std::fs::read_to_string(path) {
		Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
		Err(_) => Vec::new(),
	}
}

fn save_to(path: &Path, favorites: &[Station]) {
	if let Some(parent) = path.parent() {
		let _ = std::fs::create_dir_all(parent);
	}
	match serde_json::to_vec_pretty(&favorites) {
		Ok(data) => {
			let _ = std::fs::write(path, data);
		}
		Err(e) => tracing::warn!("failed to encode favorites: {}", e),
	}
}

fn add_at(path: &Path, station: &Station) -> bool {
	let mut favorites = load_from(path);
	if favorites
		.iter()
		.any(|f| f.stationuuid == station.stationuuid)
	{
		return false;
	}
	favorites.push(station.clone());
	save_to(path, &favorites);
	true
}

fn remove_at(path: &Path, index: usize) -> Option<Station> {
	let mut favorites = load_from(path);
	if index >= favorites.len() {
		return None;
	}
	let removed = favorites.remove(index);
	save_to(path, &favorites);
	Some(removed)
}
