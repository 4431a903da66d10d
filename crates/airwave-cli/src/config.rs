use serde::Deserialize;

/// Environment override for the control port. Clients and daemon read the
/// same variable, so both sides always agree.
pub const PORT_ENV: &str = "AIRWAVE_PORT";

// ── Global config (~/.config/airwave/config.toml) ───────────────────────────

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GlobalConfig {
	#[serde(default)]
	pub daemon: DaemonConfig,
	#[serde(default)]
	pub player: PlayerConfig,
	#[serde(default)]
	pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
	#[serde(default = "default_port")]
	pub port: u16,
}

impl Default for DaemonConfig {
	fn default() -> Self {
		Self { port: default_port() }
	}
}

fn default_port() -> u16 {
	4242
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PlayerConfig {
	/// Explicit mpv path; autodetected when absent.
	pub binary: Option<String>,
	#[serde(default)]
	pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
	#[serde(default = "default_limit")]
	pub limit: u32,
	#[serde(default = "default_server")]
	pub server: String,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			limit: default_limit(),
			server: default_server(),
		}
	}
}

fn default_limit() -> u32 {
	30
}

fn default_server() -> String {
	"https://de1.api.radio-browser.info".to_string()
}

pub fn load_global_config() -> GlobalConfig {
	let path = beacon::DaemonPaths::new(crate::APP_NAME)
		.config_dir()
		.join("config.toml");
	if path.exists() {
		match std::fs::read_to_string(&path) {
			Ok(content) => match toml::from_str(&content) {
				Ok(config) => return config,
				Err(e) => tracing::warn!("invalid config {}: {}", path.display(), e),
			},
			Err(e) => tracing::warn!("unreadable config {}: {}", path.display(), e),
		}
	}
	GlobalConfig::default()
}

/// Control port: env override first, then config file, then the default.
pub fn control_port(config: &GlobalConfig) -> u16 {
	if let Ok(v) = std::env::var(PORT_ENV) {
		if let Ok(port) = v.trim().parse() {
			return port;
		}
		tracing::warn!("ignoring invalid {}: {}", PORT_ENV, v);
	}
	config.daemon.port
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_without_config() {
		let config = GlobalConfig::default();
		assert_eq!(config.daemon.port, 4242);
		assert_eq!(config.search.limit, 30);
		assert!(config.search.server.contains("radio-browser.info"));
		assert!(config.player.binary.is_none());
	}

	#[test]
	fn partial_toml_fills_defaults() {
		let config: GlobalConfig = toml::from_str("[daemon]\nport = 9000\n").unwrap();
		assert_eq!(config.daemon.port, 9000);
		assert_eq!(config.search.limit, 30);
	}

	#[test]
	fn player_section_parses() {
		let config: GlobalConfig = toml::from_str(
			"[player]\nbinary = \"/opt/mpv\"\nextra_args = [\"--cache=yes\"]\n",
		)
		.unwrap();
		assert_eq!(config.player.binary.as_deref(), Some("/opt/mpv"));
		assert_eq!(config.player.extra_args, vec!["--cache=yes".to_string()]);
	}

	#[test]
	fn port_resolution_order() {
		let mut config = GlobalConfig::default();
		config.daemon.port = 5000;

		// No env: the file value wins over the built-in default.
		std::env::remove_var(PORT_ENV);
		assert_eq!(control_port(&config), 5000);

		// Env wins over the file.
		std::env::set_var(PORT_ENV, "6000");
		assert_eq!(control_port(&config), 6000);

		// Garbage env falls back to the file.
		std::env::set_var(PORT_ENV, "not-a-port");
		assert_eq!(control_port(&config), 5000);

		std::env::remove_var(PORT_ENV);
	}
}
