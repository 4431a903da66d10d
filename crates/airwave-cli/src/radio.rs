//! Radio-Browser API client.
//!
//! Two calls matter: station search and the advisory "click" that keeps the
//! public database's popularity stats honest. Both always send a
//! descriptive User-Agent, as the API guidelines ask.

use serde::{Deserialize, Serialize};

pub const USER_AGENT: &str = concat!("airwave/", env!("CARGO_PKG_VERSION"));

/// A playable station record as Radio-Browser returns it. The API sends
/// many more fields; unknown ones are ignored and sparse rows still parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub url_resolved: String,
	#[serde(default)]
	pub stationuuid: String,
	#[serde(default)]
	pub country: String,
	#[serde(default)]
	pub codec: String,
	#[serde(default)]
	pub bitrate: u32,
	#[serde(default)]
	pub tags: String,
}

/// Errors from the Radio-Browser API.
#[derive(Debug)]
pub enum ApiError {
	Http(reqwest::Error),
	Status(u16),
}

impl std::fmt::Display for ApiError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ApiError::Http(e) => write!(f, "radio api request failed: {}", e),
			ApiError::Status(code) => write!(f, "radio api returned status {}", code),
		}
	}
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
	fn from(e: reqwest::Error) -> Self {
		ApiError::Http(e)
	}
}

#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
	pub name: String,
	pub country: Option<String>,
	pub tag: Option<String>,
	pub limit: u32,
}

impl SearchQuery {
	/// Only non-empty parameters go on the wire.
	fn params(&self) -> Vec<(&'static str, String)> {
		let mut params = vec![
			("name", self.name.clone()),
			("limit", self.limit.to_string()),
		];
		if let Some(country) = self.country.as_ref().filter(|c| !c.is_empty()) {
			params.push(("country", country.clone()));
		}
		if let Some(tag) = self.tag.as_ref().filter(|t| !t.is_empty()) {
			params.push(("tag", tag.clone()));
		}
		params
	}
}

pub async fn search_stations(
	client: &reqwest::Client,
	server: &str,
	query: &SearchQuery,
) -> Result<Vec<Station>, ApiError> {
	let url = format!("{}/json/stations/search", server);
	let resp = client
		.get(&url)
		.query(&query.params())
		.header(reqwest::header::USER_AGENT, USER_AGENT)
		.header(reqwest::header::ACCEPT, "application/json")
		.send()
		.await?;

	if !resp.status().is_success() {
		return Err(ApiError::Status(resp.status().as_u16()));
	}
	Ok(resp.json().await?)
}

/// Resolve full station records from uuids (playlist entries store only
/// the uuid).
pub async fn stations_by_uuid(
	client: &reqwest::Client,
	server: &str,
	uuids: &[String],
) -> Result<Vec<Station>, ApiError> {
	let url = format!("{}/json/stations/byuuid", server);
	let resp = client
		.get(&url)
		.query(&[("uuids", uuids.join(","))])
		.header(reqwest::header::USER_AGENT, USER_AGENT)
		.header(reqwest::header::ACCEPT, "application/json")
		.send()
		.await?;

	if !resp.status().is_success() {
		return Err(ApiError::Status(resp.status().as_u16()));
	}
	Ok(resp.json().await?)
}

/// Record a click for a station. Advisory telemetry only — playback never
/// depends on this call succeeding.
pub async fn click_station(
	client: &reqwest::Client,
	server: &str,
	uuid: &str,
) -> Result<(), ApiError> {
	let url = format!("{}/json/url/{}", server, uuid);
	let resp = client
		.get(&url)
		.header(reqwest::header::USER_AGENT, USER_AGENT)
		.send()
		.await?;

	if !resp.status().is_success() {
		return Err(ApiError::Status(resp.status().as_u16()));
	}
	Ok(())
}
