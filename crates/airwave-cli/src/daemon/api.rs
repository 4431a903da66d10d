//! HTTP control protocol: the endpoint set that maps client requests onto
//! the playback session.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, RwLock};
use tower_http::cors::CorsLayer;

use crate::config::SearchConfig;
use crate::daemon::player::{PlayerStatus, RadioPlayer};
use crate::radio::{self, Station};

#[derive(RustEmbed)]
#[folder = "../../ui/"]
struct UiAssets;

#[derive(Clone)]
pub struct AppState {
	pub player: Arc<RadioPlayer>,
	/// Most recent search results, indexable by the web client. One cache
	/// process-wide: a second search silently invalidates indices handed
	/// out by the first. Known limitation, not repaired.
	pub search_cache: Arc<RwLock<Vec<Station>>>,
	pub http: reqwest::Client,
	pub search: SearchConfig,
	pub shutdown: mpsc::Sender<()>,
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/api/search", get(search))
		.route("/api/play", get(play_by_index).post(play_station))
		.route("/api/pause", get(pause))
		.route("/api/stop", get(stop))
		.route("/api/vol", get(volume))
		.route("/api/status", get(status))
		.route("/api/quit", get(quit))
		.fallback(static_handler)
		.layer(CorsLayer::permissive())
		.with_state(state)
}

#[derive(Serialize)]
struct ErrorResponse {
	error: String,
}

type ApiFailure = (StatusCode, Json<ErrorResponse>);

fn bad_request(msg: &str) -> ApiFailure {
	(
		StatusCode::BAD_REQUEST,
		Json(ErrorResponse {
			error: msg.to_string(),
		}),
	)
}

fn player_failure(e: spindle::PlayerError) -> ApiFailure {
	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(ErrorResponse {
			error: format!("player error: {}", e),
		}),
	)
}

// --- Search ---

#[derive(Deserialize)]
struct SearchParams {
	#[serde(default)]
	q: String,
	limit: Option<u32>,
	country: Option<String>,
	tag: Option<String>,
}

async fn search(
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Station>>, ApiFailure> {
	let query = radio::SearchQuery {
		name: params.q,
		country: params.country,
		tag: params.tag,
		limit: params.limit.unwrap_or(state.search.limit),
	};

	match radio::search_stations(&state.http, &state.search.server, &query).await {
		Ok(stations) => {
			*state.search_cache.write().await = stations.clone();
			Ok(Json(stations))
		}
		Err(e) => Err((
			StatusCode::BAD_GATEWAY,
			Json(ErrorResponse {
				error: format!("search failed: {}", e),
			}),
		)),
	}
}

// --- Play ---

#[derive(Serialize)]
struct PlayByIndexResponse {
	ok: bool,
	station: Station,
}

/// Play from the server-held search cache. The web client keeps no state
/// of its own and can only reference stations by position.
async fn play_by_index(
	State(state): State<AppState>,
	Query(params): Query<HashMap<String, String>>,
) -> Result<Json<PlayByIndexResponse>, ApiFailure> {
	let index = match params.get("i") {
		None => 0,
		Some(v) => match v.parse::<usize>() {
			Ok(n) => n,
			Err(_) => return Err(bad_request("Invalid index - run a search first")),
		},
	};

	let station = { state.search_cache.read().await.get(index).cloned() };
	let Some(station) = station else {
		return Err(bad_request("Invalid index - run a search first"));
	};

	spawn_click(&state, station.stationuuid.clone());

	state
		.player
		.play(&station.stationuuid, &station.url_resolved, Some(&station.name))
		.await
		.map_err(player_failure)?;

	Ok(Json(PlayByIndexResponse { ok: true, station }))
}

#[derive(Deserialize)]
struct PlayBody {
	uuid: Option<String>,
	url: Option<String>,
	name: Option<String>,
}

#[derive(Serialize)]
struct PlayResponse {
	ok: bool,
	name: Option<String>,
}

/// Play a station supplied in full by the caller. The CLI keeps its own
/// on-disk search cache and sends the whole record, so this path never
/// depends on server-side search state.
async fn play_station(
	State(state): State<AppState>,
	body: Result<Json<PlayBody>, JsonRejection>,
) -> Result<Json<PlayResponse>, ApiFailure> {
	let Ok(Json(body)) = body else {
		return Err(bad_request("Invalid JSON body"));
	};
	let Some(url) = body.url.as_ref().filter(|u| !u.is_empty()) else {
		return Err(bad_request("Missing 'url' in body"));
	};

	let uuid = body.uuid.clone().unwrap_or_else(|| "unknown".to_string());
	if body.uuid.is_some() {
		spawn_click(&state, uuid.clone());
	}

	state
		.player
		.play(&uuid, url, body.name.as_deref())
		.await
		.map_err(player_failure)?;

	Ok(Json(PlayResponse {
		ok: true,
		name: body.name,
	}))
}

/// Advisory click accounting; playback never waits on it and a failure is
/// only logged.
fn spawn_click(state: &AppState, uuid: String) {
	let http = state.http.clone();
	let server = state.search.server.clone();
	tokio::spawn(async move {
		if let Err(e) = radio::click_station(&http, &server, &uuid).await {
			tracing::debug!("click accounting failed for {}: {}", uuid, e);
		}
	});
}

// --- Transport controls ---

#[derive(Serialize)]
struct OkResponse {
	ok: bool,
}

async fn pause(State(state): State<AppState>) -> Result<Json<OkResponse>, ApiFailure> {
	state.player.toggle_pause().await.map_err(player_failure)?;
	Ok(Json(OkResponse { ok: true }))
}

async fn stop(State(state): State<AppState>) -> Result<Json<OkResponse>, ApiFailure> {
	state.player.stop().await.map_err(player_failure)?;
	Ok(Json(OkResponse { ok: true }))
}

#[derive(Serialize)]
struct VolumeResponse {
	ok: bool,
	volume: i64,
}

async fn volume(
	State(state): State<AppState>,
	Query(params): Query<HashMap<String, String>>,
) -> Result<Json<VolumeResponse>, ApiFailure> {
	let requested = params.get("v").and_then(|v| v.parse::<i64>().ok());
	let Some(requested) = requested.filter(|v| (0..=100).contains(v)) else {
		return Err(bad_request("Volume must be 0-100"));
	};

	let stored = state
		.player
		.set_volume(requested)
		.await
		.map_err(player_failure)?;

	Ok(Json(VolumeResponse {
		ok: true,
		volume: stored,
	}))
}

async fn status(State(state): State<AppState>) -> Json<PlayerStatus> {
	Json(state.player.status().await)
}

// --- Shutdown ---

#[derive(Serialize)]
struct QuitResponse {
	ok: bool,
	message: String,
}

async fn quit(State(state): State<AppState>) -> Json<QuitResponse> {
	let shutdown = state.shutdown.clone();
	// Let the response flush before teardown starts; callers still must
	// tolerate the connection dropping.
	tokio::spawn(async move {
		tokio::time::sleep(Duration::from_millis(100)).await;
		let _ = shutdown.send(()).await;
	});

	Json(QuitResponse {
		ok: true,
		message: "Shutting down".to_string(),
	})
}

// --- Static UI ---

async fn static_handler(uri: Uri) -> impl IntoResponse {
	let path = uri.path().trim_start_matches('/');
	let path = if path.is_empty() { "index.html" } else { path };

	if let Some(content) = UiAssets::get(path) {
		return serve_asset(path, content);
	}

	Response::builder()
		.status(StatusCode::NOT_FOUND)
		.body("Not Found".into())
		.unwrap()
}

fn serve_asset(path: &str, content: rust_embed::EmbeddedFile) -> Response {
	let mime = mime_guess::from_path(path).first_or_octet_stream();

	Response::builder()
		.status(StatusCode::OK)
		.header(header::CONTENT_TYPE, mime.as_ref())
		.body(content.data.into())
		.unwrap()
}
