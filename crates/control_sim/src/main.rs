use std::{net::SocketAddr, sync::Arc};

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use parking_lot::Mutex;
use shared::{
    domain::Command,
    error::ApiException,
    protocol::{CurrentTrackResponse, LyricsResponse},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod player;

use config::load_settings;
use player::Player;

struct AppState {
    player: Mutex<Player>,
}

type TextError = (StatusCode, String);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings()?;
    let player = Player::new(settings.playlist, settings.volume, settings.active_device)
        .with_playing(settings.playing);
    let app = build_router(Arc::new(AppState {
        player: Mutex::new(player),
    }));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, "control simulator listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let mut router: Router<Arc<AppState>> = Router::new()
        .route("/healthz", get(healthz))
        .route("/current-track", get(current_track))
        .route("/lyrics", get(lyrics));
    for command in Command::ALL {
        router = router.route(
            &command.path(),
            get(move |State(state): State<Arc<AppState>>| async move {
                run_command(&state, command)
            }),
        );
    }
    router.with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

fn reject(error: ApiException) -> TextError {
    let status = StatusCode::from_u16(error.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, error.message)
}

fn run_command(state: &AppState, command: Command) -> Result<String, TextError> {
    let mut player = state.player.lock();
    match player.apply(command) {
        Ok(reply) => {
            info!(
                %command,
                playing = player.is_playing(),
                volume = player.volume(),
                "command applied"
            );
            Ok(reply)
        }
        Err(error) => {
            warn!(%command, %error, "command rejected");
            Err(reject(error))
        }
    }
}

async fn current_track(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CurrentTrackResponse>, TextError> {
    match state.player.lock().current_track() {
        Some(track) => Ok(Json(CurrentTrackResponse::from(&track))),
        None => Err(reject(ApiException::nothing_playing())),
    }
}

async fn lyrics(State(state): State<Arc<AppState>>) -> Json<LyricsResponse> {
    Json(state.player.lock().lyrics())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
