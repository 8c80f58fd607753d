use std::sync::Arc;

use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;

use crate::game_manager::GameManager;
use semantle_persistence::{NewGameRecord, StatsStore};
use semantle_types::{
    ErrorResponse, GameError, GuessRequest, NewGameRequest, RecordGameRequest, SessionId,
    WordValidationResponse,
};

pub mod config;
pub mod embeddings;
pub mod game_manager;

type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

pub fn create_routes(
    game_manager: Arc<GameManager>,
    stats_store: Arc<dyn StatsStore>,
    allowed_origins: Vec<String>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let game_manager_filter = warp::any().map({
        let game_manager = game_manager.clone();
        move || game_manager.clone()
    });

    let stats_filter = warp::any().map({
        let stats_store = stats_store.clone();
        move || stats_store.clone()
    });

    let root = warp::path::end().and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({ "message": "Semantle API is running" }))
    });

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let api_info = warp::path!("api").and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "message": "Semantle API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "game": {
                    "new": "POST /api/game/new",
                    "guess": "POST /api/game/guess",
                    "session": "GET /api/game/{session_id}"
                },
                "stats": "GET /api/stats/{user_id}",
                "record": "POST /api/stats/{user_id}/games",
                "words": "GET /api/words/validate/{word}"
            }
        }))
    });

    // Body is optional; an empty body starts a random game
    let new_game = warp::path!("api" / "game" / "new")
        .and(warp::post())
        .and(warp::body::bytes())
        .and(game_manager_filter.clone())
        .and_then(handle_new_game);

    let guess = warp::path!("api" / "game" / "guess")
        .and(warp::post())
        .and(warp::body::bytes())
        .and(game_manager_filter.clone())
        .and_then(handle_guess);

    let session = warp::path!("api" / "game" / String)
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_get_session);

    let user_stats = warp::path!("api" / "stats" / String)
        .and(warp::get())
        .and(stats_filter.clone())
        .and_then(handle_user_stats);

    let record_game = warp::path!("api" / "stats" / String / "games")
        .and(warp::post())
        .and(warp::body::bytes())
        .and(game_manager_filter.clone())
        .and(stats_filter.clone())
        .and_then(handle_record_game);

    let validate_word = warp::path!("api" / "words" / "validate" / String)
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_validate_word);

    let cors = warp::cors()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST"]);
    let cors = if allowed_origins.is_empty() {
        cors.allow_any_origin()
    } else {
        cors.allow_origins(allowed_origins.iter().map(String::as_str))
    };

    root.or(health)
        .or(api_info)
        .or(new_game)
        .or(guess)
        .or(session)
        .or(user_stats)
        .or(record_game)
        .or(validate_word)
        .with(cors)
        .with(warp::log("semantle"))
}

fn json_reply<T: serde::Serialize>(body: &T, status: StatusCode) -> JsonReply {
    warp::reply::with_status(warp::reply::json(body), status)
}

fn error_reply(error: GameError) -> JsonReply {
    let status = match &error {
        GameError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
        GameError::EmbeddingUnavailable { .. } => StatusCode::BAD_GATEWAY,
        GameError::PersistenceFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        GameError::InvalidRequest { .. }
        | GameError::SessionIdRequired
        | GameError::GameAlreadyCompleted
        | GameError::InvalidWord { .. }
        | GameError::WordAlreadyGuessed { .. } => StatusCode::BAD_REQUEST,
    };
    json_reply(&ErrorResponse::from(error), status)
}

/// Malformed identifiers are reported the same way as unknown ones.
fn parse_session_id(raw: &str) -> Result<SessionId, GameError> {
    Uuid::parse_str(raw).map_err(|_| GameError::SessionNotFound {
        session_id: raw.to_string(),
    })
}

/// Decode a JSON body, reporting failures in the usual error shape.
fn parse_body<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, GameError> {
    serde_json::from_slice(body).map_err(|e| GameError::InvalidRequest {
        message: e.to_string(),
    })
}

async fn handle_new_game(
    body: Bytes,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        NewGameRequest::default()
    } else {
        match parse_body::<NewGameRequest>(&body) {
            Ok(request) => request,
            Err(e) => return Ok(error_reply(e)),
        }
    };

    let state = game_manager.create_session(request.daily);
    Ok(json_reply(&state, StatusCode::OK))
}

async fn handle_guess(
    body: Bytes,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    let request = match parse_body::<GuessRequest>(&body) {
        Ok(request) => request,
        Err(e) => return Ok(error_reply(e)),
    };

    let Some(raw_id) = request.session_id.filter(|id| !id.trim().is_empty()) else {
        return Ok(error_reply(GameError::SessionIdRequired));
    };

    let result = match parse_session_id(raw_id.trim()) {
        Ok(session_id) => game_manager.submit_guess(session_id, &request.word).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => Ok(json_reply(&response, StatusCode::OK)),
        Err(e) => Ok(error_reply(e)),
    }
}

async fn handle_get_session(
    raw_id: String,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    let session_id = match parse_session_id(&raw_id) {
        Ok(id) => id,
        Err(e) => return Ok(error_reply(e)),
    };

    match game_manager.get_session(session_id).await {
        Some(state) => Ok(json_reply(&state, StatusCode::OK)),
        None => Ok(error_reply(GameError::SessionNotFound { session_id: raw_id })),
    }
}

async fn handle_user_stats(
    user_id: String,
    stats_store: Arc<dyn StatsStore>,
) -> Result<JsonReply, warp::Rejection> {
    let summary = stats_store.get_user_stats(&user_id).await;
    Ok(json_reply(&summary, StatusCode::OK))
}

async fn handle_record_game(
    user_id: String,
    body: Bytes,
    game_manager: Arc<GameManager>,
    stats_store: Arc<dyn StatsStore>,
) -> Result<JsonReply, warp::Rejection> {
    let request = match parse_body::<RecordGameRequest>(&body) {
        Ok(request) => request,
        Err(e) => return Ok(error_reply(e)),
    };

    let session_id = match parse_session_id(request.session_id.trim()) {
        Ok(id) => id,
        Err(e) => return Ok(error_reply(e)),
    };

    let Some(state) = game_manager.get_session(session_id).await else {
        return Ok(error_reply(GameError::SessionNotFound {
            session_id: request.session_id,
        }));
    };

    if let Err(e) = stats_store
        .record_game(&user_id, NewGameRecord::from(&state))
        .await
    {
        tracing::error!("Failed to record game for user {}: {:#}", user_id, e);
        return Ok(error_reply(GameError::PersistenceFailure {
            message: e.to_string(),
        }));
    }

    let summary = stats_store.get_user_stats(&user_id).await;
    Ok(json_reply(&summary, StatusCode::OK))
}

async fn handle_validate_word(
    word: String,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    let valid = game_manager.is_word_valid(&word).await;
    Ok(json_reply(
        &WordValidationResponse { valid, word },
        StatusCode::OK,
    ))
}
