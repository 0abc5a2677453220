// HTTP handler bindings for the knight's tour API
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the GameSession's methods. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Locking the shared session for the shortest possible span
// - Mapping tour and advisor errors onto HTTP statuses
// - Serializing responses

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::ledger::LeaderboardRow;
use crate::oracle::AdvisorError;
use crate::server::AppState;
use crate::session::BoardView;
use crate::tour::TourError;
use crate::types::{BoardConfig, Cell, TourType};

#[derive(Deserialize, Serialize, Debug)]
pub struct NewGameRequest {
    pub size: i32,
    pub tour_type: TourType,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct HintResponse {
    pub cell: Option<Cell>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (Status, Json<ErrorBody>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

fn error_body(status: Status, message: String) -> ApiError {
    (status, Json(ErrorBody { error: message }))
}

fn tour_error(e: TourError) -> ApiError {
    let status = match e {
        TourError::InvalidTransition { .. } => Status::Conflict,
        TourError::IllegalMove { .. } | TourError::OutOfBounds { .. } => {
            Status::UnprocessableEntity
        }
        TourError::InvalidBoardSize { .. } => Status::BadRequest,
    };
    error_body(status, e.to_string())
}

fn advisor_error(e: AdvisorError) -> ApiError {
    let status = match e {
        AdvisorError::Unavailable { .. } => Status::ServiceUnavailable,
        AdvisorError::UnsupportedBoard { .. } | AdvisorError::NoPosition => Status::BadRequest,
        AdvisorError::OffBoard { .. } => Status::UnprocessableEntity,
        AdvisorError::Stale => Status::Conflict,
    };
    error_body(status, e.to_string())
}

/// GET / endpoint
/// Returns service metadata
#[get("/")]
pub fn index(state: &State<AppState>) -> Json<Value> {
    let session = state.session.lock();
    let config = session.tour().config();
    Json(json!({
        "apiversion": "1",
        "service": "knight-tour",
        "board": { "size": config.size, "tour_type": config.tour_type },
        "epoch": session.epoch(),
    }))
}

/// GET /game endpoint
/// Returns the current board view; polled by the presentation layer for its clock
#[get("/game")]
pub fn game(state: &State<AppState>) -> Json<BoardView> {
    Json(state.session.lock().view())
}

/// POST /game/new endpoint
/// Starts a new tour with the requested board configuration
#[post("/game/new", format = "json", data = "<new_game>")]
pub fn new_game(state: &State<AppState>, new_game: Json<NewGameRequest>) -> ApiResult<BoardView> {
    let config = BoardConfig::new(new_game.size, new_game.tour_type).map_err(tour_error)?;
    let mut session = state.session.lock();
    session.new_game(config).map_err(tour_error)?;
    Ok(Json(session.view()))
}

/// POST /game/reset endpoint
/// Restarts the tour on the current board configuration
#[post("/game/reset")]
pub fn reset(state: &State<AppState>) -> Json<BoardView> {
    let mut session = state.session.lock();
    session.reset();
    Json(session.view())
}

/// POST /game/cell endpoint
/// Places the knight on an empty board, otherwise moves it
#[post("/game/cell", format = "json", data = "<cell>")]
pub fn place_or_move(state: &State<AppState>, cell: Json<Cell>) -> ApiResult<BoardView> {
    let mut session = state.session.lock();
    session.place_or_move(cell.into_inner()).map_err(tour_error)?;
    Ok(Json(session.view()))
}

/// POST /game/undo endpoint
#[post("/game/undo")]
pub fn undo(state: &State<AppState>) -> ApiResult<BoardView> {
    let mut session = state.session.lock();
    session.undo().map_err(tour_error)?;
    Ok(Json(session.view()))
}

/// GET /game/hint endpoint
/// Returns the Warnsdorff suggestion, or null when no move is possible
#[get("/game/hint")]
pub fn hint(state: &State<AppState>) -> Json<HintResponse> {
    let cell = state.session.lock().hint();
    Json(HintResponse { cell })
}

/// GET /game/ai-hint endpoint
/// Consults the advisor oracle without holding the session lock while waiting
#[get("/game/ai-hint")]
pub async fn ai_hint(state: &State<AppState>) -> ApiResult<HintResponse> {
    let ticket = {
        let session = state.session.lock();
        session.prepare_ai_hint()
    }
    .map_err(advisor_error)?;

    let reply = state
        .oracle
        .predict(&ticket.grid)
        .await
        .map_err(advisor_error)?;

    let cell = {
        let mut session = state.session.lock();
        session.accept_ai_hint(&ticket, reply)
    }
    .map_err(advisor_error)?;

    Ok(Json(HintResponse { cell: Some(cell) }))
}

/// GET /leaderboard endpoint
/// Best score per board configuration, fastest first
#[get("/leaderboard")]
pub fn leaderboard(state: &State<AppState>) -> Json<Vec<LeaderboardRow>> {
    Json(state.session.lock().leaderboard())
}
