// Rocket assembly: shared state, middleware and route table

use log::{info, warn};
use parking_lot::Mutex;
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use std::sync::Arc;

use crate::config::AdvisorConfig;
use crate::handler;
use crate::oracle::{DisabledOracle, HttpOracle, MoveOracle};
use crate::session::GameSession;

/// State managed by Rocket and shared across requests
pub struct AppState {
    pub session: Mutex<GameSession>,
    pub oracle: Arc<dyn MoveOracle>,
}

/// Picks the oracle implementation for the advisor configuration
pub fn oracle_from_config(config: &AdvisorConfig) -> Arc<dyn MoveOracle> {
    if !config.enabled {
        return Arc::new(DisabledOracle);
    }
    match HttpOracle::new(config) {
        Ok(oracle) => {
            info!("Advisor oracle at {}", oracle.endpoint());
            Arc::new(oracle)
        }
        Err(e) => {
            warn!("Advisor oracle disabled: {}", e);
            Arc::new(DisabledOracle)
        }
    }
}

pub fn build(session: GameSession, oracle: Arc<dyn MoveOracle>) -> Rocket<Build> {
    rocket::build()
        .manage(AppState {
            session: Mutex::new(session),
            oracle,
        })
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "knight-tour");
            })
        }))
        .mount(
            "/",
            routes![
                handler::index,
                handler::game,
                handler::new_game,
                handler::reset,
                handler::place_or_move,
                handler::undo,
                handler::hint,
                handler::ai_hint,
                handler::leaderboard
            ],
        )
}
