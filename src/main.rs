use log::info;
use std::env;

use knight_tour::config::Config;
use knight_tour::journal::MoveJournal;
use knight_tour::ledger::ScoreLedger;
use knight_tour::server;
use knight_tour::session::GameSession;

#[rocket::launch]
async fn rocket() -> _ {
    // Lots of web hosting services expect you to bind to the port specified by the `PORT`
    // environment variable. However, Rocket looks at the `ROCKET_PORT` environment variable.
    // If we find a value for `PORT`, we set `ROCKET_PORT` to that value.
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Knight's Tour Server...");

    // Load configuration once at startup
    let config = Config::load_or_default();
    let ledger = ScoreLedger::load_or_default(
        &config.ledger.file_path,
        config.ledger.max_entries_per_key,
    );
    let journal = MoveJournal::new(config.debug.enabled, &config.debug.log_file_path).await;
    let oracle = server::oracle_from_config(&config.advisor);

    let session = GameSession::new(&config, ledger, journal);
    server::build(session, oracle)
}
