//! Replays a scripted pointer session against the widget resize coordinator.
//!
//! Usage: `widgetresize-demo [session.json]`. Without an argument the
//! bundled drag session is replayed.

mod session;

use session::Session;

const BUNDLED_SESSION: &str = include_str!("../sessions/drag.json");

fn main() {
    env_logger::init();

    let session = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading session from {}", path);
            Session::load(&path)
        }
        None => Session::from_json(BUNDLED_SESSION),
    };

    let session = match session {
        Ok(session) => session,
        Err(e) => {
            log::error!("Failed to load session: {}", e);
            std::process::exit(1);
        }
    };

    let commits = session::replay(&session);
    log::info!("Session finished with {} commit(s)", commits.len());
    for value in commits {
        println!("{}", value);
    }
}
