//! Contact Form Service: standalone binary that takes visitor submissions
//! and follow-up queries.
//!
//! Records live in a single JSON file rewritten on every change.
//! Default: http://127.0.0.1:8000/

mod auth;
mod config;
mod error;
mod intake;
mod ledger;
mod notifier;
mod routes;
mod store;

use auth::AdminGate;
use config::Config;
use ledger::Ledger;
use routes::AppState;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    log::info!("Using record store at: {}", config.data_file);
    let store = store::open(&config.data_file);

    if config.email.is_none() {
        log::warn!("EMAIL_USER, EMAIL_PASS or RECEIVER_EMAIL not set, email queries will fail");
    }
    let notifier = notifier::from_config(config.email.as_ref()).expect("Invalid email configuration");

    let admin = AdminGate::new(config.admin_token.clone());
    if !admin.is_configured() {
        log::warn!("ADMIN_TOKEN not set, admin routes will refuse every request");
    }

    let state = Arc::new(AppState {
        ledger: Ledger::new(store, notifier),
        admin,
        start_time: Instant::now(),
    });

    let app = routes::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    log::info!("Contact Form Service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server error");
}
