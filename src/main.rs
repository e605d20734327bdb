use tracing_subscriber::EnvFilter;

mod app;
mod auth;
mod config;
mod dashboard;
mod db;
mod errors;
mod extract;
mod profile;
mod state;
mod templates;
#[cfg(test)]
mod testing;

/// `RUST_LOG` picks the filter; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("aibuilder=debug,axum=info,tower_http=info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => subscriber.with_target(false).json().init(),
        _ => subscriber.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    // Missing secret or unreachable database aborts here.
    let app_state = state::AppState::init().await?;
    let config = app_state.config.clone();

    let app = app::build_app(app_state);
    app::serve(app, &config).await
}
