use openroute::prelude::*;
use openroute::http::serve;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_tracing();

    // `OPENROUTE_PROFILE` overrides the profile.
    let config = match AppConfig::load("dev") {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let app = match example_app::build_app(&config) {
        Ok(app) => app,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            std::process::exit(1);
        }
    };

    let host = config.get_or("server.host", "127.0.0.1".to_string());
    let port: u16 = config.get_or("server.port", 3000);
    let addr = format!("{host}:{port}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, %addr, "failed to bind");
            std::process::exit(1);
        }
    };
    info!(%addr, profile = config.profile(), doc = example_app::DOC_PATH, "listening");
    if let Err(err) = serve(listener, app).await {
        error!(error = %err, "server error");
    }
}
