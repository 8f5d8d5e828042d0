//! Web backend for Yuedu.

use eyre::WrapErr;
use std::{env, net::SocketAddr};
use tokio::net::TcpListener;
use yuedu_server::AiConfig;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let server_url = env::var("SERVER_URL")
        .wrap_err("Missing SERVER_URL")?
        .parse::<SocketAddr>()
        .wrap_err("Invalid SERVER_URL")?;

    let database_url = env::var("DATABASE_URL").wrap_err("Missing DATABASE_URL")?;
    let ai = AiConfig {
        url: env::var("AI_API_URL").ok(),
        api_key: env::var("AI_API_KEY").ok(),
        model: env::var("AI_MODEL").ok(),
    };

    let router = yuedu_server::router_from_vars(&database_url, ai)
        .await
        .wrap_err("Failed to build router")?;

    tracing::info!("Starting server at {server_url}");
    let server_addr = TcpListener::bind(server_url)
        .await
        .wrap_err("Failed to bind to address")?;
    axum::serve(server_addr, router.into_make_service())
        .await
        .wrap_err("Failed to start server")?;
    Ok(())
}
