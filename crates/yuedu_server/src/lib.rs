//! Web backend for Yuedu.

pub mod chat;
pub mod error;
pub mod handlers;
pub mod schema;
pub mod store;
pub mod utils;

use crate::{
    chat::AiChat,
    handlers::{flashcards, settings, texts, vocabulary},
    store::PgStore,
};
use axum::{
    Router,
    routing::{delete, get, post},
};
use diesel::{
    prelude::*,
    r2d2::{ConnectionManager, Pool},
};
use eyre::WrapErr;
use std::{fmt::Debug, ops::Deref, sync::Arc, time::Duration};
use tower_http::cors::CorsLayer;
use yuedu::{
    Study,
    flashcards::{Chat, ChatError, ChatOptions},
};

pub type YueduPool = Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct YueduState(Arc<YueduStateCore>);

impl Deref for YueduState {
    type Target = YueduStateCore;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Debug for YueduState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Yuedu")
    }
}

pub struct YueduStateCore {
    pub study: Study<PgStore>,
    pub chat: Option<AiChat>,
    pub chat_options: ChatOptions,
}

impl YueduStateCore {
    pub fn chat(&self) -> Result<&dyn Chat, ChatError> {
        self.chat
            .as_ref()
            .map(|chat| chat as &dyn Chat)
            .ok_or(ChatError::NotConfigured)
    }
}

/// Settings for the AI chat service.
#[derive(Debug, Clone, Default)]
pub struct AiConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

pub fn router(state: YueduState) -> Router<()> {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .nest(
                    "/texts",
                    Router::new()
                        .route("/", get(texts::get_all).post(texts::insert))
                        .route("/segments", post(texts::insert_segments))
                        .nest(
                            "/{id}",
                            Router::new()
                                .route("/", get(texts::get_one).delete(texts::delete))
                                .route("/known", post(texts::mark_known)),
                        ),
                )
                .nest(
                    "/vocabulary",
                    Router::new()
                        .route("/", get(vocabulary::search))
                        .route("/import", post(vocabulary::import))
                        .route("/export", get(vocabulary::export))
                        .route("/{hanzi}", delete(vocabulary::delete)),
                )
                .nest(
                    "/settings",
                    Router::new().route(
                        "/font-size",
                        get(settings::font_size).post(settings::set_font_size),
                    ),
                )
                .route("/flashcards", post(flashcards::flashcards))
                .route("/stories", post(flashcards::story)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn router_from_vars(database_url: &str, ai: AiConfig) -> eyre::Result<Router<()>> {
    // conservative pool config aimed at not using the database too much
    let pool = Pool::builder()
        .min_idle(Some(0))
        .idle_timeout(Some(Duration::from_secs(30)))
        .build(ConnectionManager::new(database_url))
        .wrap_err_with(|| format!("Failed to connect to the database at {database_url}"))?;

    let study = Study::load(PgStore::new(pool))
        .await
        .wrap_err("Failed to load study state")?;
    let chat = match ai.url {
        Some(url) => Some(AiChat::new(url, ai.api_key)?),
        None => {
            tracing::warn!("AI_API_URL is not set, flashcards and stories are disabled");
            None
        }
    };

    let state = YueduState(Arc::new(YueduStateCore {
        study,
        chat,
        chat_options: ChatOptions { model: ai.model },
    }));
    Ok(router(state))
}
