//! Frequently used imports for handlers.

pub use crate::{
    YueduState,
    error::ServerResult,
};
pub use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
pub use eyre::WrapErr;
pub use tracing::instrument;
pub use yuedu_api::{request as req, response as res};
