//! /settings

use super::prelude::*;

#[instrument]
pub async fn font_size(State(state): State<YueduState>) -> Json<res::Settings> {
    Json(res::Settings {
        font_size: state.study.settings().font_size(),
    })
}

#[instrument]
pub async fn set_font_size(
    State(state): State<YueduState>,
    Json(update): Json<req::UpdateFontSize>,
) -> ServerResult<Json<res::Settings>> {
    let font_size = state.study.settings().set_font_size(update.font_size).await?;
    Ok(Json(res::Settings { font_size }))
}
