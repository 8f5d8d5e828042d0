//! /vocabulary

use super::prelude::*;
use yuedu::vocabulary::EXPORT_FILE_NAME;
use yuedu_core::Word;

#[instrument]
pub async fn search(
    State(state): State<YueduState>,
    Query(search): Query<req::VocabularySearch<'static>>,
) -> Json<Vec<Word>> {
    Json(state.study.vocabulary().search(&search.query))
}

#[instrument]
pub async fn delete(
    State(state): State<YueduState>,
    Path(hanzi): Path<String>,
) -> ServerResult<Json<res::Deleted>> {
    let deleted = state.study.vocabulary().delete_word(&hanzi).await?;
    Ok(Json(res::Deleted { deleted }))
}

/// Replaces the vocabulary with the JSON array in the body.
#[instrument(skip(payload), fields(len = payload.len()))]
pub async fn import(State(state): State<YueduState>, payload: String) -> ServerResult<()> {
    state.study.vocabulary().import_json(&payload).await?;
    Ok(())
}

#[instrument]
pub async fn export(State(state): State<YueduState>) -> impl IntoResponse {
    let body = state.study.vocabulary().export();
    (
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    )
}
