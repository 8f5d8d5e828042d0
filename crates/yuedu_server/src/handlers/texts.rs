//! /texts

use super::prelude::*;
use yuedu::{ReadingSession, Store, TextSummary};
use yuedu_core::{FontSize, Word};

// handlers

#[instrument]
pub async fn get_all(State(state): State<YueduState>) -> Json<Vec<res::Text>> {
    let texts = state.study.texts().list().into_iter().map(text).collect();
    Json(texts)
}

#[instrument]
pub async fn insert(
    State(state): State<YueduState>,
    Json(new_text): Json<req::NewText<'static>>,
) -> ServerResult<Json<res::Text>> {
    let entry = state
        .study
        .texts()
        .import_words(&new_text.title, &new_text.words)
        .await?;
    Ok(Json(text(TextSummary::from(&entry))))
}

#[instrument]
pub async fn insert_segments(
    State(state): State<YueduState>,
    Json(new_text): Json<req::NewSegmentedText<'static>>,
) -> ServerResult<Json<res::Text>> {
    let entry = state
        .study
        .texts()
        .import_segments(
            &new_text.title,
            &new_text.mandarin,
            &new_text.pinyin,
            &new_text.english,
        )
        .await?;
    Ok(Json(text(TextSummary::from(&entry))))
}

#[instrument]
pub async fn get_one(
    State(state): State<YueduState>,
    Path(id): Path<String>,
) -> ServerResult<Json<res::Reading>> {
    let session = state.study.texts().open(&id).await?;
    Ok(Json(reading(&session, state.study.font_size())))
}

#[instrument]
pub async fn delete(
    State(state): State<YueduState>,
    Path(id): Path<String>,
) -> ServerResult<()> {
    state.study.texts().delete(&id).await?;
    Ok(())
}

#[instrument]
pub async fn mark_known(
    State(state): State<YueduState>,
    Path(id): Path<String>,
    Json(word): Json<Word>,
) -> ServerResult<Json<res::MarkKnown>> {
    let session = state.study.texts().open(&id).await?;
    let outcome = match session.mark_known(&word).await? {
        yuedu::MarkKnown::Marked => res::MarkKnown::Marked,
        yuedu::MarkKnown::AlreadyKnown => res::MarkKnown::AlreadyKnown,
    };
    Ok(Json(outcome))
}

// utils

fn text(summary: TextSummary) -> res::Text {
    res::Text {
        id: summary.id,
        title: summary.title,
        preview: summary.preview,
    }
}

fn reading<S: Store>(session: &ReadingSession<'_, S>, font_size: FontSize) -> res::Reading {
    let words = session
        .render()
        .into_iter()
        .map(|rendered| res::ReadingWord {
            hanzi: rendered.word.hanzi.clone(),
            pinyin: rendered.word.pinyin.clone(),
            translation: rendered.translation().map(str::to_string),
            known: rendered.known,
        })
        .collect();
    res::Reading {
        id: session.text().id.clone(),
        title: session.text().title.clone(),
        font_size,
        words,
    }
}
