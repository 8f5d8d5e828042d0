//! /flashcards and /stories

use super::prelude::*;
use yuedu::{
    TextSummary,
    flashcards::{self, DEFAULT_CARD_COUNT},
};

/// Generates themed vocabulary and returns it as a CSV file.
#[instrument]
pub async fn flashcards(
    State(state): State<YueduState>,
    Json(request): Json<req::GenerateFlashcards<'static>>,
) -> ServerResult<impl IntoResponse> {
    let chat = state.chat()?;
    let count = request.count.unwrap_or(DEFAULT_CARD_COUNT);
    let words =
        flashcards::generate_flashcards(chat, &request.theme, count, &state.chat_options).await?;
    let csv = flashcards::to_csv(&words).wrap_err("Failed to write flashcards")?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name(&request.theme)),
            ),
        ],
        csv,
    ))
}

/// Generates a story and imports it as a new text.
#[instrument]
pub async fn story(
    State(state): State<YueduState>,
    Json(request): Json<req::GenerateStory<'static>>,
) -> ServerResult<Json<res::Text>> {
    let chat = state.chat()?;
    let theme = request.theme.as_deref();
    let words = flashcards::generate_story(chat, theme, &state.chat_options).await?;
    let title = story_title(request.title.as_deref(), theme);
    let entry = state.study.texts().import_words(&title, &words).await?;
    let summary = TextSummary::from(&entry);
    Ok(Json(res::Text {
        id: summary.id,
        title: summary.title,
        preview: summary.preview,
    }))
}

fn file_name(theme: &str) -> String {
    let theme = theme
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    if theme.is_empty() {
        "flashcards.csv".to_string()
    } else {
        format!("flashcards_{theme}.csv")
    }
}

fn story_title(title: Option<&str>, theme: Option<&str>) -> String {
    match (title.map(str::trim), theme.map(str::trim)) {
        (Some(title), _) if !title.is_empty() => title.to_string(),
        (_, Some(theme)) if !theme.is_empty() => format!("Story: {theme}"),
        _ => "Story".to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_csv_after_theme() {
        assert_eq!(file_name("fruit"), "flashcards_fruit.csv");
        assert_eq!(file_name(" at the zoo "), "flashcards_at_the_zoo.csv");
        assert_eq!(file_name("水果"), "flashcards_水果.csv");
        assert_eq!(file_name("  "), "flashcards.csv");
    }

    #[test]
    fn titles_stories() {
        assert_eq!(story_title(Some("My story"), Some("sea")), "My story");
        assert_eq!(story_title(Some(" "), Some("sea")), "Story: sea");
        assert_eq!(story_title(None, None), "Story");
    }
}
