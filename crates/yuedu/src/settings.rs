//! Reader settings.

use crate::{
    error::{Error, Result},
    store::Store,
    study::Study,
};
use yuedu_core::{FontSize, SettingEntry};

pub struct Settings<'a, S> {
    study: &'a Study<S>,
}

impl<'a, S: Store> Settings<'a, S> {
    pub fn new(study: &'a Study<S>) -> Self {
        Self { study }
    }

    pub fn font_size(&self) -> FontSize {
        self.study.font_size()
    }

    /// Sets the font size, clamped to the allowed range, and saves it.
    /// The previous size comes back if saving fails.
    #[tracing::instrument(skip(self))]
    pub async fn set_font_size(&self, px: i64) -> Result<FontSize> {
        let font_size = FontSize::new(px);
        let previous = std::mem::replace(&mut self.study.state().font_size, font_size);
        if previous == font_size {
            return Ok(font_size);
        }

        let entry = SettingEntry {
            key: FontSize::KEY.to_string(),
            value: serde_json::json!(font_size.get()),
        };
        if let Err(err) = self.study.store().put_setting(&entry).await {
            tracing::error!("Failed to save font size, rolling back: {err}");
            let mut state = self.study.state();
            // a later change wins over this rollback
            if state.font_size == font_size {
                state.font_size = previous;
            }
            return Err(Error::persistence("save font size", err));
        }
        tracing::info!("Font size set to {}", font_size.get());
        Ok(font_size)
    }
}

/// Reads the font size out of its settings row, falling back to the default.
pub(crate) fn font_size_from_entry(entry: Option<&SettingEntry>) -> FontSize {
    let Some(entry) = entry else {
        return FontSize::default();
    };
    if let Some(px) = entry.value.as_i64() {
        FontSize::new(px)
    } else if let Some(px) = entry.value.as_f64() {
        FontSize::new(px.round() as i64)
    } else {
        tracing::warn!("Ignoring invalid font size setting {}", entry.value);
        FontSize::default()
    }
}
