//! Provides all of Yuedu's core functionality.
//!
//! The [`Study`] context owns the in-memory vocabulary, the text list and the font size.
//! Reading sessions, the vocabulary manager, the text library and the settings
//! borrow it and are the only way its state changes.

pub mod error;
pub mod flashcards;
pub mod known;
pub mod reading;
pub mod settings;
pub mod store;
pub mod study;
pub mod text;
pub mod texts;
pub mod vocabulary;

pub use self::{
    error::{Error, Result, StoreError, TextImportError, ValidationError},
    reading::{MarkKnown, ReadingSession, RenderedWord},
    store::Store,
    study::Study,
    texts::{TextLibrary, TextSummary},
    vocabulary::VocabularyManager,
};
pub use yuedu_core::{FontSize, SettingEntry, TextEntry, Word};
