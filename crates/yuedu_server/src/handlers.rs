//! Handlers for each main route.

pub mod flashcards;
pub mod settings;
pub mod texts;
pub mod vocabulary;

mod prelude;
