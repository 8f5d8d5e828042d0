//! PostgreSQL implementation of the yuedu store traits.

use crate::{
    YueduPool,
    error::EyreResult,
    query, schema,
    utils::diesel::{PostgresChunks, eq},
};
use async_trait::async_trait;
use diesel::{prelude::*, upsert::excluded};
use eyre::WrapErr;
use yuedu::{
    StoreError,
    store::{SettingsStore, StoreResult, TextStore, WordStore},
};
use yuedu_core::{SettingEntry, TextEntry, Word};

#[derive(Clone)]
pub struct PgStore {
    pool: YueduPool,
}

impl PgStore {
    pub fn new(pool: YueduPool) -> Self {
        Self { pool }
    }

    /// Runs blocking database work on a pooled connection.
    async fn run<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> EyreResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let res = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await;
        match res {
            Ok(Ok(val)) => Ok(val),
            Ok(Err(err)) => Err(StoreError::new(err)),
            Err(err) => Err(StoreError::new(err)),
        }
    }
}

fn insert_words(conn: &mut PgConnection, words: Vec<Word>) -> EyreResult<()> {
    use schema::vocabulary as v;

    let rows = words
        .into_iter()
        .map(|Word { hanzi, pinyin, translation }| eq!(v, hanzi, pinyin, translation))
        .collect::<Vec<_>>();
    for chunk in rows.pg_chunks() {
        diesel::insert_into(v::table)
            .values(chunk)
            .on_conflict(v::hanzi)
            .do_update()
            .set((
                v::pinyin.eq(excluded(v::pinyin)),
                v::translation.eq(excluded(v::translation)),
            ))
            .execute(conn)
            .wrap_err("Failed to insert words")?;
    }
    Ok(())
}

#[async_trait]
impl WordStore for PgStore {
    async fn get_all_words(&self) -> StoreResult<Vec<Word>> {
        use schema::vocabulary as v;

        self.run(|conn| {
            let rows = v::table
                .order_by(v::position)
                .select(WordRow::as_select())
                .load(conn)
                .wrap_err("Failed to load vocabulary")?;
            Ok(rows.into_iter().map(Word::from).collect())
        })
        .await
    }

    async fn put_word(&self, word: &Word) -> StoreResult<()> {
        let word = word.clone();
        self.run(move |conn| insert_words(conn, vec![word])).await
    }

    async fn delete_word(&self, hanzi: &str) -> StoreResult<()> {
        use schema::vocabulary as v;

        let hanzi = hanzi.to_string();
        self.run(move |conn| {
            diesel::delete(v::table.find(hanzi))
                .execute(conn)
                .wrap_err("Failed to delete word")?;
            Ok(())
        })
        .await
    }

    async fn clear_words(&self) -> StoreResult<()> {
        use schema::vocabulary as v;

        self.run(|conn| {
            diesel::delete(v::table)
                .execute(conn)
                .wrap_err("Failed to clear vocabulary")?;
            Ok(())
        })
        .await
    }

    async fn bulk_add_words(&self, words: &[Word]) -> StoreResult<()> {
        let words = words.to_vec();
        self.run(move |conn| insert_words(conn, words)).await
    }

    async fn replace_words(&self, words: &[Word]) -> StoreResult<()> {
        use schema::vocabulary as v;

        let words = words.to_vec();
        self.run(move |conn| {
            conn.transaction(|conn| {
                diesel::delete(v::table)
                    .execute(conn)
                    .wrap_err("Failed to clear vocabulary")?;
                insert_words(conn, words)
            })
        })
        .await
    }
}

#[async_trait]
impl TextStore for PgStore {
    async fn get_all_texts(&self) -> StoreResult<Vec<TextEntry>> {
        use schema::texts as t;

        self.run(|conn| {
            let rows = t::table
                .order_by(t::position)
                .select(TextRow::as_select())
                .load(conn)
                .wrap_err("Failed to load texts")?;
            Ok(rows.into_iter().map(TextEntry::from).collect())
        })
        .await
    }

    async fn get_text(&self, id: &str) -> StoreResult<Option<TextEntry>> {
        use schema::texts as t;

        let id = id.to_string();
        self.run(move |conn| {
            let row = t::table
                .find(id)
                .select(TextRow::as_select())
                .first(conn)
                .optional()
                .wrap_err("Failed to load text")?;
            Ok(row.map(TextEntry::from))
        })
        .await
    }

    async fn add_text(&self, text: &TextEntry) -> StoreResult<()> {
        use schema::texts as t;

        let TextEntry { id, title, content } = text.clone();
        self.run(move |conn| {
            diesel::insert_into(t::table)
                .values(eq!(t, id, title, content))
                .execute(conn)
                .wrap_err("Failed to insert text")?;
            Ok(())
        })
        .await
    }

    async fn delete_text(&self, id: &str) -> StoreResult<()> {
        use schema::texts as t;

        let id = id.to_string();
        self.run(move |conn| {
            diesel::delete(t::table.find(id))
                .execute(conn)
                .wrap_err("Failed to delete text")?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn get_setting(&self, key: &str) -> StoreResult<Option<SettingEntry>> {
        use schema::settings as s;

        let key = key.to_string();
        self.run(move |conn| {
            let row = s::table
                .find(key)
                .select(SettingRow::as_select())
                .first(conn)
                .optional()
                .wrap_err("Failed to load setting")?;
            Ok(row.map(|row| SettingEntry {
                key: row.key,
                value: row.value,
            }))
        })
        .await
    }

    async fn put_setting(&self, entry: &SettingEntry) -> StoreResult<()> {
        use schema::settings as s;

        let SettingEntry { key, value } = entry.clone();
        self.run(move |conn| {
            diesel::insert_into(s::table)
                .values(eq!(s, key, value))
                .on_conflict(s::key)
                .do_update()
                .set(s::value.eq(excluded(s::value)))
                .execute(conn)
                .wrap_err("Failed to save setting")?;
            Ok(())
        })
        .await
    }
}

// queries

query! {
    struct WordRow {
        hanzi: String = vocabulary::hanzi,
        pinyin: String = vocabulary::pinyin,
        translation: String = vocabulary::translation,
    }
}

impl From<WordRow> for Word {
    fn from(row: WordRow) -> Self {
        Self {
            hanzi: row.hanzi,
            pinyin: row.pinyin,
            translation: row.translation,
        }
    }
}

query! {
    struct TextRow {
        id: String = texts::id,
        title: String = texts::title,
        content: String = texts::content,
    }
}

impl From<TextRow> for TextEntry {
    fn from(row: TextRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
        }
    }
}

query! {
    struct SettingRow {
        key: String = settings::key,
        value: serde_json::Value = settings::value,
    }
}
