//! PostgreSQL implementation of the SpeechRepository port.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;

use crate::domain::{
    models::{Speech, SpeechId},
    ports::outbound::{SpeechMerge, SpeechRepository},
    SpeechError,
};

/// SQLSTATE for `not_null_violation`.
const NOT_NULL_VIOLATION: &str = "23502";

pub struct PostgresSpeechRepository {
    pool: PgPool,
}

impl PostgresSpeechRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_matching(
        &self,
        query: &'static str,
        pattern: String,
    ) -> Result<Vec<Speech>, SpeechError> {
        let rows = sqlx::query_as::<_, SpeechRow>(query)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(into_speeches(rows))
    }

    async fn insert(&self, speech: &Speech) -> Result<Speech, SpeechError> {
        let row = sqlx::query_as::<_, SpeechRow>(
            r#"
            INSERT INTO speeches (text, author, author_email, keywords, speech_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, text, author, author_email, keywords, speech_date
            "#,
        )
        .bind(&speech.text)
        .bind(&speech.author)
        .bind(&speech.author_email)
        .bind(keyword_list(speech))
        .bind(speech.speech_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SpeechRow {
    id: i64,
    text: String,
    author: String,
    author_email: Option<String>,
    keywords: Vec<String>,
    speech_date: Option<Date>,
}

impl From<SpeechRow> for Speech {
    fn from(row: SpeechRow) -> Self {
        Self {
            id: Some(SpeechId::new(row.id)),
            text: row.text,
            author: row.author,
            author_email: row.author_email,
            keywords: row.keywords.into_iter().collect(),
            speech_date: row.speech_date,
        }
    }
}

fn into_speeches(rows: Vec<SpeechRow>) -> Vec<Speech> {
    rows.into_iter().map(Speech::from).collect()
}

fn keyword_list(speech: &Speech) -> Vec<String> {
    speech.keywords.iter().cloned().collect()
}

/// Build an `ILIKE` pattern matching `needle` literally anywhere in a value.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl From<sqlx::Error> for SpeechError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(NOT_NULL_VIOLATION) =>
            {
                SpeechError::Validation(db_err.message().to_string())
            }
            _ => {
                tracing::error!("Database error: {:?}", err);
                SpeechError::Storage(err.to_string())
            }
        }
    }
}

#[async_trait]
impl SpeechRepository for PostgresSpeechRepository {
    async fn find_all(&self) -> Result<Vec<Speech>, SpeechError> {
        let rows = sqlx::query_as::<_, SpeechRow>(
            r#"
            SELECT id, text, author, author_email, keywords, speech_date
            FROM speeches
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(into_speeches(rows))
    }

    async fn find_by_id(&self, id: SpeechId) -> Result<Option<Speech>, SpeechError> {
        let row = sqlx::query_as::<_, SpeechRow>(
            r#"
            SELECT id, text, author, author_email, keywords, speech_date
            FROM speeches
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Speech::from))
    }

    async fn save(&self, speech: Speech) -> Result<Speech, SpeechError> {
        let Some(id) = speech.id else {
            return self.insert(&speech).await;
        };

        let row = sqlx::query_as::<_, SpeechRow>(
            r#"
            UPDATE speeches
            SET text = $2, author = $3, author_email = $4, keywords = $5, speech_date = $6
            WHERE id = $1
            RETURNING id, text, author, author_email, keywords, speech_date
            "#,
        )
        .bind(id.as_i64())
        .bind(&speech.text)
        .bind(&speech.author)
        .bind(&speech.author_email)
        .bind(keyword_list(&speech))
        .bind(speech.speech_date)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row.into()),
            // Unknown ids are never reused; the record is stored under a fresh one.
            None => self.insert(&speech).await,
        }
    }

    async fn exists_by_id(&self, id: SpeechId) -> Result<bool, SpeechError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM speeches WHERE id = $1)")
                .bind(id.as_i64())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn delete_by_id(&self, id: SpeechId) -> Result<(), SpeechError> {
        sqlx::query("DELETE FROM speeches WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_all_by_id(&self, ids: &HashSet<SpeechId>) -> Result<Vec<Speech>, SpeechError> {
        let ids: Vec<i64> = ids.iter().map(SpeechId::as_i64).collect();
        let rows = sqlx::query_as::<_, SpeechRow>(
            r#"
            SELECT id, text, author, author_email, keywords, speech_date
            FROM speeches
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_speeches(rows))
    }

    async fn find_by_author_containing(&self, author: &str) -> Result<Vec<Speech>, SpeechError> {
        self.fetch_matching(
            r#"
            SELECT id, text, author, author_email, keywords, speech_date
            FROM speeches
            WHERE author ILIKE $1 ESCAPE '\'
            "#,
            contains_pattern(author),
        )
        .await
    }

    async fn find_by_speech_date_between(
        &self,
        from: Date,
        to: Date,
    ) -> Result<Vec<Speech>, SpeechError> {
        let rows = sqlx::query_as::<_, SpeechRow>(
            r#"
            SELECT id, text, author, author_email, keywords, speech_date
            FROM speeches
            WHERE speech_date >= $1 AND speech_date <= $2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_speeches(rows))
    }

    async fn find_by_speech_date_from(&self, from: Date) -> Result<Vec<Speech>, SpeechError> {
        let rows = sqlx::query_as::<_, SpeechRow>(
            r#"
            SELECT id, text, author, author_email, keywords, speech_date
            FROM speeches
            WHERE speech_date >= $1
            "#,
        )
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_speeches(rows))
    }

    async fn find_by_speech_date_until(&self, to: Date) -> Result<Vec<Speech>, SpeechError> {
        let rows = sqlx::query_as::<_, SpeechRow>(
            r#"
            SELECT id, text, author, author_email, keywords, speech_date
            FROM speeches
            WHERE speech_date <= $1
            "#,
        )
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_speeches(rows))
    }

    async fn find_by_text_containing(&self, text: &str) -> Result<Vec<Speech>, SpeechError> {
        self.fetch_matching(
            r#"
            SELECT id, text, author, author_email, keywords, speech_date
            FROM speeches
            WHERE text ILIKE $1 ESCAPE '\'
            "#,
            contains_pattern(text),
        )
        .await
    }

    async fn find_by_keyword_containing(
        &self,
        keyword: &str,
    ) -> Result<Vec<Speech>, SpeechError> {
        self.fetch_matching(
            r#"
            SELECT id, text, author, author_email, keywords, speech_date
            FROM speeches
            WHERE EXISTS (
                SELECT 1 FROM unnest(keywords) AS k(keyword)
                WHERE k.keyword ILIKE $1 ESCAPE '\'
            )
            "#,
            contains_pattern(keyword),
        )
        .await
    }

    async fn update_with(
        &self,
        id: SpeechId,
        merge: SpeechMerge,
    ) -> Result<Option<Speech>, SpeechError> {
        // Rolled back on drop, so every early return releases the row lock.
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, SpeechRow>(
            r#"
            SELECT id, text, author, author_email, keywords, speech_date
            FROM speeches
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut speech = Speech::from(row);
        merge(&mut speech);

        let row = sqlx::query_as::<_, SpeechRow>(
            r#"
            UPDATE speeches
            SET text = $2, author = $3, author_email = $4, keywords = $5, speech_date = $6
            WHERE id = $1
            RETURNING id, text, author, author_email, keywords, speech_date
            "#,
        )
        .bind(id.as_i64())
        .bind(&speech.text)
        .bind(&speech.author)
        .bind(&speech.author_email)
        .bind(keyword_list(&speech))
        .bind(speech.speech_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(row.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn contains_pattern_wraps_in_wildcards() {
        assert_eq!(contains_pattern("john"), "%john%");
        assert_eq!(contains_pattern(""), "%%");
    }

    #[test]
    fn contains_pattern_escapes_like_metacharacters() {
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\dir"), "%c:\\\\dir%");
    }

    #[test]
    fn row_converts_to_speech_with_keyword_set() {
        let row = SpeechRow {
            id: 7,
            text: "Text".to_string(),
            author: "Author".to_string(),
            author_email: None,
            keywords: vec!["b".to_string(), "a".to_string(), "b".to_string()],
            speech_date: Some(date!(2024 - 01 - 15)),
        };

        let speech = Speech::from(row);
        assert_eq!(speech.id, Some(SpeechId::new(7)));
        assert_eq!(speech.keywords.len(), 2);
        assert_eq!(speech.speech_date, Some(date!(2024 - 01 - 15)));
    }

    #[test]
    fn non_database_errors_map_to_storage() {
        let err = SpeechError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, SpeechError::Storage(_)));
    }
}
