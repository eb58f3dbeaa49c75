//! Repository for the `forms` table.

use formsmith_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::form::{Form, FormChanges, FormListRow, NewForm};

/// Column list for `forms` queries.
const COLUMNS: &str = "id, name, fields, created_at, updated_at";

/// Column list for listing queries; the field sequence is reduced to a count.
const LIST_COLUMNS: &str = "\
    id, name, jsonb_array_length(fields)::BIGINT AS field_count, \
    created_at, updated_at";

/// Provides data access for saved forms.
pub struct FormRepo;

impl FormRepo {
    /// List forms ordered by id.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FormListRow>, sqlx::Error> {
        let query = format!("SELECT {LIST_COLUMNS} FROM forms ORDER BY id LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, FormListRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find a form by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forms WHERE id = $1");
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new form, returning the created row.
    pub async fn create(pool: &PgPool, form: &NewForm) -> Result<Form, sqlx::Error> {
        let query = format!(
            "INSERT INTO forms (name, fields) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(&form.name)
            .bind(Json(&form.fields))
            .fetch_one(pool)
            .await
    }

    /// Partially update a form.
    ///
    /// Uses `COALESCE` so only provided attributes are changed. Returns
    /// `None` if no row has this id.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &FormChanges,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!(
            "UPDATE forms SET \
                 name = COALESCE($2, name), \
                 fields = COALESCE($3, fields) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .bind(&changes.name)
            .bind(changes.fields.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete a form by ID.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM forms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
