use sqlx::PgPool;

use crate::error::ApiError;
use crate::users::repo_types::{User, UserPatch};

impl User {
    /// Insert a new user, returning the stored row with the
    /// server-assigned id and timestamps.
    pub async fn insert(
        db: &PgPool,
        name: &str,
        surname: &str,
        password_hash: &str,
    ) -> Result<User, ApiError> {
        let mut tx = db.begin().await?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, surname, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, surname, password, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(surname)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(conflict_or_db)?;
        tx.commit().await?;
        Ok(user)
    }

    /// Point lookup; absence is `None`, not an error.
    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, surname, password, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// One page of users, ordered by id. Bounds are the caller's
    /// responsibility.
    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<User>, ApiError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, surname, password, created_at, updated_at
            FROM users
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Apply a patch to an existing row inside one transaction. Returns
    /// `None` when the id does not exist. `updated_at` is refreshed by
    /// the store, not the caller.
    pub async fn update(
        db: &PgPool,
        id: i64,
        patch: &UserPatch,
    ) -> Result<Option<User>, ApiError> {
        let mut tx = db.begin().await?;

        let Some(current) = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, surname, password, created_at, updated_at
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        let next = patch.apply(current);

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, surname = $3, password = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, name, surname, password, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&next.name)
        .bind(&next.surname)
        .bind(&next.password)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(user))
    }

    /// Delete by id, reporting whether a row existed. Deleting a missing
    /// id is not an error at this layer.
    pub async fn delete(db: &PgPool, id: i64) -> Result<bool, ApiError> {
        let mut tx = db.begin().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

fn conflict_or_db(e: sqlx::Error) -> ApiError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ApiError::Conflict(db_err.to_string())
        }
        _ => ApiError::Database(e),
    }
}
