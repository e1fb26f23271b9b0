use sqlx::PgPool;
use uuid::Uuid;

/// One persisted value for a client under a fixed key
#[derive(sqlx::FromRow)]
pub struct ClientState {
    pub client_id: Uuid,
    pub key: String,
    pub value: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ClientState {
    pub async fn find(pool: &PgPool, client_id: Uuid, key: &str) -> Result<Option<Self>, sqlx::Error> {
        let state = sqlx::query_as::<_, ClientState>(
            r#"
            SELECT client_id, key, value, updated_at
            FROM client_state
            WHERE client_id = $1 AND key = $2
            "#,
        )
        .bind(client_id)
        .bind(key)
        .fetch_optional(pool)
        .await?;

        Ok(state)
    }

    pub async fn upsert(
        pool: &PgPool,
        client_id: Uuid,
        key: &str,
        value: &str,
    ) -> Result<Self, sqlx::Error> {
        let state = sqlx::query_as::<_, ClientState>(
            r#"
            INSERT INTO client_state (client_id, key, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (client_id, key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            RETURNING client_id, key, value, updated_at
            "#,
        )
        .bind(client_id)
        .bind(key)
        .bind(value)
        .fetch_one(pool)
        .await?;

        Ok(state)
    }

    pub async fn delete(pool: &PgPool, client_id: Uuid, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM client_state WHERE client_id = $1 AND key = $2
            "#,
        )
        .bind(client_id)
        .bind(key)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
