use super::kv::KeyValueStore;
use super::schema::Database;
use super::types::StoreError;

impl Database {
    // ========================================================================
    // Key-Value Operations
    // ========================================================================

    /// Get a stored value by key, or `None` if the key was never written.
    pub async fn get_preference(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM user_preferences WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Insert or replace a value (UPSERT), refreshing its timestamp.
    pub async fn set_preference(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl KeyValueStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.get_preference(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_preference(key, value).await
    }
}
