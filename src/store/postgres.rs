//! PostgreSQL-backed profile store

use async_trait::async_trait;
use sqlx::PgPool;

use super::{ProfileStore, StoreResult};
use crate::domain::profiles::{Profile, ProfileFields, ProfileId};

/// Database row for profile
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    name: String,
    email: String,
    gender: String,
    age: i32,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            gender: row.gender,
            age: row.age,
        }
    }
}

#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_all(&self) -> StoreResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, name, email, gender, age FROM profiles ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn find_by_id(&self, id: ProfileId) -> StoreResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, name, email, gender, age FROM profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Profile::from))
    }

    async fn create(&self, fields: ProfileFields) -> StoreResult<Profile> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (name, email, gender, age)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, gender, age
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.gender)
        .bind(fields.age)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_by_id(
        &self,
        id: ProfileId,
        fields: ProfileFields,
    ) -> StoreResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE profiles SET
                name = $2,
                email = $3,
                gender = $4,
                age = $5
            WHERE id = $1
            RETURNING id, name, email, gender, age
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.gender)
        .bind(fields.age)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Profile::from))
    }

    async fn delete_by_id(&self, id: ProfileId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
