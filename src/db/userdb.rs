use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::{User, VipTier};

const USER_COLUMNS: &str = r#"
    id, username, email, password, role,
    vip_tier, vip_expiry, is_public_profile,
    favorite_teams, is_active,
    created_at, updated_at
"#;

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    /// Creates a user. The very first row ever inserted becomes the
    /// bootstrap admin; the decision is made inside the INSERT itself and a
    /// partial unique index guarantees at most one such row even under
    /// concurrent registration.
    async fn save_user<T: Into<String> + Send>(
        &self,
        username: T,
        email: T,
        password: T,
    ) -> Result<User, sqlx::Error>;

    async fn add_favorite_team(&self, user_id: Uuid, team: &str) -> Result<User, sqlx::Error>;

    async fn remove_favorite_team(&self, user_id: Uuid, team: &str) -> Result<User, sqlx::Error>;

    /// Writes subscription state directly. Payment confirmation goes through
    /// its own transactional path; this one backs the admin toggle.
    async fn set_vip_status(
        &self,
        user_id: Uuid,
        tier: VipTier,
        expiry: Option<DateTime<Utc>>,
        public_profile: Option<bool>,
    ) -> Result<Option<User>, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::uuid IS NOT NULL AND id = $1)
               OR ($2::text IS NOT NULL AND username = $2)
               OR ($3::text IS NOT NULL AND email = $3)
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_user<T: Into<String> + Send>(
        &self,
        username: T,
        email: T,
        password: T,
    ) -> Result<User, sqlx::Error> {
        let username = username.into();
        let email = email.into();
        let password = password.into();

        let insert = |bootstrap: bool| {
            let query = if bootstrap {
                format!(
                    r#"
                    INSERT INTO users (username, email, password, role, bootstrap_admin)
                    SELECT $1, $2, $3,
                           CASE WHEN (SELECT count(*) FROM users) = 0
                                THEN 'admin'::user_role ELSE 'user'::user_role END,
                           (SELECT count(*) FROM users) = 0
                    RETURNING {USER_COLUMNS}
                    "#
                )
            } else {
                format!(
                    r#"
                    INSERT INTO users (username, email, password, role, bootstrap_admin)
                    VALUES ($1, $2, $3, 'user'::user_role, false)
                    RETURNING {USER_COLUMNS}
                    "#
                )
            };
            query
        };

        let result = sqlx::query_as::<_, User>(&insert(true))
            .bind(&username)
            .bind(&email)
            .bind(&password)
            .fetch_one(&self.pool)
            .await;

        match result {
            // Two registrations racing for the bootstrap slot: the loser of
            // the unique index retries as a plain user.
            Err(sqlx::Error::Database(ref db_err))
                if db_err.constraint() == Some("users_single_bootstrap_admin") =>
            {
                sqlx::query_as::<_, User>(&insert(false))
                    .bind(&username)
                    .bind(&email)
                    .bind(&password)
                    .fetch_one(&self.pool)
                    .await
            }
            other => other,
        }
    }

    async fn add_favorite_team(&self, user_id: Uuid, team: &str) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET favorite_teams = CASE
                    WHEN $2 = ANY(favorite_teams) THEN favorite_teams
                    ELSE array_append(favorite_teams, $2)
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(team)
        .fetch_one(&self.pool)
        .await
    }

    async fn remove_favorite_team(&self, user_id: Uuid, team: &str) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET favorite_teams = array_remove(favorite_teams, $2),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(team)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_vip_status(
        &self,
        user_id: Uuid,
        tier: VipTier,
        expiry: Option<DateTime<Utc>>,
        public_profile: Option<bool>,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET vip_tier = $2,
                vip_expiry = $3,
                is_public_profile = COALESCE($4, is_public_profile),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(tier)
        .bind(expiry)
        .bind(public_profile)
        .fetch_optional(&self.pool)
        .await
    }
}
