use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

/// Subscription level gating content visibility: none < vip < vvip.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "vip_tier", rename_all = "snake_case")]
#[serde(rename_all = "lowercase")]
pub enum VipTier {
    None,
    Vip,
    Vvip,
}

impl VipTier {
    pub fn to_str(&self) -> &str {
        match self {
            VipTier::None => "none",
            VipTier::Vip => "vip",
            VipTier::Vvip => "vvip",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: uuid::Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,

    // The stored tier is only meaningful together with vip_expiry: a tier
    // whose expiry lies in the past counts as none at read time (there is
    // no background sweep).
    pub vip_tier: VipTier,
    pub vip_expiry: Option<DateTime<Utc>>,
    pub is_public_profile: bool,

    pub favorite_teams: Vec<String>,
    pub is_active: bool,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
