use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::models::usermodel::{User, VipTier};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(
        length(min = 3, max = 30, message = "Username must be between 3 and 30 characters"),
        custom = "validate_username"
    )]
    pub username: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 8, message = "Password must be at least 8 characters long")
    )]
    pub password: String,
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_username");
        error.message = Some(Cow::from(
            "Username can only contain letters, numbers, and underscores",
        ));
        Err(error)
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct FavoriteTeamDto {
    #[serde(rename = "teamName")]
    #[validate(length(min = 1, max = 100, message = "Team name is required"))]
    pub team_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(rename = "vipTier")]
    pub vip_tier: VipTier,
    #[serde(rename = "vipExpiry")]
    pub vip_expiry: Option<DateTime<Utc>>,
    #[serde(rename = "isPublicProfile")]
    pub is_public_profile: bool,
    #[serde(rename = "favoriteTeams")]
    pub favorite_teams: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            username: user.username.to_owned(),
            email: user.email.to_owned(),
            role: user.role.to_str().to_string(),
            vip_tier: user.vip_tier,
            vip_expiry: user.vip_expiry,
            is_public_profile: user.is_public_profile,
            favorite_teams: user.favorite_teams.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FavoriteTeamsResponseDto {
    #[serde(rename = "favoriteTeams")]
    pub favorite_teams: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}
