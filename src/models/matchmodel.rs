use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::usermodel::VipTier;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "prediction_type", rename_all = "snake_case")]
#[serde(rename_all = "lowercase")]
pub enum PredictionType {
    Win,
    Over15,
    Over25,
    Over35,
    Corners,
    Ggng,
    Others,
    Player,
}

impl PredictionType {
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "win" => Some(PredictionType::Win),
            "over15" => Some(PredictionType::Over15),
            "over25" => Some(PredictionType::Over25),
            "over35" => Some(PredictionType::Over35),
            "corners" => Some(PredictionType::Corners),
            "ggng" => Some(PredictionType::Ggng),
            "others" => Some(PredictionType::Others),
            "player" => Some(PredictionType::Player),
            _ => None,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            PredictionType::Win => "win",
            PredictionType::Over15 => "over15",
            PredictionType::Over25 => "over25",
            PredictionType::Over35 => "over35",
            PredictionType::Corners => "corners",
            PredictionType::Ggng => "ggng",
            PredictionType::Others => "others",
            PredictionType::Player => "player",
        }
    }
}

/// Per-prediction visibility tag. `Both` is kept for historical data and is
/// equivalent to `Vip` (visible to vip and vvip subscribers).
#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "prediction_visibility", rename_all = "snake_case")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    All,
    Vip,
    Vvip,
    Both,
}

impl Visibility {
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Visibility::All),
            "vip" => Some(Visibility::Vip),
            "vvip" => Some(Visibility::Vvip),
            "both" => Some(Visibility::Both),
            _ => None,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Visibility::All => "all",
            Visibility::Vip => "vip",
            Visibility::Vvip => "vvip",
            Visibility::Both => "both",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Match {
    pub id: Uuid,
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    pub date: DateTime<Utc>,

    // Gate on the fixture as a whole; individual predictions carry their own
    // visibility on top of this.
    pub game_tier: VipTier,

    pub home_strength: i32,
    pub away_strength: i32,
    pub odds_home: f64,
    pub odds_draw: f64,
    pub odds_away: f64,

    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Prediction {
    pub id: Uuid,
    pub match_id: Uuid,
    #[serde(rename = "type")]
    pub kind: PredictionType,
    pub prediction: String,
    pub confidence: i32,
    pub visibility: Visibility,
    pub value_bet: bool,
    pub odds: Option<f64>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
