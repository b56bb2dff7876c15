use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::matchmodel::{Match, Prediction};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct PredictionInputDto {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Prediction type is required"))]
    pub kind: String,

    #[validate(length(min = 1, message = "Prediction text is required"))]
    pub prediction: String,

    #[validate(range(min = 0, max = 100, message = "Confidence must be a number between 0 and 100"))]
    pub confidence: i32,

    #[serde(rename = "valueBet")]
    pub value_bet: Option<bool>,

    pub visibility: Option<String>,

    pub odds: Option<f64>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct OddsDto {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateMatchDto {
    #[serde(rename = "homeTeam")]
    #[validate(length(min = 1, message = "Home team is required"))]
    pub home_team: String,

    #[serde(rename = "awayTeam")]
    #[validate(length(min = 1, message = "Away team is required"))]
    pub away_team: String,

    #[validate(length(min = 1, message = "League is required"))]
    pub league: String,

    /// Calendar date, `YYYY-MM-DD`.
    #[validate(length(min = 1, message = "Date is required"))]
    pub date: String,

    /// Kick-off time, `HH:MM`.
    #[validate(length(min = 1, message = "Time is required"))]
    pub time: String,

    #[validate]
    pub predictions: Vec<PredictionInputDto>,

    pub odds: Option<OddsDto>,

    #[serde(rename = "gameTier")]
    pub game_tier: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateMatchDto {
    #[serde(rename = "homeTeam")]
    #[validate(length(min = 1, message = "Home team is required"))]
    pub home_team: String,

    #[serde(rename = "awayTeam")]
    #[validate(length(min = 1, message = "Away team is required"))]
    pub away_team: String,

    #[validate(length(min = 1, message = "League is required"))]
    pub league: String,

    #[validate(length(min = 1, message = "Date is required"))]
    pub date: String,

    #[validate(length(min = 1, message = "Time is required"))]
    pub time: String,

    /// When present, replaces the match's prediction list wholesale.
    #[validate]
    pub predictions: Option<Vec<PredictionInputDto>>,

    #[serde(rename = "gameTier")]
    pub game_tier: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamDto {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompetitionDto {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionDto {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub prediction: String,
    pub confidence: i32,
    #[serde(rename = "valueBet")]
    pub value_bet: bool,
    pub visibility: String,
    pub odds: Option<f64>,
}

impl PredictionDto {
    pub fn from_prediction(prediction: &Prediction) -> Self {
        PredictionDto {
            id: prediction.id.to_string(),
            kind: prediction.kind.to_str().to_string(),
            prediction: prediction.prediction.to_owned(),
            confidence: prediction.confidence,
            value_bet: prediction.value_bet,
            visibility: prediction.visibility.to_str().to_string(),
            odds: prediction.odds,
        }
    }
}

/// Fixture shape the frontend consumes: nested team/competition objects and
/// an ISO-8601 kick-off timestamp.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponseDto {
    pub id: String,
    #[serde(rename = "utcDate")]
    pub utc_date: DateTime<Utc>,
    #[serde(rename = "homeTeam")]
    pub home_team: TeamDto,
    #[serde(rename = "awayTeam")]
    pub away_team: TeamDto,
    pub competition: CompetitionDto,
    pub predictions: Vec<PredictionDto>,
    #[serde(rename = "bookmakerOdds")]
    pub bookmaker_odds: OddsDto,
    #[serde(rename = "gameTier")]
    pub game_tier: String,
    #[serde(rename = "homeGoals", skip_serializing_if = "Option::is_none")]
    pub home_goals: Option<i32>,
    #[serde(rename = "awayGoals", skip_serializing_if = "Option::is_none")]
    pub away_goals: Option<i32>,
}

impl MatchResponseDto {
    pub fn from_match(m: &Match, predictions: &[Prediction]) -> Self {
        MatchResponseDto {
            id: m.id.to_string(),
            utc_date: m.date,
            home_team: TeamDto {
                name: m.home_team.to_owned(),
            },
            away_team: TeamDto {
                name: m.away_team.to_owned(),
            },
            competition: CompetitionDto {
                name: m.league.to_owned(),
            },
            predictions: predictions.iter().map(PredictionDto::from_prediction).collect(),
            bookmaker_odds: OddsDto {
                home: m.odds_home,
                draw: m.odds_draw,
                away: m.odds_away,
            },
            game_tier: m.game_tier.to_str().to_string(),
            home_goals: m.home_goals,
            away_goals: m.away_goals,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchMutationResponseDto {
    pub message: String,
    #[serde(rename = "match")]
    pub match_data: MatchResponseDto,
}
