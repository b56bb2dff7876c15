use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::matchdb::{MatchExt, MatchRecord, PredictionRecord},
    dtos::matchdtos::*,
    error::HttpError,
    middleware::{role_check, JWTAuthMiddleware},
    models::{
        matchmodel::{PredictionType, Visibility},
        usermodel::{UserRole, VipTier},
    },
    service::{
        predictions::{
            calculate_match_probabilities, generate_mock_odds, random_strength, BookmakerOdds,
            MatchProbabilities,
        },
        tier,
    },
    AppState,
};

pub fn matches_handler() -> Router {
    Router::new()
        .route("/", get(list_matches))
        .route(
            "/",
            post(create_match).route_layer(middleware::from_fn(|req, next| {
                role_check(req, next, vec![UserRole::Admin])
            })),
        )
        .route(
            "/admin",
            get(all_matches).route_layer(middleware::from_fn(|req, next| {
                role_check(req, next, vec![UserRole::Admin])
            })),
        )
        .route(
            "/:match_id",
            put(update_match)
                .delete(delete_match)
                .route_layer(middleware::from_fn(|req, next| {
                    role_check(req, next, vec![UserRole::Admin])
                })),
        )
        .route(
            "/:match_id/prediction",
            post(add_prediction).route_layer(middleware::from_fn(|req, next| {
                role_check(req, next, vec![UserRole::Admin])
            })),
        )
}

/// Combines the separate date (`YYYY-MM-DD`) and time (`HH:MM`) fields into
/// a UTC kick-off timestamp.
fn parse_kickoff(date: &str, time: &str) -> Result<DateTime<Utc>, HttpError> {
    let naive = NaiveDateTime::parse_from_str(&format!("{}T{}", date, time), "%Y-%m-%dT%H:%M")
        .map_err(|_| HttpError::bad_request("Invalid date or time format"))?;
    Ok(DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn parse_game_tier(raw: Option<&str>) -> Result<VipTier, HttpError> {
    match raw.unwrap_or("none") {
        "none" => Ok(VipTier::None),
        "vip" => Ok(VipTier::Vip),
        "vvip" => Ok(VipTier::Vvip),
        other => Err(HttpError::bad_request(format!(
            "Invalid game tier: {}",
            other
        ))),
    }
}

/// Maps one incoming prediction to its insert payload. When the caller did
/// not flag the value bet themselves, win-market picks are run through the
/// value model (only available at match creation, when odds and strengths
/// are being generated).
fn build_prediction_record(
    input: &PredictionInputDto,
    value_model: Option<(&BookmakerOdds, &MatchProbabilities)>,
) -> Result<PredictionRecord, HttpError> {
    let kind = PredictionType::from_str_opt(&input.kind).ok_or_else(|| {
        HttpError::bad_request(format!("Invalid prediction type: {}", input.kind))
    })?;

    let visibility = match input.visibility.as_deref() {
        Some(raw) => Visibility::from_str_opt(raw)
            .ok_or_else(|| HttpError::bad_request(format!("Invalid visibility: {}", raw)))?,
        None => Visibility::All,
    };

    let value_bet = match (input.value_bet, value_model) {
        (Some(flag), _) => flag,
        (None, Some((odds, probs))) => {
            kind == PredictionType::Win
                && crate::service::predictions::is_value_bet(&input.prediction, odds, probs)
        }
        (None, None) => false,
    };

    Ok(PredictionRecord {
        kind,
        prediction: input.prediction.to_owned(),
        confidence: input.confidence,
        visibility,
        value_bet,
        odds: input.odds,
    })
}

/// Fixtures visible to the requester. The match-level tier gate runs in the
/// query; the per-prediction filter runs here, and matches left with no
/// visible predictions are dropped.
pub async fn list_matches(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let requester_tier =
        tier::effective_tier(user.user.vip_tier, user.user.vip_expiry, Utc::now());

    let matches = app_state
        .db_client
        .get_matches_for_tier(requester_tier)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let visible = tier::filter_visible_matches(matches, requester_tier);

    let response: Vec<MatchResponseDto> = visible
        .iter()
        .map(|(m, predictions)| MatchResponseDto::from_match(m, predictions))
        .collect();

    Ok(Json(response))
}

pub async fn create_match(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateMatchDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if body.predictions.is_empty() {
        return Err(HttpError::bad_request(
            "At least one prediction is required",
        ));
    }

    let date = parse_kickoff(&body.date, &body.time)?;
    let game_tier = parse_game_tier(body.game_tier.as_deref())?;

    let home_strength = random_strength();
    let away_strength = random_strength();
    let probabilities = calculate_match_probabilities(home_strength, away_strength);

    let odds = match &body.odds {
        Some(given) => BookmakerOdds {
            home: given.home,
            draw: given.draw,
            away: given.away,
        },
        None => generate_mock_odds(),
    };

    let predictions = body
        .predictions
        .iter()
        .map(|input| build_prediction_record(input, Some((&odds, &probabilities))))
        .collect::<Result<Vec<PredictionRecord>, HttpError>>()?;

    let record = MatchRecord {
        home_team: body.home_team,
        away_team: body.away_team,
        league: body.league,
        date,
        game_tier,
        home_strength,
        away_strength,
        odds_home: odds.home,
        odds_draw: odds.draw,
        odds_away: odds.away,
        predictions,
    };

    let (created, created_predictions) = app_state
        .db_client
        .create_match(record)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!(
        "match created: {} vs {} ({})",
        created.home_team,
        created.away_team,
        created.game_tier.to_str()
    );

    Ok((
        StatusCode::CREATED,
        Json(MatchMutationResponseDto {
            message: "Match created successfully".to_string(),
            match_data: MatchResponseDto::from_match(&created, &created_predictions),
        }),
    ))
}

/// Admin view: every match with every prediction, no tier filtering.
pub async fn all_matches(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let matches = app_state
        .db_client
        .get_all_matches()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: Vec<MatchResponseDto> = matches
        .iter()
        .map(|(m, predictions)| MatchResponseDto::from_match(m, predictions))
        .collect();

    Ok(Json(response))
}

pub async fn update_match(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(match_id): Path<Uuid>,
    Json(body): Json<UpdateMatchDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let date = parse_kickoff(&body.date, &body.time)?;
    let game_tier = parse_game_tier(body.game_tier.as_deref())?;

    let predictions = match &body.predictions {
        Some(inputs) => Some(
            inputs
                .iter()
                .map(|input| build_prediction_record(input, None))
                .collect::<Result<Vec<PredictionRecord>, HttpError>>()?,
        ),
        None => None,
    };

    let updated = app_state
        .db_client
        .update_match(
            match_id,
            &body.home_team,
            &body.away_team,
            &body.league,
            date,
            game_tier,
            predictions,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let (updated, updated_predictions) =
        updated.ok_or_else(|| HttpError::not_found("Match not found"))?;

    Ok(Json(MatchMutationResponseDto {
        message: "Match updated successfully".to_string(),
        match_data: MatchResponseDto::from_match(&updated, &updated_predictions),
    }))
}

pub async fn delete_match(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(match_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state
        .db_client
        .delete_match(match_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if deleted.is_none() {
        return Err(HttpError::not_found("Match not found"));
    }

    Ok(Json(json!({ "message": "Match deleted successfully" })))
}

pub async fn add_prediction(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(match_id): Path<Uuid>,
    Json(body): Json<PredictionInputDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let record = build_prediction_record(&body, None)?;

    let prediction = app_state
        .db_client
        .add_prediction(match_id, record)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let prediction = prediction.ok_or_else(|| HttpError::not_found("Match not found"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Prediction added successfully",
            "prediction": PredictionDto::from_prediction(&prediction),
        })),
    ))
}
