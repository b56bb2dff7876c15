use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::{
    matchmodel::{Match, Prediction, PredictionType, Visibility},
    usermodel::VipTier,
};

const MATCH_COLUMNS: &str = r#"
    id, home_team, away_team, league, date, game_tier,
    home_strength, away_strength, odds_home, odds_draw, odds_away,
    home_goals, away_goals, created_at, updated_at
"#;

const PREDICTION_COLUMNS: &str = r#"
    id, match_id, kind, prediction, confidence, visibility, value_bet, odds, created_at
"#;

/// Insert payload for one prediction row.
#[derive(Debug, Clone)]
pub struct PredictionRecord {
    pub kind: PredictionType,
    pub prediction: String,
    pub confidence: i32,
    pub visibility: Visibility,
    pub value_bet: bool,
    pub odds: Option<f64>,
}

/// Insert payload for a match with its predictions.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    pub date: DateTime<Utc>,
    pub game_tier: VipTier,
    pub home_strength: i32,
    pub away_strength: i32,
    pub odds_home: f64,
    pub odds_draw: f64,
    pub odds_away: f64,
    pub predictions: Vec<PredictionRecord>,
}

#[async_trait]
pub trait MatchExt {
    async fn create_match(
        &self,
        record: MatchRecord,
    ) -> Result<(Match, Vec<Prediction>), sqlx::Error>;

    /// Fixtures a requester of the given tier may fetch at all, oldest
    /// first, restricted to matches that have at least one prediction. The
    /// per-prediction visibility filter is applied by the caller on top.
    async fn get_matches_for_tier(
        &self,
        tier: VipTier,
    ) -> Result<Vec<(Match, Vec<Prediction>)>, sqlx::Error>;

    /// Every match regardless of tier, newest first. Admin view.
    async fn get_all_matches(&self) -> Result<Vec<(Match, Vec<Prediction>)>, sqlx::Error>;

    async fn update_match(
        &self,
        match_id: Uuid,
        home_team: &str,
        away_team: &str,
        league: &str,
        date: DateTime<Utc>,
        game_tier: VipTier,
        predictions: Option<Vec<PredictionRecord>>,
    ) -> Result<Option<(Match, Vec<Prediction>)>, sqlx::Error>;

    async fn delete_match(&self, match_id: Uuid) -> Result<Option<Match>, sqlx::Error>;

    async fn add_prediction(
        &self,
        match_id: Uuid,
        record: PredictionRecord,
    ) -> Result<Option<Prediction>, sqlx::Error>;
}

impl DBClient {
    async fn predictions_for(
        &self,
        match_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Prediction>>, sqlx::Error> {
        if match_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, Prediction>(&format!(
            r#"
            SELECT {PREDICTION_COLUMNS}
            FROM predictions
            WHERE match_id = ANY($1)
            ORDER BY created_at, id
            "#
        ))
        .bind(match_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<Prediction>> = HashMap::new();
        for row in rows {
            grouped.entry(row.match_id).or_default().push(row);
        }
        Ok(grouped)
    }

    async fn with_predictions(
        &self,
        matches: Vec<Match>,
    ) -> Result<Vec<(Match, Vec<Prediction>)>, sqlx::Error> {
        let ids: Vec<Uuid> = matches.iter().map(|m| m.id).collect();
        let mut grouped = self.predictions_for(&ids).await?;

        Ok(matches
            .into_iter()
            .map(|m| {
                let predictions = grouped.remove(&m.id).unwrap_or_default();
                (m, predictions)
            })
            .collect())
    }
}

async fn insert_prediction_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    match_id: Uuid,
    record: &PredictionRecord,
) -> Result<Prediction, sqlx::Error> {
    sqlx::query_as::<_, Prediction>(&format!(
        r#"
        INSERT INTO predictions (match_id, kind, prediction, confidence, visibility, value_bet, odds)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {PREDICTION_COLUMNS}
        "#
    ))
    .bind(match_id)
    .bind(record.kind)
    .bind(&record.prediction)
    .bind(record.confidence)
    .bind(record.visibility)
    .bind(record.value_bet)
    .bind(record.odds)
    .fetch_one(&mut **tx)
    .await
}

#[async_trait]
impl MatchExt for DBClient {
    async fn create_match(
        &self,
        record: MatchRecord,
    ) -> Result<(Match, Vec<Prediction>), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Match>(&format!(
            r#"
            INSERT INTO matches (home_team, away_team, league, date, game_tier,
                                 home_strength, away_strength, odds_home, odds_draw, odds_away)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {MATCH_COLUMNS}
            "#
        ))
        .bind(&record.home_team)
        .bind(&record.away_team)
        .bind(&record.league)
        .bind(record.date)
        .bind(record.game_tier)
        .bind(record.home_strength)
        .bind(record.away_strength)
        .bind(record.odds_home)
        .bind(record.odds_draw)
        .bind(record.odds_away)
        .fetch_one(&mut *tx)
        .await?;

        let mut predictions = Vec::with_capacity(record.predictions.len());
        for prediction in &record.predictions {
            predictions.push(insert_prediction_tx(&mut tx, created.id, prediction).await?);
        }

        tx.commit().await?;
        Ok((created, predictions))
    }

    async fn get_matches_for_tier(
        &self,
        tier: VipTier,
    ) -> Result<Vec<(Match, Vec<Prediction>)>, sqlx::Error> {
        // The match-level gate runs before anything is fetched; it keeps
        // tier-restricted fixtures out of the result set entirely rather
        // than relying on the per-prediction filter alone.
        let tier_clause = match tier {
            VipTier::None => "AND game_tier = 'none'",
            VipTier::Vip => "AND game_tier IN ('none', 'vip')",
            VipTier::Vvip => "",
        };

        let matches = sqlx::query_as::<_, Match>(&format!(
            r#"
            SELECT {MATCH_COLUMNS}
            FROM matches m
            WHERE EXISTS (SELECT 1 FROM predictions p WHERE p.match_id = m.id)
            {tier_clause}
            ORDER BY date ASC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        self.with_predictions(matches).await
    }

    async fn get_all_matches(&self) -> Result<Vec<(Match, Vec<Prediction>)>, sqlx::Error> {
        let matches = sqlx::query_as::<_, Match>(&format!(
            r#"
            SELECT {MATCH_COLUMNS}
            FROM matches
            ORDER BY date DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        self.with_predictions(matches).await
    }

    async fn update_match(
        &self,
        match_id: Uuid,
        home_team: &str,
        away_team: &str,
        league: &str,
        date: DateTime<Utc>,
        game_tier: VipTier,
        predictions: Option<Vec<PredictionRecord>>,
    ) -> Result<Option<(Match, Vec<Prediction>)>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Match>(&format!(
            r#"
            UPDATE matches
            SET home_team = $2,
                away_team = $3,
                league = $4,
                date = $5,
                game_tier = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {MATCH_COLUMNS}
            "#
        ))
        .bind(match_id)
        .bind(home_team)
        .bind(away_team)
        .bind(league)
        .bind(date)
        .bind(game_tier)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        let predictions = match predictions {
            Some(replacement) => {
                sqlx::query("DELETE FROM predictions WHERE match_id = $1")
                    .bind(match_id)
                    .execute(&mut *tx)
                    .await?;

                let mut inserted = Vec::with_capacity(replacement.len());
                for prediction in &replacement {
                    inserted.push(insert_prediction_tx(&mut tx, match_id, prediction).await?);
                }
                inserted
            }
            None => {
                sqlx::query_as::<_, Prediction>(&format!(
                    r#"
                    SELECT {PREDICTION_COLUMNS}
                    FROM predictions
                    WHERE match_id = $1
                    ORDER BY created_at, id
                    "#
                ))
                .bind(match_id)
                .fetch_all(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;
        Ok(Some((updated, predictions)))
    }

    async fn delete_match(&self, match_id: Uuid) -> Result<Option<Match>, sqlx::Error> {
        sqlx::query_as::<_, Match>(&format!(
            r#"
            DELETE FROM matches
            WHERE id = $1
            RETURNING {MATCH_COLUMNS}
            "#
        ))
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn add_prediction(
        &self,
        match_id: Uuid,
        record: PredictionRecord,
    ) -> Result<Option<Prediction>, sqlx::Error> {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM matches WHERE id = $1")
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Ok(None);
        }

        let mut tx = self.pool.begin().await?;
        let prediction = insert_prediction_tx(&mut tx, match_id, &record).await?;
        tx.commit().await?;

        Ok(Some(prediction))
    }
}
