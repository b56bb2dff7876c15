use chrono::{DateTime, Utc};

use crate::models::{
    matchmodel::{Match, Prediction, Visibility},
    usermodel::VipTier,
};

/// Resolves the tier a user actually holds right now.
///
/// Expiry is a read-time predicate, not a write-time event: the stored tier
/// is never swept by a background job, so an expired subscriber simply
/// resolves to `None` here on every access.
pub fn effective_tier(
    vip_tier: VipTier,
    vip_expiry: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> VipTier {
    match vip_expiry {
        Some(expiry) if expiry < now => VipTier::None,
        _ => vip_tier,
    }
}

/// The exact visibility policy table. Total over both enums; there is no
/// implicit allow or deny.
pub fn is_prediction_visible(tier: VipTier, visibility: Visibility) -> bool {
    match visibility {
        Visibility::All => true,
        Visibility::Vip | Visibility::Both => tier == VipTier::Vip || tier == VipTier::Vvip,
        Visibility::Vvip => tier == VipTier::Vvip,
    }
}

/// Policy over the raw stored tag. Anything that does not parse to a known
/// visibility value is hidden from every tier.
pub fn is_raw_tag_visible(tier: VipTier, tag: &str) -> bool {
    let visibility = match tag {
        "all" => Visibility::All,
        "vip" => Visibility::Vip,
        "vvip" => Visibility::Vvip,
        "both" => Visibility::Both,
        _ => return false,
    };
    is_prediction_visible(tier, visibility)
}

/// Game tiers accessible to a requester, used to gate the match-level query
/// before anything is fetched. The accessible set is cumulative:
/// none ⊂ vip ⊂ vvip.
pub fn accessible_game_tiers(tier: VipTier) -> &'static [VipTier] {
    match tier {
        VipTier::None => &[VipTier::None],
        VipTier::Vip => &[VipTier::None, VipTier::Vip],
        VipTier::Vvip => &[VipTier::None, VipTier::Vip, VipTier::Vvip],
    }
}

/// Per-prediction filter applied after the match-level gate. A match whose
/// filtered prediction list comes back empty must be dropped from the result
/// set entirely, never returned with an empty list.
pub fn filter_visible_matches(
    matches: Vec<(Match, Vec<Prediction>)>,
    tier: VipTier,
) -> Vec<(Match, Vec<Prediction>)> {
    matches
        .into_iter()
        .filter_map(|(m, predictions)| {
            let visible: Vec<Prediction> = predictions
                .into_iter()
                .filter(|p| is_prediction_visible(tier, p.visibility))
                .collect();

            if visible.is_empty() {
                None
            } else {
                Some((m, visible))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::matchmodel::PredictionType;
    use chrono::Duration;
    use uuid::Uuid;

    fn fixture(game_tier: VipTier) -> Match {
        Match {
            id: Uuid::new_v4(),
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            league: "Premier League".to_string(),
            date: Utc::now() + Duration::days(1),
            game_tier,
            home_strength: 55,
            away_strength: 48,
            odds_home: 2.1,
            odds_draw: 3.2,
            odds_away: 3.0,
            home_goals: None,
            away_goals: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn prediction(match_id: Uuid, visibility: Visibility) -> Prediction {
        Prediction {
            id: Uuid::new_v4(),
            match_id,
            kind: PredictionType::Win,
            prediction: "Home win".to_string(),
            confidence: 70,
            visibility,
            value_bet: false,
            odds: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn visibility_table_is_exhaustive() {
        let cases = [
            (Visibility::All, [true, true, true]),
            (Visibility::Vip, [false, true, true]),
            (Visibility::Both, [false, true, true]),
            (Visibility::Vvip, [false, false, true]),
        ];

        for (visibility, expected) in cases {
            assert_eq!(
                is_prediction_visible(VipTier::None, visibility),
                expected[0],
                "none x {:?}",
                visibility
            );
            assert_eq!(
                is_prediction_visible(VipTier::Vip, visibility),
                expected[1],
                "vip x {:?}",
                visibility
            );
            assert_eq!(
                is_prediction_visible(VipTier::Vvip, visibility),
                expected[2],
                "vvip x {:?}",
                visibility
            );
        }
    }

    #[test]
    fn unrecognized_tag_is_hidden_from_everyone() {
        for tier in [VipTier::None, VipTier::Vip, VipTier::Vvip] {
            assert!(!is_raw_tag_visible(tier, "premium"));
            assert!(!is_raw_tag_visible(tier, ""));
        }
        assert!(is_raw_tag_visible(VipTier::None, "all"));
        assert!(!is_raw_tag_visible(VipTier::Vip, "vvip"));
    }

    #[test]
    fn accessible_sets_are_cumulative() {
        assert_eq!(accessible_game_tiers(VipTier::None), &[VipTier::None]);
        assert_eq!(
            accessible_game_tiers(VipTier::Vip),
            &[VipTier::None, VipTier::Vip]
        );
        assert_eq!(
            accessible_game_tiers(VipTier::Vvip),
            &[VipTier::None, VipTier::Vip, VipTier::Vvip]
        );
    }

    #[test]
    fn expired_subscription_resolves_to_none() {
        let now = Utc::now();
        let tier = effective_tier(VipTier::Vip, Some(now - Duration::days(1)), now);
        assert_eq!(tier, VipTier::None);
    }

    #[test]
    fn live_and_open_ended_subscriptions_keep_their_tier() {
        let now = Utc::now();
        assert_eq!(
            effective_tier(VipTier::Vvip, Some(now + Duration::days(30)), now),
            VipTier::Vvip
        );
        assert_eq!(effective_tier(VipTier::Vip, None, now), VipTier::Vip);
    }

    #[test]
    fn vvip_only_match_is_elided_for_free_users() {
        let m = fixture(VipTier::None);
        let preds = vec![prediction(m.id, Visibility::Vvip)];

        let for_none = filter_visible_matches(vec![(m.clone(), preds.clone())], VipTier::None);
        assert!(for_none.is_empty());

        let for_vvip = filter_visible_matches(vec![(m, preds)], VipTier::Vvip);
        assert_eq!(for_vvip.len(), 1);
        assert_eq!(for_vvip[0].1.len(), 1);
    }

    #[test]
    fn mixed_visibility_match_is_partially_filtered_for_vip() {
        let m = fixture(VipTier::None);
        let preds = vec![
            prediction(m.id, Visibility::All),
            prediction(m.id, Visibility::Vvip),
        ];

        let for_vip = filter_visible_matches(vec![(m, preds)], VipTier::Vip);
        assert_eq!(for_vip.len(), 1);
        assert_eq!(for_vip[0].1.len(), 1);
        assert_eq!(for_vip[0].1[0].visibility, Visibility::All);
    }
}
