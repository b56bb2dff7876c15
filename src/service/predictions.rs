use rand::Rng;

/// Modeled outcome probabilities for a fixture, derived from the two team
/// strength values. Always sums to 1.
#[derive(Debug, Clone, Copy)]
pub struct MatchProbabilities {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct BookmakerOdds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

/// Team strength used by the prediction model, uniform in 30..=70.
pub fn random_strength() -> i32 {
    let mut rng = rand::rng();
    rng.random_range(30..=70)
}

pub fn calculate_match_probabilities(home_strength: i32, away_strength: i32) -> MatchProbabilities {
    let home = home_strength.max(1) as f64;
    let away = away_strength.max(1) as f64;

    // Evenly matched sides draw more often; the draw share shrinks linearly
    // with the strength gap and is floored so it never vanishes.
    let gap = (home - away).abs() / (home + away);
    let draw = (0.28 - 0.2 * gap).max(0.08);

    let rest = 1.0 - draw;
    let home_share = home / (home + away);

    MatchProbabilities {
        home: rest * home_share,
        draw,
        away: rest * (1.0 - home_share),
    }
}

pub fn generate_mock_odds() -> BookmakerOdds {
    let mut rng = rand::rng();
    BookmakerOdds {
        home: round2(rng.random_range(1.5..3.5)),
        draw: round2(rng.random_range(2.8..4.0)),
        away: round2(rng.random_range(1.5..3.5)),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// Minimum modeled edge over the bookmaker's implied probability before a
// pick is flagged as value.
const VALUE_MARGIN: f64 = 0.05;

/// Flags a win-market pick as a value bet when the modeled probability beats
/// the bookmaker's implied probability by more than the margin.
pub fn is_value_bet(prediction: &str, odds: &BookmakerOdds, probs: &MatchProbabilities) -> bool {
    let text = prediction.to_lowercase();

    let (modeled, quoted) = if text.contains("away") || text.contains('2') {
        (probs.away, odds.away)
    } else if text.contains("draw") || text.contains('x') {
        (probs.draw, odds.draw)
    } else {
        // Home win is the default reading of a win-market pick.
        (probs.home, odds.home)
    };

    if quoted <= 1.0 {
        return false;
    }

    let implied = 1.0 / quoted;
    modeled > implied + VALUE_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probabilities_sum_to_one() {
        for (h, a) in [(30, 70), (50, 50), (70, 30), (45, 62)] {
            let p = calculate_match_probabilities(h, a);
            assert!((p.home + p.draw + p.away - 1.0).abs() < 1e-9);
            assert!(p.home > 0.0 && p.draw > 0.0 && p.away > 0.0);
        }
    }

    #[test]
    fn stronger_home_side_gets_larger_share() {
        let p = calculate_match_probabilities(70, 30);
        assert!(p.home > p.away);

        let q = calculate_match_probabilities(30, 70);
        assert!(q.away > q.home);
    }

    #[test]
    fn evenly_matched_sides_draw_more() {
        let even = calculate_match_probabilities(50, 50);
        let lopsided = calculate_match_probabilities(70, 30);
        assert!(even.draw > lopsided.draw);
    }

    #[test]
    fn strengths_stay_in_model_range() {
        for _ in 0..100 {
            let s = random_strength();
            assert!((30..=70).contains(&s));
        }
    }

    #[test]
    fn value_bet_requires_modeled_edge() {
        let probs = MatchProbabilities {
            home: 0.60,
            draw: 0.25,
            away: 0.15,
        };

        // Quoted 2.5 implies 0.40; modeled 0.60 clears the margin.
        let generous = BookmakerOdds { home: 2.5, draw: 3.2, away: 5.0 };
        assert!(is_value_bet("Home win", &generous, &probs));

        // Quoted 1.6 implies 0.625; no edge on the home side.
        let tight = BookmakerOdds { home: 1.6, draw: 3.2, away: 5.0 };
        assert!(!is_value_bet("Home win", &tight, &probs));

        // Away side never has value here.
        assert!(!is_value_bet("Away win", &generous, &probs));
    }

    #[test]
    fn degenerate_odds_are_never_value() {
        let probs = calculate_match_probabilities(60, 40);
        let odds = BookmakerOdds { home: 1.0, draw: 1.0, away: 1.0 };
        assert!(!is_value_bet("Home win", &odds, &probs));
    }
}
