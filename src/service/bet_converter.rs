use regex::Regex;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Bookmaker {
    pub id: &'static str,
    pub name: &'static str,
    pub country: &'static str,
}

pub fn bookmakers() -> Vec<Bookmaker> {
    vec![
        Bookmaker { id: "bet9ja", name: "Bet9ja", country: "Nigeria" },
        Bookmaker { id: "sportybet", name: "SportyBet", country: "Nigeria" },
        Bookmaker { id: "betking", name: "BetKing", country: "Nigeria" },
        Bookmaker { id: "nairabet", name: "NairaBet", country: "Nigeria" },
        Bookmaker { id: "merrybet", name: "MerryBet", country: "Nigeria" },
        Bookmaker { id: "bet365", name: "Bet365", country: "International" },
        Bookmaker { id: "1xbet", name: "1xBet", country: "International" },
        Bookmaker { id: "betway", name: "Betway", country: "International" },
        Bookmaker { id: "pinnacle", name: "Pinnacle", country: "International" },
    ]
}

// Rewrite rules per bookmaker pair: each rule is applied in order to the
// incoming code. The rules only reshape prefixes and vendor markers; no
// semantic validation of the code happens here.
fn rewrite_rules(from: &str, to: &str) -> Option<Vec<(&'static str, &'static str)>> {
    let rules: Vec<(&'static str, &'static str)> = match (from, to) {
        ("bet9ja", "sportybet") => vec![("B9J", "SB"), ("^9", "S")],
        ("bet9ja", "betking") => vec![("B9J", "BK"), ("^9", "K")],
        ("bet9ja", "bet365") => vec![("^.", "B365")],
        ("sportybet", "bet9ja") => vec![("SB", "B9J"), ("^S", "9")],
        ("sportybet", "betking") => vec![("SB", "BK"), ("^S", "K")],
        ("sportybet", "bet365") => vec![("^.", "B365")],
        ("betking", "bet9ja") => vec![("BK", "B9J"), ("^K", "9")],
        ("betking", "sportybet") => vec![("BK", "SB"), ("^K", "S")],
        ("betking", "bet365") => vec![("^.", "B365")],
        ("bet365", "bet9ja") => vec![("^B365", "9")],
        ("bet365", "sportybet") => vec![("^B365", "S")],
        ("bet365", "betking") => vec![("^B365", "K")],
        _ => return None,
    };
    Some(rules)
}

/// Converts a booking code between bookmakers.
///
/// Registered pairs get their rewrite rules applied deterministically; an
/// unregistered pair passes the code through with a literal `_CONVERTED`
/// marker appended so the caller can tell no real mapping existed.
pub fn convert_booking_code(from_bookmaker: &str, to_bookmaker: &str, code: &str) -> String {
    let from = from_bookmaker.to_lowercase();
    let to = to_bookmaker.to_lowercase();

    match rewrite_rules(&from, &to) {
        Some(rules) => {
            let mut converted = code.to_string();
            for (pattern, replacement) in rules {
                if let Ok(re) = Regex::new(pattern) {
                    converted = re.replace_all(&converted, replacement).into_owned();
                }
            }
            converted
        }
        None => format!("{}_CONVERTED", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_pair_is_deterministic() {
        let a = convert_booking_code("bet9ja", "sportybet", "9AB9JCD");
        let b = convert_booking_code("bet9ja", "sportybet", "9AB9JCD");
        assert_eq!(a, b);
        // B9J -> SB first, then the leading 9 -> S.
        assert_eq!(a, "SASBCD");
    }

    #[test]
    fn bet365_prefix_roundtrip() {
        let converted = convert_booking_code("sportybet", "bet365", "S12345");
        assert_eq!(converted, "B36512345");

        let back = convert_booking_code("bet365", "sportybet", &converted);
        assert_eq!(back, "S12345");
    }

    #[test]
    fn unregistered_pair_gets_marker_suffix() {
        assert_eq!(
            convert_booking_code("betway", "pinnacle", "WX123"),
            "WX123_CONVERTED"
        );
        assert_eq!(
            convert_booking_code("nairabet", "bet9ja", "NB77"),
            "NB77_CONVERTED"
        );
    }

    #[test]
    fn bookmaker_names_are_case_insensitive() {
        assert_eq!(
            convert_booking_code("Bet9ja", "SportyBet", "9X"),
            convert_booking_code("bet9ja", "sportybet", "9X")
        );
    }

    #[test]
    fn catalogue_lists_known_bookmakers() {
        let ids: Vec<&str> = bookmakers().iter().map(|b| b.id).collect();
        assert!(ids.contains(&"bet9ja"));
        assert!(ids.contains(&"bet365"));
        assert_eq!(ids.len(), 9);
    }
}
