// =============================================================================
// Shared types used across the Ticker Desk dashboard
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily price record from the market-data provider.
///
/// Series are always chronologically ascending with no duplicate dates;
/// the fetch layer enforces this before anything downstream sees the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// The action attached to a symbol, either computed by the suggestion rule
/// or chosen manually by the user.
///
/// The rule itself only ever emits `Buy` or `Hold`; `Skip` and `None` exist
/// as manual annotation choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Suggestion {
    Buy,
    Hold,
    Skip,
    None,
}

impl Default for Suggestion {
    fn default() -> Self {
        Self::None
    }
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "Buy"),
            Self::Hold => write!(f, "Hold"),
            Self::Skip => write!(f, "Skip"),
            Self::None => write!(f, "None"),
        }
    }
}

/// A manual annotation the user made on a symbol's panel.
///
/// Annotations are ephemeral: the refresh loop clears them all at the start
/// of every cycle, so they never outlive the panel they were made against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAction {
    pub symbol: String,
    pub choice: Suggestion,
    /// ISO 8601 timestamp of when the user made the choice.
    pub noted_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_display_labels() {
        assert_eq!(Suggestion::Buy.to_string(), "Buy");
        assert_eq!(Suggestion::Hold.to_string(), "Hold");
        assert_eq!(Suggestion::Skip.to_string(), "Skip");
        assert_eq!(Suggestion::None.to_string(), "None");
    }

    #[test]
    fn suggestion_default_is_none() {
        assert_eq!(Suggestion::default(), Suggestion::None);
    }

    #[test]
    fn suggestion_serde_roundtrip() {
        let json = serde_json::to_string(&Suggestion::Buy).unwrap();
        assert_eq!(json, "\"Buy\"");
        let back: Suggestion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Suggestion::Buy);
    }
}
