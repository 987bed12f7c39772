//! Survey state machine — tracks which rating is being asked for.

use serde::{Deserialize, Serialize};

/// Lowest accepted rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted rating.
pub const RATING_MAX: u8 = 100;

/// The phases of the two-question survey.
///
/// Progresses linearly: AwaitingSleepRating → AwaitingStressRating → Complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyPhase {
    AwaitingSleepRating,
    AwaitingStressRating,
    Complete,
}

impl SurveyPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: SurveyPhase) -> bool {
        use SurveyPhase::*;
        matches!(
            (self, target),
            (AwaitingSleepRating, AwaitingStressRating) | (AwaitingStressRating, Complete)
        )
    }

    /// Whether the survey is finished for this process lifetime.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl Default for SurveyPhase {
    fn default() -> Self {
        Self::AwaitingSleepRating
    }
}

impl std::fmt::Display for SurveyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AwaitingSleepRating => "awaiting_sleep_rating",
            Self::AwaitingStressRating => "awaiting_stress_rating",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

/// Parse a rating: trimmed base-10 integer within [1, 100].
pub fn parse_rating(input: &str) -> Option<u8> {
    let value: i64 = input.trim().parse().ok()?;
    u8::try_from(value)
        .ok()
        .filter(|v| (RATING_MIN..=RATING_MAX).contains(v))
}

/// Both survey slots. The phase is derived from which slots are filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyState {
    sleep_rating: Option<u8>,
    stress_rating: Option<u8>,
}

impl SurveyState {
    pub fn phase(&self) -> SurveyPhase {
        match (self.sleep_rating, self.stress_rating) {
            (None, _) => SurveyPhase::AwaitingSleepRating,
            (Some(_), None) => SurveyPhase::AwaitingStressRating,
            (Some(_), Some(_)) => SurveyPhase::Complete,
        }
    }

    pub fn sleep_rating(&self) -> Option<u8> {
        self.sleep_rating
    }

    pub fn stress_rating(&self) -> Option<u8> {
        self.stress_rating
    }

    /// Fill the sleep slot. Only valid while awaiting it.
    pub fn record_sleep(&mut self, rating: u8) -> Result<SurveyPhase, String> {
        self.check_rating(rating)?;
        self.transition(SurveyPhase::AwaitingStressRating)?;
        self.sleep_rating = Some(rating);
        Ok(self.phase())
    }

    /// Fill the stress slot. Only valid once the sleep slot holds a value.
    pub fn record_stress(&mut self, rating: u8) -> Result<SurveyPhase, String> {
        self.check_rating(rating)?;
        self.transition(SurveyPhase::Complete)?;
        self.stress_rating = Some(rating);
        Ok(self.phase())
    }

    fn check_rating(&self, rating: u8) -> Result<(), String> {
        if (RATING_MIN..=RATING_MAX).contains(&rating) {
            Ok(())
        } else {
            Err(format!("Rating {rating} outside {RATING_MIN}..={RATING_MAX}"))
        }
    }

    fn transition(&self, target: SurveyPhase) -> Result<(), String> {
        let current = self.phase();
        if current.can_transition_to(target) {
            Ok(())
        } else {
            Err(format!("Cannot transition from {current} to {target}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        use SurveyPhase::*;
        assert!(AwaitingSleepRating.can_transition_to(AwaitingStressRating));
        assert!(AwaitingStressRating.can_transition_to(Complete));
    }

    #[test]
    fn invalid_transitions() {
        use SurveyPhase::*;
        // Skip
        assert!(!AwaitingSleepRating.can_transition_to(Complete));
        // Backward
        assert!(!AwaitingStressRating.can_transition_to(AwaitingSleepRating));
        // Terminal
        assert!(!Complete.can_transition_to(AwaitingSleepRating));
        assert!(!Complete.can_transition_to(AwaitingStressRating));
        // Self-transition
        assert!(!AwaitingStressRating.can_transition_to(AwaitingStressRating));
    }

    #[test]
    fn is_terminal() {
        assert!(SurveyPhase::Complete.is_terminal());
        assert!(!SurveyPhase::AwaitingSleepRating.is_terminal());
        assert!(!SurveyPhase::AwaitingStressRating.is_terminal());
    }

    #[test]
    fn display_matches_serde() {
        use SurveyPhase::*;
        for phase in [AwaitingSleepRating, AwaitingStressRating, Complete] {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(format!("\"{phase}\""), json);
        }
    }

    #[test]
    fn parse_rating_accepts_inclusive_bounds() {
        assert_eq!(parse_rating("1"), Some(1));
        assert_eq!(parse_rating("100"), Some(100));
        assert_eq!(parse_rating("  42\n"), Some(42));
        assert_eq!(parse_rating("+7"), Some(7));
        assert_eq!(parse_rating("007"), Some(7));
    }

    #[test]
    fn parse_rating_rejects_everything_else() {
        for input in ["", "   ", "0", "101", "-5", "abc", "4.5", "1e2", "fifty", "99999999999999999999", "5 5"] {
            assert_eq!(parse_rating(input), None, "{input:?} should be rejected");
        }
    }

    #[test]
    fn default_state_awaits_sleep() {
        let state = SurveyState::default();
        assert_eq!(state.phase(), SurveyPhase::AwaitingSleepRating);
        assert_eq!(state.sleep_rating(), None);
        assert_eq!(state.stress_rating(), None);
    }

    #[test]
    fn record_walks_all_phases() {
        let mut state = SurveyState::default();
        assert_eq!(state.record_sleep(55), Ok(SurveyPhase::AwaitingStressRating));
        assert_eq!(state.record_stress(30), Ok(SurveyPhase::Complete));
        assert_eq!(state.sleep_rating(), Some(55));
        assert_eq!(state.stress_rating(), Some(30));
    }

    #[test]
    fn stress_before_sleep_is_rejected() {
        let mut state = SurveyState::default();
        assert!(state.record_stress(30).is_err());
        assert_eq!(state, SurveyState::default());
    }

    #[test]
    fn complete_state_is_never_overwritten() {
        let mut state = SurveyState::default();
        state.record_sleep(55).unwrap();
        state.record_stress(30).unwrap();

        assert!(state.record_sleep(10).is_err());
        assert!(state.record_stress(10).is_err());
        assert_eq!(state.sleep_rating(), Some(55));
        assert_eq!(state.stress_rating(), Some(30));
    }

    #[test]
    fn out_of_range_record_is_rejected() {
        let mut state = SurveyState::default();
        assert!(state.record_sleep(0).is_err());
        assert!(state.record_sleep(101).is_err());
        assert_eq!(state.phase(), SurveyPhase::AwaitingSleepRating);
    }

    #[test]
    fn state_serde_roundtrip() {
        let mut state = SurveyState::default();
        state.record_sleep(80).unwrap();
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json, serde_json::json!({"sleep_rating": 80, "stress_rating": null}));
        let parsed: SurveyState = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, state);
    }
}
