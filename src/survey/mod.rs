//! Survey — the two-question morning check-in (sleep, then stress).
//!
//! Each process runs exactly one survey. Once both ratings are in, the
//! manager pulls a health snapshot and asks the model for a coaching
//! message; after that every message gets a "already complete" notice until
//! the process restarts.

pub mod manager;
pub mod prompts;
pub mod state;

pub use manager::{SurveyManager, SurveyReply, SurveyStatus};
pub use state::{RATING_MAX, RATING_MIN, SurveyPhase, SurveyState, parse_rating};
