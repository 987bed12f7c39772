//! Reply texts sent back to the user.

/// Question for the first slot. Also the re-prompt for blank or invalid input.
pub fn sleep_question() -> String {
    "🌙 Good morning! How well did you sleep last night? Reply with a number from 1 \
     (barely slept) to 100 (slept better than sleeping beauty)."
        .to_string()
}

/// Question for the second slot, acknowledging the recorded sleep rating.
///
/// The same text is used as the re-prompt, so repeated invalid input gets an
/// identical reply.
pub fn stress_question(sleep_rating: u8) -> String {
    format!(
        "Thanks! Sleep rating {sleep_rating}/100 noted. 😌 How stressed do you feel today? \
         Reply with a number from 1 (totally relaxed) to 100 (being chased by a lion)."
    )
}

/// Reply for any message after the survey has finished.
pub fn already_complete() -> String {
    "✅ Today's check-in is already complete. Restart the coach to begin a new one.".to_string()
}

/// Presentation of a failed insight generation.
pub fn insight_failed(reason: &str) -> String {
    format!("Error generating insights: {reason}")
}
