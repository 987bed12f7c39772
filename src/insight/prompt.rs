//! Coaching prompt construction.

use crate::oura::HealthSnapshot;

/// System-role instruction for every insight request.
pub const COACH_SYSTEM_PROMPT: &str =
    "You are a health coach who provides motivational advice based on the user's data trends.";

/// Character budget the model is asked to respect. Not enforced on output.
pub const MAX_INSIGHT_CHARS: usize = 1500;

/// Build the user prompt embedding the snapshot and both self-ratings.
pub fn build_insight_prompt(snapshot: &HealthSnapshot, sleep_rating: u8, stress_rating: u8) -> String {
    let days = snapshot.days_covered();
    format!(
        "You are a helpful health coach writing personalized daily messages based on the \
         following user data from the last {days} days:\n\n\
         - Sleep Data: {sleep}\n\
         - Readiness Data: {readiness}\n\
         - Activity Data: {activity}\n\
         - Workout Data: {workout}\n\
         - Today's Sleep Rating: {sleep_rating}/100 (100 = slept better than sleeping beauty, \
         1 = barely slept)\n\
         - Today's Stress Level: {stress_rating}/100 (100 = being chased by a lion, \
         1 = totally relaxed)\n\n\
         Analyze the trends from the {days}-day data. Focus on the sleep, readiness, activity \
         and workout data.\n\
         Activity data shows movement throughout the day and gives an overall picture of \
         activity levels; workout data covers sessions where the user actively trained.\n\
         Today's Sleep Rating is based on how the user feels today, not on measured data. \
         Compare Today's Sleep Rating with the Sleep Data.\n\
         Today's Stress Level is based on how the user feels today, not on measured data.\n\
         Compare the data from the previous days with the current day.\n\
         Write exactly 3 practical actions for today and end with a motivational message to \
         help the user achieve their health goals.\n\
         Focus on improvements or changes needed based on the data trends. Add emojis to make \
         the message more engaging. The message cannot be longer than {MAX_INSIGHT_CHARS} \
         characters.",
        sleep = snapshot.sleep,
        readiness = snapshot.readiness,
        activity = snapshot.activity,
        workout = snapshot.workout,
    )
}
