//! SurveyManager — interprets inbound text against the survey state and
//! triggers aggregation plus insight generation when the survey completes.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::prompts;
use super::state::{SurveyPhase, SurveyState, parse_rating};
use crate::error::{InsightError, SurveyError};
use crate::insight::InsightGenerator;
use crate::oura::HealthDataSource;

/// What the manager wants sent back for one inbound message.
#[derive(Debug)]
pub enum SurveyReply {
    /// A question, re-prompt or notice. State may or may not have changed.
    Prompt(String),
    /// The survey just completed; carries the generation outcome.
    Insight(Result<String, InsightError>),
}

impl SurveyReply {
    /// Render as user-facing text.
    pub fn into_text(self) -> String {
        match self {
            Self::Prompt(text) | Self::Insight(Ok(text)) => text,
            Self::Insight(Err(e)) => prompts::insight_failed(&e.to_string()),
        }
    }
}

/// Snapshot of the survey for status reporting.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SurveyStatus {
    pub phase: SurveyPhase,
    pub sleep_rating: Option<u8>,
    pub stress_rating: Option<u8>,
}

/// Owns the survey state for the process lifetime.
///
/// `process_message` holds the state lock for its whole duration, including
/// the vendor fetch and model call, so two messages can never race to fill
/// the same slot or fire generation twice.
pub struct SurveyManager {
    state: Mutex<SurveyState>,
    health: Arc<dyn HealthDataSource>,
    insights: InsightGenerator,
    snapshot_days: u32,
}

impl SurveyManager {
    pub fn new(
        health: Arc<dyn HealthDataSource>,
        insights: InsightGenerator,
        snapshot_days: u32,
    ) -> Self {
        Self {
            state: Mutex::new(SurveyState::default()),
            health,
            insights,
            snapshot_days,
        }
    }

    /// The question the survey is currently waiting on.
    pub async fn current_prompt(&self) -> String {
        let state = self.state.lock().await;
        prompt_for(&state)
    }

    /// Handle one inbound message.
    ///
    /// Blank, non-numeric and out-of-range input never errors; it re-prompts
    /// without touching state. The only error is a failed health data fetch
    /// on the completing message, in which case the stress slot stays empty.
    pub async fn process_message(&self, raw: &str) -> Result<SurveyReply, SurveyError> {
        let mut state = self.state.lock().await;
        let phase = state.phase();
        let rating = parse_rating(raw);

        debug!(%phase, valid = rating.is_some(), "Processing survey message");

        if phase.is_terminal() {
            return Ok(SurveyReply::Prompt(prompts::already_complete()));
        }
        let Some(rating) = rating else {
            return Ok(SurveyReply::Prompt(prompt_for(&state)));
        };

        let Some(sleep_rating) = state.sleep_rating() else {
            return Ok(SurveyReply::Prompt(accept_sleep(&mut state, rating)));
        };

        let snapshot = self
            .health
            .fetch_snapshot_window(self.snapshot_days)
            .await
            .inspect_err(|e| warn!(error = %e, "Health data fetch failed"))?;

        if let Err(e) = state.record_stress(rating) {
            warn!("Failed to record stress rating: {}", e);
            return Ok(SurveyReply::Prompt(prompt_for(&state)));
        }
        info!(sleep_rating, stress_rating = rating, "Survey complete, generating insight");

        let outcome = self.insights.generate(&snapshot, sleep_rating, rating).await;
        Ok(SurveyReply::Insight(outcome))
    }

    pub async fn status(&self) -> SurveyStatus {
        let state = self.state.lock().await;
        SurveyStatus {
            phase: state.phase(),
            sleep_rating: state.sleep_rating(),
            stress_rating: state.stress_rating(),
        }
    }
}

/// Fill the sleep slot and return the next question. A rejected rating
/// leaves the state untouched and repeats the current question.
fn accept_sleep(state: &mut SurveyState, rating: u8) -> String {
    match state.record_sleep(rating) {
        Ok(_) => info!(rating, "Sleep rating recorded"),
        Err(e) => warn!("Failed to record sleep rating: {}", e),
    }
    prompt_for(state)
}

fn prompt_for(state: &SurveyState) -> String {
    match (state.phase(), state.sleep_rating()) {
        (SurveyPhase::AwaitingStressRating, Some(sleep)) => prompts::stress_question(sleep),
        (SurveyPhase::Complete, _) => prompts::already_complete(),
        _ => prompts::sleep_question(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::error::{FetchError, LlmError};
    use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider};
    use crate::oura::{DateWindow, HealthSnapshot};

    struct StubHealth {
        calls: AtomicUsize,
        fail: bool,
        delay: Duration,
    }

    #[async_trait]
    impl HealthDataSource for StubHealth {
        async fn fetch_snapshot_window(&self, days_back: u32) -> Result<HealthSnapshot, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(FetchError::Status {
                    category: "sleep".into(),
                    status: 401,
                    body: "unauthorized".into(),
                });
            }
            Ok(HealthSnapshot {
                window: DateWindow::trailing(
                    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                    days_back,
                ),
                sleep: json!({"data": []}),
                readiness: json!({"data": []}),
                activity: json!({"data": []}),
                workout: json!({"data": []}),
            })
        }
    }

    struct StubLlm {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        fn model_name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LlmError::RequestFailed {
                    provider: "stub".into(),
                    reason: "model offline".into(),
                });
            }
            let prompt = request.user_prompt().unwrap_or_default();
            let days = if prompt.contains("last 4 days") { 4 } else { 0 };
            Ok(CompletionResponse {
                content: format!("🏃 Insight over {days} days"),
            })
        }
    }

    struct Harness {
        manager: Arc<SurveyManager>,
        health: Arc<StubHealth>,
        llm: Arc<StubLlm>,
    }

    fn harness_with(health_fails: bool, llm_fails: bool, delay: Duration) -> Harness {
        let health = Arc::new(StubHealth {
            calls: AtomicUsize::new(0),
            fail: health_fails,
            delay,
        });
        let llm = Arc::new(StubLlm {
            calls: AtomicUsize::new(0),
            fail: llm_fails,
        });
        let manager = Arc::new(SurveyManager::new(
            health.clone(),
            InsightGenerator::new(llm.clone()),
            4,
        ));
        Harness {
            manager,
            health,
            llm,
        }
    }

    fn harness() -> Harness {
        harness_with(false, false, Duration::ZERO)
    }

    async fn send(h: &Harness, text: &str) -> String {
        h.manager.process_message(text).await.unwrap().into_text()
    }

    #[tokio::test]
    async fn scenario_walkthrough() {
        let h = harness();

        assert_eq!(send(&h, "").await, prompts::sleep_question());
        assert_eq!(send(&h, "abc").await, prompts::sleep_question());

        let ack = send(&h, "55").await;
        assert_eq!(ack, prompts::stress_question(55));
        assert!(ack.contains("55"));

        assert_eq!(send(&h, "200").await, prompts::stress_question(55));
        assert_eq!(h.health.calls.load(Ordering::SeqCst), 0);

        assert_eq!(send(&h, "30").await, "🏃 Insight over 4 days");

        let status = h.manager.status().await;
        assert_eq!(status.phase, SurveyPhase::Complete);
        assert_eq!(status.sleep_rating, Some(55));
        assert_eq!(status.stress_rating, Some(30));
        assert_eq!(h.health.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.llm.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn every_valid_sleep_rating_advances() {
        for rating in 1..=100u8 {
            let h = harness();
            let reply = send(&h, &rating.to_string()).await;
            assert!(reply.contains(&rating.to_string()));
            assert!(reply.contains("stress"));
            assert_eq!(h.manager.status().await.phase, SurveyPhase::AwaitingStressRating);
        }
    }

    #[tokio::test]
    async fn boundaries_accepted_and_rejected() {
        let h = harness();
        assert_eq!(send(&h, "0").await, prompts::sleep_question());
        assert_eq!(send(&h, "101").await, prompts::sleep_question());
        assert_eq!(send(&h, "1").await, prompts::stress_question(1));
        assert_eq!(send(&h, "0").await, prompts::stress_question(1));
        assert_eq!(send(&h, "101").await, prompts::stress_question(1));
        send(&h, "100").await;

        let status = h.manager.status().await;
        assert_eq!(status.sleep_rating, Some(1));
        assert_eq!(status.stress_rating, Some(100));
    }

    #[tokio::test]
    async fn invalid_input_is_idempotent() {
        let h = harness();
        send(&h, "70").await;
        let before = h.manager.status().await;

        for input in ["", "  ", "abc", "-1", "3.5", "101", "seventy"] {
            assert_eq!(send(&h, input).await, prompts::stress_question(70));
        }

        let after = h.manager.status().await;
        assert_eq!(before.phase, after.phase);
        assert_eq!(before.sleep_rating, after.sleep_rating);
        assert_eq!(after.stress_rating, None);
        assert_eq!(h.health.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn completed_survey_ignores_further_messages() {
        let h = harness();
        send(&h, "55").await;
        send(&h, "30").await;

        assert_eq!(send(&h, "12").await, prompts::already_complete());
        assert_eq!(send(&h, "").await, prompts::already_complete());

        let status = h.manager.status().await;
        assert_eq!(status.stress_rating, Some(30));
        assert_eq!(h.health.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.llm.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fetch_failure_leaves_stress_slot_open() {
        let h = harness_with(true, false, Duration::ZERO);
        send(&h, "55").await;

        let err = h.manager.process_message("30").await.unwrap_err();
        assert!(matches!(err, SurveyError::Aggregation(_)));

        let status = h.manager.status().await;
        assert_eq!(status.phase, SurveyPhase::AwaitingStressRating);
        assert_eq!(status.stress_rating, None);
        assert_eq!(h.llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn model_failure_still_completes_with_visible_error() {
        let h = harness_with(false, true, Duration::ZERO);
        send(&h, "55").await;

        let reply = h.manager.process_message("30").await.unwrap();
        assert!(matches!(reply, SurveyReply::Insight(Err(_))));
        let text = reply.into_text();
        assert!(text.starts_with("Error generating insights:"));
        assert!(text.contains("model offline"));

        assert_eq!(h.manager.status().await.phase, SurveyPhase::Complete);
    }

    #[tokio::test]
    async fn concurrent_completions_fire_generation_once() {
        let h = harness_with(false, false, Duration::from_millis(20));
        send(&h, "55").await;

        let tasks: Vec<_> = ["30", "40", "50", "60"]
            .into_iter()
            .map(|text| {
                let manager = Arc::clone(&h.manager);
                tokio::spawn(async move { manager.process_message(text).await.unwrap() })
            })
            .collect();

        let mut insights = 0;
        for task in tasks {
            if matches!(task.await.unwrap(), SurveyReply::Insight(_)) {
                insights += 1;
            }
        }

        assert_eq!(insights, 1);
        assert_eq!(h.health.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.llm.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rejected_sleep_record_repeats_question() {
        let mut state = SurveyState::default();
        assert_eq!(accept_sleep(&mut state, 0), prompts::sleep_question());
        assert_eq!(accept_sleep(&mut state, 101), prompts::sleep_question());
        assert_eq!(state, SurveyState::default());

        assert_eq!(accept_sleep(&mut state, 40), prompts::stress_question(40));
        // A second sleep rating is refused and the stress question stands.
        assert_eq!(accept_sleep(&mut state, 90), prompts::stress_question(40));
        assert_eq!(state.sleep_rating(), Some(40));
    }

    #[tokio::test]
    async fn current_prompt_tracks_phase() {
        let h = harness();
        assert_eq!(h.manager.current_prompt().await, prompts::sleep_question());
        send(&h, "88").await;
        assert_eq!(h.manager.current_prompt().await, prompts::stress_question(88));
    }
}
