//! One-shot task that pushes the opening question after startup.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::channels::MessageSender;
use crate::survey::SurveyManager;

/// Spawn the unsolicited first prompt.
///
/// Waits `delay`, then sends whatever question the survey is currently on
/// (normally the sleep question). There is no readiness handshake with the
/// listener and no retry; a failed send is logged and dropped.
pub fn spawn_initial_prompt(
    survey: Arc<SurveyManager>,
    sender: Arc<dyn MessageSender>,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let prompt = survey.current_prompt().await;
        match sender.send(&prompt).await {
            Ok(()) => info!(channel = sender.name(), "Initial prompt sent"),
            Err(e) => warn!(channel = sender.name(), error = %e, "Initial prompt failed"),
        }
    })
}
