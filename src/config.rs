//! Configuration types.
//!
//! Everything comes from the process environment. A `.env` file in the
//! working directory is loaded first by `main` if one exists.

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::channels::WhatsAppConfig;
use crate::error::ConfigError;
use crate::llm::{LlmBackend, LlmConfig};
use crate::oura::OuraConfig;

/// Default model used for insight generation.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Default trailing window for health data, in days.
pub const DEFAULT_SNAPSHOT_DAYS: u32 = 4;

/// Longest trailing window accepted, in days.
pub const MAX_SNAPSHOT_DAYS: u32 = 3650;

/// Twilio WhatsApp sandbox sender.
pub const DEFAULT_WHATSAPP_FROM: &str = "+14155238886";

/// Full process configuration.
#[derive(Debug, Clone)]
pub struct CoachConfig {
    pub oura: OuraConfig,
    pub llm: LlmConfig,
    pub whatsapp: WhatsAppConfig,
    /// Port the webhook listener binds on `0.0.0.0`.
    pub port: u16,
    /// Trailing window passed to the aggregator.
    pub snapshot_days: u32,
    /// Delay before the unsolicited first prompt is pushed.
    pub initial_prompt_delay: Duration,
}

impl CoachConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.into()));

        let oura_token = get("OURA_TOKEN")
            .or_else(|| get("TOKEN"))
            .ok_or_else(|| ConfigError::MissingEnvVar("OURA_TOKEN".into()))?;
        let oura = OuraConfig {
            base_url: get("OURA_API_BASE").unwrap_or_else(|| OuraConfig::DEFAULT_BASE_URL.into()),
            token: SecretString::from(oura_token),
        };

        let backend = match get("COACH_LLM_BACKEND").as_deref() {
            None => LlmBackend::OpenAi,
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: "COACH_LLM_BACKEND".into(),
                message,
            })?,
        };
        let api_key = match backend {
            LlmBackend::OpenAi => get("OPENAI_API_KEY")
                .or_else(|| get("OPENAI"))
                .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".into()))?,
            LlmBackend::Anthropic => require("ANTHROPIC_API_KEY")?,
        };
        let llm = LlmConfig {
            backend,
            api_key: SecretString::from(api_key),
            model: get("COACH_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        };

        let whatsapp = WhatsAppConfig {
            api_base: get("TWILIO_API_BASE")
                .unwrap_or_else(|| WhatsAppConfig::DEFAULT_API_BASE.into()),
            account_sid: require("TWILIO_ACCOUNT_SID")?,
            auth_token: SecretString::from(require("TWILIO_AUTH_TOKEN")?),
            from_number: get("WHATSAPP_FROM_NUMBER")
                .unwrap_or_else(|| DEFAULT_WHATSAPP_FROM.to_string()),
            to_number: require("WHATSAPP_TO_NUMBER")?,
        };

        let port = parse_or("COACH_PORT", get("COACH_PORT"), 5000u16)?;
        let snapshot_days = parse_or(
            "COACH_SNAPSHOT_DAYS",
            get("COACH_SNAPSHOT_DAYS"),
            DEFAULT_SNAPSHOT_DAYS,
        )?;
        if !(1..=MAX_SNAPSHOT_DAYS).contains(&snapshot_days) {
            return Err(ConfigError::InvalidValue {
                key: "COACH_SNAPSHOT_DAYS".into(),
                message: format!("{snapshot_days} is outside 1..={MAX_SNAPSHOT_DAYS}"),
            });
        }
        let delay_secs = parse_or(
            "COACH_INITIAL_PROMPT_DELAY_SECS",
            get("COACH_INITIAL_PROMPT_DELAY_SECS"),
            2u64,
        )?;

        Ok(Self {
            oura,
            llm,
            whatsapp,
            port,
            snapshot_days,
            initial_prompt_delay: Duration::from_secs(delay_secs),
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{raw:?}: {e}"),
            }),
    }
}
