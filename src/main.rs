use std::sync::Arc;

use ring_coach::channels::{MessageSender, WhatsAppChannel};
use ring_coach::config::CoachConfig;
use ring_coach::gateway::{gateway_routes, spawn_initial_prompt};
use ring_coach::insight::InsightGenerator;
use ring_coach::llm::create_provider;
use ring_coach::oura::{HealthDataSource, OuraClient};
use ring_coach::survey::SurveyManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // .env is optional; real environment variables win
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }

    let config = CoachConfig::from_env()?;

    eprintln!("💍 Ring Coach v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm.model);
    eprintln!("   Webhook: http://0.0.0.0:{}/whatsapp", config.port);
    eprintln!("   Status: http://0.0.0.0:{}/api/survey/status", config.port);
    eprintln!("   Snapshot window: {} days", config.snapshot_days);

    let llm = create_provider(&config.llm)?;
    let health: Arc<dyn HealthDataSource> = Arc::new(OuraClient::new(config.oura.clone()));
    let survey = Arc::new(SurveyManager::new(
        health,
        InsightGenerator::new(llm),
        config.snapshot_days,
    ));
    let whatsapp: Arc<dyn MessageSender> = Arc::new(WhatsAppChannel::new(config.whatsapp.clone()));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Webhook listener bound");

    let _initial = spawn_initial_prompt(
        Arc::clone(&survey),
        whatsapp,
        config.initial_prompt_delay,
    );

    axum::serve(listener, gateway_routes(survey)).await?;

    Ok(())
}
