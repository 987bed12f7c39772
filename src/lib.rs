//! Ring Coach — morning check-in over WhatsApp, coached from Oura data.

pub mod channels;
pub mod config;
pub mod error;
pub mod gateway;
pub mod insight;
pub mod llm;
pub mod oura;
pub mod survey;
